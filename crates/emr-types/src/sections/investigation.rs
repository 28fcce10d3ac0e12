//! Investigation results (IOP, blood pressure, keratometry, ...).

use serde::{Deserialize, Serialize};

use super::{SectionKind, SectionPayload};

/// One investigation row with per-eye values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestigationEntry {
    pub name: String,
    pub re_value: String,
    pub le_value: String,
    pub date_time: String,
}

impl InvestigationEntry {
    pub fn is_blank(&self) -> bool {
        [&self.name, &self.re_value, &self.le_value, &self.date_time]
            .iter()
            .all(|field| field.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestigationPayload {
    pub investigations: Vec<InvestigationEntry>,
}

impl Default for InvestigationPayload {
    /// The blank form starts with one empty row.
    fn default() -> Self {
        Self {
            investigations: vec![InvestigationEntry::default()],
        }
    }
}

impl InvestigationPayload {
    /// Appends one blank row; never touches existing rows.
    pub fn add_row(&mut self) {
        self.investigations.push(InvestigationEntry::default());
    }

    /// Removes only the targeted row; out-of-range indices are ignored.
    pub fn remove_row(&mut self, index: usize) {
        if index < self.investigations.len() {
            self.investigations.remove(index);
        }
    }
}

impl SectionPayload for InvestigationPayload {
    const KIND: SectionKind = SectionKind::Investigation;

    fn for_display(&self) -> Self {
        Self {
            investigations: self
                .investigations
                .iter()
                .filter(|row| !row.is_blank())
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iop_row() -> InvestigationEntry {
        InvestigationEntry {
            name: "IOP".into(),
            re_value: "18 mm of Hg by Applanation".into(),
            le_value: "16 mm of Hg by Applanation".into(),
            date_time: "16 Dec 2025 05:37 PM".into(),
        }
    }

    #[test]
    fn blank_form_has_one_empty_row() {
        let payload = InvestigationPayload::default();
        assert_eq!(payload.investigations.len(), 1);
        assert!(payload.investigations[0].is_blank());
    }

    #[test]
    fn display_filter_drops_blank_rows_only() {
        let mut payload = InvestigationPayload::default();
        payload.investigations[0] = iop_row();
        payload.add_row();

        let shown = payload.for_display();
        assert_eq!(shown.investigations, vec![iop_row()]);
        assert_eq!(payload.investigations.len(), 2);
    }

    #[test]
    fn row_with_only_a_name_is_not_blank() {
        let row = InvestigationEntry {
            name: "Blood Pressure".into(),
            ..InvestigationEntry::default()
        };
        assert!(!row.is_blank());
    }
}
