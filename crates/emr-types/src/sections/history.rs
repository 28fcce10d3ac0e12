//! Systemic history and current-spectacle details.

use serde::{Deserialize, Serialize};

use super::{SectionKind, SectionPayload};

/// One systemic-condition row (diabetes, hypertension, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemicCondition {
    pub name: String,
    pub duration: String,
    /// Treatment status, e.g. `Under Rx`.
    pub treatment: String,
    pub medication: String,
    /// Dosage pattern, e.g. `1-0-1`.
    pub dosage: String,
}

impl SystemicCondition {
    pub fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.duration,
            &self.treatment,
            &self.medication,
            &self.dosage,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryPayload {
    pub conditions: Vec<SystemicCondition>,
    pub spectacle_usage: String,
    pub usage_duration: String,
    pub type_of_spectacle: String,
    pub lens_details: String,
    pub condition: String,
}

impl Default for HistoryPayload {
    /// The blank form starts with one empty condition row.
    fn default() -> Self {
        Self {
            conditions: vec![SystemicCondition::default()],
            spectacle_usage: String::new(),
            usage_duration: String::new(),
            type_of_spectacle: String::new(),
            lens_details: String::new(),
            condition: String::new(),
        }
    }
}

impl HistoryPayload {
    /// Appends one blank condition row; never touches existing rows.
    pub fn add_condition(&mut self) {
        self.conditions.push(SystemicCondition::default());
    }

    /// Removes only the targeted row; out-of-range indices are ignored.
    pub fn remove_condition(&mut self, index: usize) {
        if index < self.conditions.len() {
            self.conditions.remove(index);
        }
    }
}

impl SectionPayload for HistoryPayload {
    const KIND: SectionKind = SectionKind::History;

    fn for_display(&self) -> Self {
        let mut shown = self.clone();
        shown.conditions.retain(|row| !row.is_blank());
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diabetes_row() -> SystemicCondition {
        SystemicCondition {
            name: "DIABETES".into(),
            duration: "3 years".into(),
            treatment: "Under Rx".into(),
            medication: "TAB.OKAMET 500MG".into(),
            dosage: "1-0-1".into(),
        }
    }

    #[test]
    fn blank_form_has_one_empty_row() {
        let payload = HistoryPayload::default();
        assert_eq!(payload.conditions.len(), 1);
        assert!(payload.conditions[0].is_blank());
    }

    #[test]
    fn adding_rows_never_mutates_existing_ones() {
        let mut payload = HistoryPayload::default();
        payload.conditions[0] = diabetes_row();
        payload.add_condition();

        assert_eq!(payload.conditions.len(), 2);
        assert_eq!(payload.conditions[0], diabetes_row());
        assert!(payload.conditions[1].is_blank());
    }

    #[test]
    fn removing_a_row_only_removes_the_targeted_index() {
        let mut payload = HistoryPayload::default();
        payload.conditions[0] = diabetes_row();
        payload.add_condition();
        payload.remove_condition(1);
        assert_eq!(payload.conditions, vec![diabetes_row()]);

        payload.remove_condition(5);
        assert_eq!(payload.conditions, vec![diabetes_row()]);
    }

    #[test]
    fn display_filter_drops_blank_rows_without_mutating() {
        let mut payload = HistoryPayload::default();
        payload.conditions[0] = diabetes_row();
        payload.add_condition();

        let shown = payload.for_display();
        assert_eq!(shown.conditions, vec![diabetes_row()]);
        // The stored payload keeps its blank row.
        assert_eq!(payload.conditions.len(), 2);
    }
}
