//! Final diagnosis list.

use serde::{Deserialize, Serialize};

use super::{SectionKind, SectionPayload};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisPayload {
    /// Ordered free-text diagnoses, e.g.
    /// `RE POAG - primary open-angle glaucoma`.
    pub diagnoses: Vec<String>,
}

impl DiagnosisPayload {
    pub fn add_diagnosis(&mut self, diagnosis: impl Into<String>) {
        self.diagnoses.push(diagnosis.into());
    }

    /// Removes only the targeted entry; out-of-range indices are ignored.
    pub fn remove_diagnosis(&mut self, index: usize) {
        if index < self.diagnoses.len() {
            self.diagnoses.remove(index);
        }
    }
}

impl SectionPayload for DiagnosisPayload {
    const KIND: SectionKind = SectionKind::Diagnosis;

    fn for_display(&self) -> Self {
        Self {
            diagnoses: self
                .diagnoses
                .iter()
                .filter(|entry| !entry.trim().is_empty())
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_form_is_an_empty_list() {
        assert!(DiagnosisPayload::default().diagnoses.is_empty());
    }

    #[test]
    fn display_filter_drops_blank_entries_only() {
        let mut payload = DiagnosisPayload::default();
        payload.add_diagnosis("RE POAG");
        payload.add_diagnosis("  ");
        payload.add_diagnosis("RE Pseudophakia");

        let shown = payload.for_display();
        assert_eq!(shown.diagnoses, vec!["RE POAG", "RE Pseudophakia"]);
        assert_eq!(payload.diagnoses.len(), 3);
    }

    #[test]
    fn remove_targets_a_single_index() {
        let mut payload = DiagnosisPayload::default();
        payload.add_diagnosis("RE POAG");
        payload.add_diagnosis("LE POAG");
        payload.remove_diagnosis(0);
        assert_eq!(payload.diagnoses, vec!["LE POAG"]);
    }
}
