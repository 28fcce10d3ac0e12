//! Complaints & ocular history.

use serde::{Deserialize, Serialize};

use super::{SectionKind, SectionPayload};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplaintsPayload {
    pub purpose_of_visit: String,
    /// Free-text notes/observations.
    pub notes: String,
    pub ocular_history_re: String,
    pub ocular_history_le: String,
    /// "Yes"/"No" answer to "has spectacles or prescription".
    pub has_spectacles: String,
}

impl SectionPayload for ComplaintsPayload {
    const KIND: SectionKind = SectionKind::Complaints;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let payload = ComplaintsPayload {
            purpose_of_visit: "FollowUp".into(),
            ocular_history_le: "LE NPDS + PHACO 2023".into(),
            ..ComplaintsPayload::default()
        };
        let json = serde_json::to_value(&payload).expect("should serialize");
        assert_eq!(json["purposeOfVisit"], "FollowUp");
        assert_eq!(json["ocularHistoryLe"], "LE NPDS + PHACO 2023");
    }
}
