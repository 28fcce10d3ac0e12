//! Fundus examination.

use serde::{Deserialize, Serialize};

use super::{EyePair, SectionKind, SectionPayload};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FundusExamPayload {
    pub media: EyePair,
    pub disc: EyePair,
    pub vessels: EyePair,
    pub background_retina: EyePair,
    pub macula_foveal_reflex: EyePair,
    pub eye_drawing: EyePair,
}

impl FundusExamPayload {
    /// Rows in display order: (label, values).
    pub fn rows(&self) -> [(&'static str, &EyePair); 6] {
        [
            ("Media", &self.media),
            ("Disc", &self.disc),
            ("Vessels", &self.vessels),
            ("Background Retina", &self.background_retina),
            ("Macula/Foveal Reflex", &self.macula_foveal_reflex),
            ("Eye Drawing", &self.eye_drawing),
        ]
    }
}

impl SectionPayload for FundusExamPayload {
    const KIND: SectionKind = SectionKind::FundusExam;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let payload = FundusExamPayload {
            disc: EyePair::new("cdr 0.9, bipolar notch, PPA", "cdr 0.9"),
            ..FundusExamPayload::default()
        };
        let json = serde_json::to_value(&payload).expect("should serialize");
        assert_eq!(json["disc"]["re"], "cdr 0.9, bipolar notch, PPA");
        assert!(json.get("backgroundRetina").is_some());
    }

    #[test]
    fn rows_keep_display_order() {
        let payload = FundusExamPayload::default();
        let labels: Vec<_> = payload.rows().iter().map(|(label, _)| *label).collect();
        assert_eq!(labels[0], "Media");
        assert_eq!(labels[5], "Eye Drawing");
    }
}
