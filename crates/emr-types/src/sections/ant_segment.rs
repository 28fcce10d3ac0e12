//! Anterior segment examination.

use serde::{Deserialize, Serialize};

use super::{EyePair, SectionKind, SectionPayload};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AntSegmentExamPayload {
    pub lid: EyePair,
    pub conjunctiva: EyePair,
    pub cornea: EyePair,
    pub anterior_chamber: EyePair,
    pub iris: EyePair,
    pub pupil: EyePair,
    pub lens: EyePair,
    pub ocular_movements: EyePair,
    pub corneal_reflex: EyePair,
    pub globe: EyePair,
    pub undilated_fundus: EyePair,
    pub eye_drawing: EyePair,
}

impl AntSegmentExamPayload {
    /// Rows in display order: (label, values).
    pub fn rows(&self) -> [(&'static str, &EyePair); 12] {
        [
            ("Lid", &self.lid),
            ("Conjunctiva", &self.conjunctiva),
            ("Cornea", &self.cornea),
            ("Anterior Chamber", &self.anterior_chamber),
            ("Iris", &self.iris),
            ("Pupil", &self.pupil),
            ("Lens", &self.lens),
            ("Ocular Movements", &self.ocular_movements),
            ("Corneal Reflex", &self.corneal_reflex),
            ("Globe", &self.globe),
            ("Undilated Fundus", &self.undilated_fundus),
            ("Eye Drawing", &self.eye_drawing),
        ]
    }
}

impl SectionPayload for AntSegmentExamPayload {
    const KIND: SectionKind = SectionKind::AntSegmentExam;
}
