//! Refraction: current spectacle records.

use serde::{Deserialize, Serialize};

use super::{SectionKind, SectionPayload};

/// One current-spectacles record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpectacleRecord {
    /// Usage pattern, e.g. `Regular usage`.
    pub usage: String,
    pub duration: String,
    pub type_of_spectacle: String,
    pub lens_details: String,
    /// Physical condition, e.g. `Good`.
    pub condition: String,
}

impl SpectacleRecord {
    pub fn is_blank(&self) -> bool {
        [
            &self.usage,
            &self.duration,
            &self.type_of_spectacle,
            &self.lens_details,
            &self.condition,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// The blank form starts with no records; the first entry is added from the
/// editor's add-form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefractionPayload {
    pub spectacles: Vec<SpectacleRecord>,
}

impl RefractionPayload {
    /// Appends one record; never touches existing records.
    pub fn add_spectacle(&mut self, record: SpectacleRecord) {
        self.spectacles.push(record);
    }

    /// Removes only the targeted record; out-of-range indices are ignored.
    pub fn remove_spectacle(&mut self, index: usize) {
        if index < self.spectacles.len() {
            self.spectacles.remove(index);
        }
    }
}

impl SectionPayload for RefractionPayload {
    const KIND: SectionKind = SectionKind::Refraction;

    fn for_display(&self) -> Self {
        Self {
            spectacles: self
                .spectacles
                .iter()
                .filter(|record| !record.is_blank())
                .cloned()
                .collect(),
        }
    }
}
