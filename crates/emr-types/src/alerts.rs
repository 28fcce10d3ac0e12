//! Medical alerts.
//!
//! Alerts are primarily *derived*: the patient's comma-separated allergy and
//! condition free text is split into display tags. The REST surface also
//! persists explicit alert rows, so the row type doubles as the wire shape
//! for `GET|POST /patients/{id}/alerts`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::patient::Patient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    #[default]
    Allergy,
    Condition,
}

/// One alert tag shown on the patient banner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MedicalAlert {
    #[serde(alias = "alertType")]
    pub alert_type: AlertType,
    #[serde(alias = "alertValue")]
    pub alert_value: String,
}

impl MedicalAlert {
    pub fn allergy(value: impl Into<String>) -> Self {
        Self {
            alert_type: AlertType::Allergy,
            alert_value: value.into(),
        }
    }

    pub fn condition(value: impl Into<String>) -> Self {
        Self {
            alert_type: AlertType::Condition,
            alert_value: value.into(),
        }
    }

    /// Banner label, e.g. `Penicillin Allergy` or `Known Diabetic`.
    pub fn display_label(&self) -> String {
        match self.alert_type {
            AlertType::Allergy => format!("{} Allergy", self.alert_value),
            AlertType::Condition => format!("Known {}", self.alert_value),
        }
    }
}

/// Splits the patient's allergy/condition free text into alert tags.
///
/// Empty segments are dropped; values are trimmed. Explicitly persisted
/// alert rows on the record come first, in stored order.
pub fn derive_alerts(patient: &Patient) -> Vec<MedicalAlert> {
    let mut alerts = patient.medical_alerts.clone();
    alerts.extend(split_tags(&patient.allergies).map(MedicalAlert::allergy));
    alerts.extend(split_tags(&patient.conditions).map(MedicalAlert::condition));
    alerts
}

fn split_tags(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
}
