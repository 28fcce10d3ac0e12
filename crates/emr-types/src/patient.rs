//! Patient demographics and visit history.
//!
//! Wire names are camelCase, matching the JSON the original clinic front-end
//! exchanges with the `/api` surface. Every field is defaulted so partially
//! populated records (older local snapshots, minimal test fixtures) still
//! deserialize.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::alerts::MedicalAlert;

/// Visit type code shown in the queue's N/R column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum VisitType {
    /// First registration at the clinic.
    #[default]
    #[serde(rename = "N")]
    New,
    /// Returning patient.
    #[serde(rename = "R")]
    Review,
}

impl VisitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitType::New => "N",
            VisitType::Review => "R",
        }
    }
}

impl std::fmt::Display for VisitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged visit, append-only.
///
/// The boolean flags record which clinical stations were completed during the
/// visit and drive the per-visit badges in the record's history panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitSummary {
    /// Visit sequence number, assigned by the backend when logged.
    pub id: u32,
    pub date: String,
    /// Location code, e.g. `CHN`.
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub has_investigation: bool,
    pub has_refraction: bool,
    pub has_glaucoma: bool,
}

impl VisitSummary {
    /// Station badges for this visit. A visit with no recorded station shows
    /// the glaucoma-review badge.
    pub fn badges(&self) -> Vec<&'static str> {
        let mut badges = Vec::new();
        if self.has_investigation {
            badges.push("Inv");
        }
        if self.has_refraction {
            badges.push("Rx");
        }
        if self.has_glaucoma {
            badges.push("Gla");
        }
        if badges.is_empty() {
            badges.push("Gla");
        }
        badges
    }
}

/// A registered patient.
///
/// Created at registration, updated on edit or MR lookup, never hard-deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    /// Record id assigned by the backend (`P` followed by digits).
    pub id: String,
    pub mr_number: String,
    pub name: String,
    /// Parent/guardian label, e.g. `S/O Ravi Kumar`.
    pub parent_info: String,
    pub age: u32,
    pub gender: String,
    pub dob: String,
    pub mobile: String,
    pub city: String,
    pub state: String,
    /// Captured photo as a data URI, if one was taken at registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub purpose: String,
    pub visit_type: VisitType,
    pub hospital_reg_time: String,
    pub clinical_in_time: String,
    /// Check-in instant in epoch milliseconds; drives the queue's elapsed
    /// wait column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_timestamp: Option<i64>,
    pub assigned_to: String,
    pub status: String,
    /// Comma-separated allergy free text.
    pub allergies: String,
    /// Comma-separated known-condition free text.
    pub conditions: String,
    pub last_visit_date: String,
    pub last_clinic: String,
    pub last_treatment: String,
    pub visit_history: Vec<VisitSummary>,
    pub medical_alerts: Vec<MedicalAlert>,
}

/// Registration payload: a patient without a record id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPatient {
    pub mr_number: String,
    pub name: String,
    pub parent_info: String,
    pub age: u32,
    pub gender: String,
    pub dob: String,
    pub mobile: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub purpose: String,
    pub visit_type: VisitType,
    pub hospital_reg_time: String,
    pub clinical_in_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_timestamp: Option<i64>,
    pub assigned_to: String,
    pub status: String,
    pub allergies: String,
    pub conditions: String,
}

impl NewPatient {
    /// Materializes the patient record once an id has been assigned.
    pub fn into_patient(self, id: String) -> Patient {
        Patient {
            id,
            mr_number: self.mr_number,
            name: self.name,
            parent_info: self.parent_info,
            age: self.age,
            gender: self.gender,
            dob: self.dob,
            mobile: self.mobile,
            city: self.city,
            state: self.state,
            photo: self.photo,
            purpose: self.purpose,
            visit_type: self.visit_type,
            hospital_reg_time: self.hospital_reg_time,
            clinical_in_time: self.clinical_in_time,
            check_in_timestamp: self.check_in_timestamp,
            assigned_to: self.assigned_to,
            status: self.status,
            allergies: self.allergies,
            conditions: self.conditions,
            ..Patient::default()
        }
    }
}

/// Partial patient for `PUT /patients/{id}`: only the present fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_type: Option<VisitType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_reg_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_in_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_visit_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_clinic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_treatment: Option<String>,
}

impl PatientUpdate {
    /// Applies this partial update to an existing record, last write wins.
    pub fn apply_to(&self, patient: &mut Patient) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = &self.$field {
                    patient.$field = value.clone();
                })*
            };
        }
        merge!(
            name,
            parent_info,
            gender,
            dob,
            mobile,
            city,
            state,
            purpose,
            hospital_reg_time,
            clinical_in_time,
            assigned_to,
            status,
            allergies,
            conditions,
            last_visit_date,
            last_clinic,
            last_treatment,
        );
        if let Some(age) = self.age {
            patient.age = age;
        }
        if let Some(visit_type) = self.visit_type {
            patient.visit_type = visit_type;
        }
        if let Some(check_in) = self.check_in_timestamp {
            patient.check_in_timestamp = Some(check_in);
        }
        if let Some(photo) = &self.photo {
            patient.photo = Some(photo.clone());
        }
    }
}

/// Response of `GET /patients/mr/{mrNumber}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MrLookup {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
}

impl MrLookup {
    /// The safe default: no match.
    pub fn not_found() -> Self {
        Self {
            exists: false,
            patient: None,
        }
    }

    pub fn found(patient: Patient) -> Self {
        Self {
            exists: true,
            patient: Some(patient),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_wire_names_are_camel_case() {
        let patient = Patient {
            id: "P758184".into(),
            mr_number: "758184".into(),
            name: "Hari Prasad".into(),
            age: 35,
            check_in_timestamp: Some(1_700_000_000_000),
            ..Patient::default()
        };

        let json = serde_json::to_value(&patient).expect("patient should serialize");
        assert_eq!(json["mrNumber"], "758184");
        assert_eq!(json["checkInTimestamp"], 1_700_000_000_000_i64);
        assert!(json.get("mr_number").is_none());
    }

    #[test]
    fn patient_deserializes_from_sparse_json() {
        let patient: Patient =
            serde_json::from_str(r#"{"id":"P1","mrNumber":"123","name":"A","age":4}"#)
                .expect("sparse patient should deserialize");
        assert_eq!(patient.visit_type, VisitType::New);
        assert!(patient.visit_history.is_empty());
        assert!(patient.check_in_timestamp.is_none());
    }

    #[test]
    fn visit_type_codes() {
        assert_eq!(
            serde_json::to_string(&VisitType::Review).expect("should serialize"),
            "\"R\""
        );
        let parsed: VisitType = serde_json::from_str("\"N\"").expect("should deserialize");
        assert_eq!(parsed, VisitType::New);
    }

    #[test]
    fn visit_badges_default_to_glaucoma_review() {
        let bare = VisitSummary::default();
        assert_eq!(bare.badges(), vec!["Gla"]);

        let full = VisitSummary {
            has_investigation: true,
            has_refraction: true,
            ..VisitSummary::default()
        };
        assert_eq!(full.badges(), vec!["Inv", "Rx"]);
    }

    #[test]
    fn update_applies_only_present_fields() {
        let mut patient = Patient {
            id: "P1".into(),
            name: "Before".into(),
            city: "Chennai".into(),
            age: 35,
            ..Patient::default()
        };

        let update = PatientUpdate {
            name: Some("After".into()),
            visit_type: Some(VisitType::Review),
            ..PatientUpdate::default()
        };
        update.apply_to(&mut patient);

        assert_eq!(patient.name, "After");
        assert_eq!(patient.visit_type, VisitType::Review);
        assert_eq!(patient.city, "Chennai");
        assert_eq!(patient.age, 35);
    }
}
