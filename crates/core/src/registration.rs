//! The outpatient registration view model.
//!
//! Captures demographics, an optional captured photo and allergy/condition
//! free text. An MR lookup against the record store pre-fills the form for
//! returning patients; submission validates the three required fields and
//! creates or updates the record.

use chrono::{DateTime, Utc};
use eyenotes_types::{MrNumber, NewPatient, NonEmptyText, Patient, PatientUpdate, VisitType};

use crate::api::EmrApi;
use crate::shell::Route;
use crate::store::RecordStore;

/// The fields registration cannot proceed without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    MrNumber,
    Name,
    Age,
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RequiredField::MrNumber => "MR Number",
            RequiredField::Name => "Name",
            RequiredField::Age => "Age",
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Submission is blocked; the listed fields are empty.
    #[error("required registration fields are missing")]
    MissingFields(Vec<RequiredField>),
    #[error("age must be a whole number")]
    InvalidAge,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Registered {
    pub patient: Patient,
    /// Where the shell navigates next.
    pub destination: Route,
}

/// The registration form, bound field-for-field to the registration screen.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationForm {
    pub mr_number: String,
    pub name: String,
    pub parent_info: String,
    /// Age as entered; validated and parsed at submission.
    pub age: String,
    pub gender: String,
    pub dob: String,
    pub mobile: String,
    pub city: String,
    pub state: String,
    pub visit_type: VisitType,
    pub purpose: String,
    pub allergies: String,
    pub conditions: String,
    pub photo: Option<String>,
    pub existing_id: Option<String>,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            mr_number: String::new(),
            name: String::new(),
            parent_info: String::new(),
            age: String::new(),
            gender: "Male".into(),
            dob: String::new(),
            mobile: String::new(),
            city: String::new(),
            state: "Tamil Nadu".into(),
            visit_type: VisitType::New,
            purpose: "Routine Check-up".into(),
            allergies: String::new(),
            conditions: String::new(),
            photo: None,
            existing_id: None,
        }
    }
}

impl RegistrationForm {
    /// Looks the entered MR number up in the record store. A hit pre-fills
    /// the form from the existing patient and marks the visit a review; a
    /// miss marks it new. Returns whether a patient was found.
    pub fn lookup_mr(&mut self, store: &RecordStore) -> bool {
        match store.get_patient_by_mr(self.mr_number.trim()) {
            Some(patient) => {
                self.name = patient.name.clone();
                self.parent_info = patient.parent_info.clone();
                self.age = patient.age.to_string();
                self.gender = patient.gender.clone();
                self.dob = patient.dob.clone();
                self.mobile = patient.mobile.clone();
                self.city = patient.city.clone();
                self.state = patient.state.clone();
                self.purpose = patient.purpose.clone();
                self.allergies = patient.allergies.clone();
                self.conditions = patient.conditions.clone();
                self.photo = patient.photo.clone();
                self.visit_type = VisitType::Review;
                self.existing_id = Some(patient.id.clone());
                true
            }
            None => {
                self.visit_type = VisitType::New;
                self.existing_id = None;
                false
            }
        }
    }

    /// Stores a captured snapshot (a data URI). Capturing again replaces the
    /// previous snapshot.
    pub fn attach_photo(&mut self, data_uri: impl Into<String>) {
        self.photo = Some(data_uri.into());
    }

    pub fn remove_photo(&mut self) {
        self.photo = None;
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    /// Checks the three required fields.
    ///
    /// # Errors
    ///
    /// `MissingFields` lists every empty required field; `InvalidAge` when
    /// the age text is present but not a number.
    pub fn validate(&self) -> Result<u32, RegistrationError> {
        let mut missing = Vec::new();
        if MrNumber::new(&self.mr_number).is_err() {
            missing.push(RequiredField::MrNumber);
        }
        if NonEmptyText::new(&self.name).is_err() {
            missing.push(RequiredField::Name);
        }
        if self.age.trim().is_empty() {
            missing.push(RequiredField::Age);
        }
        if !missing.is_empty() {
            return Err(RegistrationError::MissingFields(missing));
        }

        self.age
            .trim()
            .parse()
            .map_err(|_| RegistrationError::InvalidAge)
    }

    /// Submits the form: creates a new patient, or updates the one found by
    /// the MR lookup, then navigates back to the queue.
    ///
    /// # Errors
    ///
    /// Validation failures block submission and leave the store untouched.
    pub fn submit(
        &self,
        store: &mut RecordStore,
        api: &dyn EmrApi,
        now: DateTime<Utc>,
    ) -> Result<Registered, RegistrationError> {
        let age = self.validate()?;

        let reg_time = now.format("%I:%M %p").to_string();
        let check_in = now.timestamp_millis();

        let patient = match &self.existing_id {
            Some(id) => {
                let update = PatientUpdate {
                    name: Some(self.name.trim().to_owned()),
                    parent_info: Some(self.parent_info.clone()),
                    age: Some(age),
                    gender: Some(self.gender.clone()),
                    dob: Some(self.dob.clone()),
                    mobile: Some(self.mobile.clone()),
                    city: Some(self.city.clone()),
                    state: Some(self.state.clone()),
                    photo: self.photo.clone(),
                    purpose: Some(self.purpose.clone()),
                    visit_type: Some(self.visit_type),
                    hospital_reg_time: Some(reg_time.clone()),
                    clinical_in_time: Some(reg_time.clone()),
                    check_in_timestamp: Some(check_in),
                    status: Some("Waiting".into()),
                    allergies: Some(self.allergies.clone()),
                    conditions: Some(self.conditions.clone()),
                    ..PatientUpdate::default()
                };
                store.update_patient(api, id, &update)
            }
            None => None,
        };

        let patient = match patient {
            Some(patient) => patient,
            None => {
                let new_patient = NewPatient {
                    mr_number: self.mr_number.trim().to_owned(),
                    name: self.name.trim().to_owned(),
                    parent_info: self.parent_info.clone(),
                    age,
                    gender: self.gender.clone(),
                    dob: self.dob.clone(),
                    mobile: self.mobile.clone(),
                    city: self.city.clone(),
                    state: self.state.clone(),
                    photo: self.photo.clone(),
                    purpose: self.purpose.clone(),
                    visit_type: self.visit_type,
                    hospital_reg_time: reg_time.clone(),
                    clinical_in_time: reg_time,
                    check_in_timestamp: Some(check_in),
                    assigned_to: "Unassigned".into(),
                    status: "Waiting".into(),
                    allergies: self.allergies.clone(),
                    conditions: self.conditions.clone(),
                };
                store.add_patient(api, new_patient)
            }
        };

        Ok(Registered {
            patient,
            destination: Route::Queue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::InMemoryBackend;
    use crate::config::CoreConfig;
    use tempfile::TempDir;

    fn offline_store(dir: &TempDir) -> (RecordStore, InMemoryBackend) {
        let cfg = CoreConfig::new("http://localhost:5000/api", dir.path().to_path_buf())
            .expect("config should be accepted");
        let backend = InMemoryBackend::offline();
        let store = RecordStore::open(&cfg, &backend);
        (store, backend)
    }

    fn filled_form() -> RegistrationForm {
        RegistrationForm {
            mr_number: "123456".into(),
            name: "Meenakshi S".into(),
            age: "62".into(),
            ..RegistrationForm::default()
        }
    }

    #[test]
    fn defaults_match_the_registration_screen() {
        let form = RegistrationForm::default();
        assert_eq!(form.gender, "Male");
        assert_eq!(form.state, "Tamil Nadu");
        assert_eq!(form.purpose, "Routine Check-up");
        assert_eq!(form.visit_type, VisitType::New);
    }

    #[test]
    fn validation_lists_every_missing_required_field() {
        let err = RegistrationForm::default()
            .validate()
            .expect_err("empty form should be rejected");
        assert_eq!(
            err,
            RegistrationError::MissingFields(vec![
                RequiredField::MrNumber,
                RequiredField::Name,
                RequiredField::Age,
            ])
        );

        let mut form = filled_form();
        form.age = String::new();
        let err = form.validate().expect_err("missing age should be rejected");
        assert_eq!(
            err,
            RegistrationError::MissingFields(vec![RequiredField::Age])
        );
    }

    #[test]
    fn non_numeric_age_is_rejected() {
        let mut form = filled_form();
        form.age = "sixty".into();
        assert_eq!(form.validate(), Err(RegistrationError::InvalidAge));
    }

    #[test]
    fn mr_lookup_prefills_and_marks_review() {
        let dir = TempDir::new().expect("temp dir");
        let (store, _backend) = offline_store(&dir);

        let mut form = RegistrationForm {
            mr_number: "758184".into(),
            ..RegistrationForm::default()
        };
        assert!(form.lookup_mr(&store));

        assert_eq!(form.name, "Hari Prasad");
        assert_eq!(form.age, "35");
        assert_eq!(form.city, "Chennai");
        assert_eq!(form.visit_type, VisitType::Review);
        assert_eq!(form.allergies, "Penicillin");
    }

    #[test]
    fn mr_lookup_miss_marks_new() {
        let dir = TempDir::new().expect("temp dir");
        let (store, _backend) = offline_store(&dir);

        let mut form = RegistrationForm {
            mr_number: "000001".into(),
            visit_type: VisitType::Review,
            ..RegistrationForm::default()
        };
        assert!(!form.lookup_mr(&store));
        assert_eq!(form.visit_type, VisitType::New);
    }

    #[test]
    fn submit_blocks_until_required_fields_are_present() {
        let dir = TempDir::new().expect("temp dir");
        let (mut store, backend) = offline_store(&dir);
        let before = store.patients().len();

        let err = RegistrationForm::default()
            .submit(&mut store, &backend, Utc::now())
            .expect_err("empty form should not submit");
        assert!(matches!(err, RegistrationError::MissingFields(_)));
        assert_eq!(store.patients().len(), before);
    }

    #[test]
    fn submit_creates_a_waiting_patient_and_returns_to_the_queue() {
        let dir = TempDir::new().expect("temp dir");
        let (mut store, backend) = offline_store(&dir);

        let now = Utc::now();
        let registered = filled_form()
            .submit(&mut store, &backend, now)
            .expect("submission should succeed");

        assert_eq!(registered.destination, Route::Queue);
        let patient = store
            .get_patient_by_mr("123456")
            .expect("patient should be in the store");
        assert_eq!(patient.name, "Meenakshi S");
        assert_eq!(patient.age, 62);
        assert_eq!(patient.status, "Waiting");
        assert_eq!(patient.assigned_to, "Unassigned");
        assert_eq!(patient.check_in_timestamp, Some(now.timestamp_millis()));
        assert!(!patient.hospital_reg_time.is_empty());
    }

    #[test]
    fn submit_after_mr_lookup_updates_instead_of_duplicating() {
        let dir = TempDir::new().expect("temp dir");
        let (mut store, backend) = offline_store(&dir);
        let before = store.patients().len();

        let mut form = RegistrationForm {
            mr_number: "758184".into(),
            ..RegistrationForm::default()
        };
        assert!(form.lookup_mr(&store));
        form.mobile = "9876543210".into();

        let registered = form
            .submit(&mut store, &backend, Utc::now())
            .expect("submission should succeed");

        assert_eq!(store.patients().len(), before);
        assert_eq!(registered.patient.visit_type, VisitType::Review);
        let patient = store.get_patient_by_mr("758184").expect("patient");
        assert_eq!(patient.mobile, "9876543210");
        assert_eq!(patient.name, "Hari Prasad");
    }

    #[test]
    fn photo_capture_retake_and_remove() {
        let mut form = filled_form();
        assert!(form.photo().is_none());

        form.attach_photo("data:image/png;base64,AAA");
        assert_eq!(form.photo(), Some("data:image/png;base64,AAA"));

        form.attach_photo("data:image/png;base64,BBB");
        assert_eq!(form.photo(), Some("data:image/png;base64,BBB"));

        form.remove_photo();
        assert!(form.photo().is_none());
    }
}
