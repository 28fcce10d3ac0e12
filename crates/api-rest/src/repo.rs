//! File-backed patient repository.
//!
//! One directory per patient under `<data_dir>/patients/<id>/`, holding
//! `patient.json`, `visits.json`, `alerts.json` and one
//! `sections/<kind>.json` per saved clinical section. All operations run
//! under one lock; the store is small enough that read-modify-write over
//! whole files is the simplest correct thing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use eyenotes_types::{
    derive_alerts, MedicalAlert, NewPatient, Patient, PatientUpdate, SectionEnvelope, SectionKind,
    VisitSummary, VisitType,
};

const PATIENTS_DIR: &str = "patients";
const PATIENT_FILE: &str = "patient.json";
const VISITS_FILE: &str = "visits.json";
const ALERTS_FILE: &str = "alerts.json";
const SECTIONS_DIR: &str = "sections";

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("patient not found: {0}")]
    PatientNotFound(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record: {0}")]
    Deserialization(serde_json::Error),
}

pub type RepoResult<T> = std::result::Result<T, RepoError>;

/// Stored form of one clinical section record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSection {
    data: serde_json::Value,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredSection {
    fn into_envelope(self) -> SectionEnvelope {
        SectionEnvelope {
            exists: true,
            data: Some(self.data),
            created_by: Some(self.created_by),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

pub struct PatientRepo {
    root: PathBuf,
    lock: Mutex<()>,
}

impl PatientRepo {
    /// Opens (and creates if needed) the repository under `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>) -> RepoResult<Self> {
        let root = data_dir.into();
        fs::create_dir_all(root.join(PATIENTS_DIR)).map_err(RepoError::StorageDirCreation)?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    fn patient_dir(&self, patient_id: &str) -> PathBuf {
        self.root.join(PATIENTS_DIR).join(patient_id)
    }

    /// Lists all patients. Records that fail to parse are logged and
    /// skipped rather than failing the listing.
    pub fn list_patients(&self) -> RepoResult<Vec<Patient>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut patients = Vec::new();
        let entries = match fs::read_dir(self.root.join(PATIENTS_DIR)) {
            Ok(entries) => entries,
            Err(_) => return Ok(patients),
        };

        for entry in entries.flatten() {
            let path = entry.path().join(PATIENT_FILE);
            if !path.is_file() {
                continue;
            }
            match read_json::<Patient>(&path) {
                Ok(patient) => patients.push(patient),
                Err(e) => {
                    tracing::warn!("skipping unreadable patient record {}: {e}", path.display());
                }
            }
        }

        patients.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(patients)
    }

    /// Fetches one patient with visit history and alert rows attached.
    pub fn find_patient(&self, patient_id: &str) -> RepoResult<Option<Patient>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_patient_with_children(patient_id)
    }

    pub fn find_by_mr(&self, mr_number: &str) -> RepoResult<Option<Patient>> {
        let id = self
            .list_patients()?
            .into_iter()
            .find(|p| p.mr_number == mr_number)
            .map(|p| p.id);

        match id {
            Some(id) => self.find_patient(&id),
            None => Ok(None),
        }
    }

    /// Creates a patient: assigns the record id, logs the initial visit and
    /// materializes alert rows from the allergy/condition free text.
    pub fn create_patient(&self, new_patient: NewPatient, now: DateTime<Utc>) -> RepoResult<Patient> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let id = self.allocate_patient_id(now);
        let dir = self.patient_dir(&id);
        fs::create_dir_all(dir.join(SECTIONS_DIR)).map_err(RepoError::StorageDirCreation)?;

        let patient = new_patient.into_patient(id);
        write_json(&dir.join(PATIENT_FILE), &patient)?;

        let initial_visit = VisitSummary {
            id: 1,
            date: now.format("%d-%b-%y").to_string(),
            location: "CHN".into(),
            purpose: (!patient.purpose.is_empty()).then(|| patient.purpose.clone()),
            ..VisitSummary::default()
        };
        write_json(&dir.join(VISITS_FILE), &vec![initial_visit])?;

        let alerts = derive_alerts(&patient);
        write_json(&dir.join(ALERTS_FILE), &alerts)?;

        Ok(patient)
    }

    pub fn update_patient(
        &self,
        patient_id: &str,
        update: &PatientUpdate,
    ) -> RepoResult<Option<Patient>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = self.patient_dir(patient_id).join(PATIENT_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let mut patient = read_json::<Patient>(&path)?;
        update.apply_to(&mut patient);
        write_json(&path, &patient)?;
        Ok(Some(patient))
    }

    pub fn visits(&self, patient_id: &str) -> RepoResult<Vec<VisitSummary>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_visits(patient_id)
    }

    /// Appends a visit and updates the patient's last-visit metadata; the
    /// patient flips to review on their next registration.
    pub fn add_visit(
        &self,
        patient_id: &str,
        visit: VisitSummary,
        now: DateTime<Utc>,
    ) -> RepoResult<VisitSummary> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let dir = self.patient_dir(patient_id);
        let patient_path = dir.join(PATIENT_FILE);
        if !patient_path.is_file() {
            return Err(RepoError::PatientNotFound(patient_id.to_owned()));
        }

        let mut visits = self.read_visits(patient_id)?;
        let mut logged = visit;
        logged.id = visits.len() as u32 + 1;
        if logged.date.is_empty() {
            logged.date = now.format("%d-%b-%y").to_string();
        }
        if logged.location.is_empty() {
            logged.location = "CHN".into();
        }
        visits.push(logged.clone());
        write_json(&dir.join(VISITS_FILE), &visits)?;

        let mut patient = read_json::<Patient>(&patient_path)?;
        patient.last_visit_date = now.format("%d/%m/%Y").to_string();
        patient.last_clinic = logged.clinic.clone().unwrap_or_else(|| "CHN".into());
        patient.visit_type = VisitType::Review;
        write_json(&patient_path, &patient)?;

        Ok(logged)
    }

    pub fn alerts(&self, patient_id: &str) -> RepoResult<Vec<MedicalAlert>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        read_json_or_default(&self.patient_dir(patient_id).join(ALERTS_FILE))
    }

    pub fn add_alert(&self, patient_id: &str, alert: MedicalAlert) -> RepoResult<MedicalAlert> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let dir = self.patient_dir(patient_id);
        if !dir.join(PATIENT_FILE).is_file() {
            return Err(RepoError::PatientNotFound(patient_id.to_owned()));
        }

        let mut alerts: Vec<MedicalAlert> = read_json_or_default(&dir.join(ALERTS_FILE))?;
        alerts.push(alert.clone());
        write_json(&dir.join(ALERTS_FILE), &alerts)?;
        Ok(alert)
    }

    /// Fetches one section record; an absent record is `exists: false`.
    pub fn section(&self, patient_id: &str, kind: SectionKind) -> RepoResult<SectionEnvelope> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = self.section_path(patient_id, kind);
        if !path.is_file() {
            return Ok(SectionEnvelope::absent());
        }
        Ok(read_json::<StoredSection>(&path)?.into_envelope())
    }

    /// All stored sections of a patient, keyed by wire name.
    pub fn all_sections(
        &self,
        patient_id: &str,
    ) -> RepoResult<std::collections::BTreeMap<String, SectionEnvelope>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut sections = std::collections::BTreeMap::new();
        for kind in SectionKind::ALL {
            let path = self.section_path(patient_id, kind);
            if path.is_file() {
                let stored = read_json::<StoredSection>(&path)?;
                sections.insert(kind.as_str().to_owned(), stored.into_envelope());
            }
        }
        Ok(sections)
    }

    /// Upserts one section record keyed by (patient, kind): the payload and
    /// `updated_at` change, `created_at` and `created_by` are preserved from
    /// the first save.
    pub fn upsert_section(
        &self,
        patient_id: &str,
        kind: SectionKind,
        data: serde_json::Value,
        created_by: String,
        now: DateTime<Utc>,
    ) -> RepoResult<SectionEnvelope> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let dir = self.patient_dir(patient_id);
        if !dir.join(PATIENT_FILE).is_file() {
            return Err(RepoError::PatientNotFound(patient_id.to_owned()));
        }

        let path = self.section_path(patient_id, kind);
        let existing = if path.is_file() {
            Some(read_json::<StoredSection>(&path)?)
        } else {
            None
        };

        let stored = StoredSection {
            data,
            created_by: existing
                .as_ref()
                .map(|s| s.created_by.clone())
                .unwrap_or(created_by),
            created_at: existing.map(|s| s.created_at).unwrap_or(now),
            updated_at: now,
        };

        fs::create_dir_all(dir.join(SECTIONS_DIR)).map_err(RepoError::StorageDirCreation)?;
        write_json(&path, &stored)?;
        Ok(stored.into_envelope())
    }

    /// Removes a stored section record; returns whether one existed.
    pub fn delete_section(&self, patient_id: &str, kind: SectionKind) -> RepoResult<bool> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = self.section_path(patient_id, kind);
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(RepoError::FileWrite)?;
        Ok(true)
    }

    fn section_path(&self, patient_id: &str, kind: SectionKind) -> PathBuf {
        self.patient_dir(patient_id)
            .join(SECTIONS_DIR)
            .join(format!("{}.json", kind.as_str()))
    }

    fn read_visits(&self, patient_id: &str) -> RepoResult<Vec<VisitSummary>> {
        read_json_or_default(&self.patient_dir(patient_id).join(VISITS_FILE))
    }

    fn read_patient_with_children(&self, patient_id: &str) -> RepoResult<Option<Patient>> {
        let dir = self.patient_dir(patient_id);
        let path = dir.join(PATIENT_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let mut patient = read_json::<Patient>(&path)?;
        patient.visit_history = read_json_or_default(&dir.join(VISITS_FILE))?;
        patient.medical_alerts = read_json_or_default(&dir.join(ALERTS_FILE))?;
        Ok(Some(patient))
    }

    /// Allocates a clinic-style `P<digits>` id from the creation instant,
    /// bumping on the (unlikely) collision with an existing directory.
    fn allocate_patient_id(&self, now: DateTime<Utc>) -> String {
        let mut seq = (now.timestamp_millis() % 1_000_000) as u32;
        loop {
            let id = format!("P{seq}");
            if !self.patient_dir(&id).exists() {
                return id;
            }
            seq = (seq + 1) % 1_000_000;
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> RepoResult<T> {
    let contents = fs::read_to_string(path).map_err(RepoError::FileRead)?;
    serde_json::from_str(&contents).map_err(RepoError::Deserialization)
}

/// Reads a child-record file, treating a missing file as empty.
fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> RepoResult<T> {
    if !path.is_file() {
        return Ok(T::default());
    }
    read_json(path)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RepoResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(RepoError::Serialization)?;
    fs::write(path, json).map_err(RepoError::FileWrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> PatientRepo {
        PatientRepo::open(dir.path()).expect("repo should open")
    }

    fn new_patient() -> NewPatient {
        NewPatient {
            mr_number: "758184".into(),
            name: "Hari Prasad".into(),
            age: 35,
            purpose: "Post Surgical Followup".into(),
            allergies: "Penicillin".into(),
            conditions: "Diabetic".into(),
            status: "Waiting".into(),
            ..NewPatient::default()
        }
    }

    #[test]
    fn create_assigns_an_id_and_logs_the_initial_visit() {
        let dir = TempDir::new().expect("temp dir");
        let repo = repo(&dir);

        let patient = repo
            .create_patient(new_patient(), Utc::now())
            .expect("create should succeed");
        assert!(patient.id.starts_with('P'));

        let fetched = repo
            .find_patient(&patient.id)
            .expect("find should succeed")
            .expect("patient should exist");
        assert_eq!(fetched.visit_history.len(), 1);
        assert_eq!(fetched.visit_history[0].id, 1);
        assert_eq!(fetched.visit_history[0].location, "CHN");

        // Alert rows materialized from the free text.
        let alerts = repo.alerts(&patient.id).expect("alerts should read");
        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn ids_do_not_collide_for_same_instant_creates() {
        let dir = TempDir::new().expect("temp dir");
        let repo = repo(&dir);
        let now = Utc::now();

        let first = repo.create_patient(new_patient(), now).expect("create");
        let second = repo.create_patient(new_patient(), now).expect("create");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn find_by_mr_attaches_children() {
        let dir = TempDir::new().expect("temp dir");
        let repo = repo(&dir);
        repo.create_patient(new_patient(), Utc::now())
            .expect("create");

        let found = repo
            .find_by_mr("758184")
            .expect("lookup should succeed")
            .expect("patient should exist");
        assert_eq!(found.name, "Hari Prasad");
        assert_eq!(found.visit_history.len(), 1);
        assert!(repo.find_by_mr("000000").expect("lookup").is_none());
    }

    #[test]
    fn upsert_preserves_creation_metadata() {
        let dir = TempDir::new().expect("temp dir");
        let repo = repo(&dir);
        let patient = repo
            .create_patient(new_patient(), Utc::now())
            .expect("create");

        let first_now = Utc::now();
        let first = repo
            .upsert_section(
                &patient.id,
                SectionKind::Diagnosis,
                serde_json::json!({"diagnoses": ["RE POAG"]}),
                "Dr. A".into(),
                first_now,
            )
            .expect("first save");

        let second = repo
            .upsert_section(
                &patient.id,
                SectionKind::Diagnosis,
                serde_json::json!({"diagnoses": ["RE POAG", "LE POAG"]}),
                "Dr. B".into(),
                first_now + chrono::Duration::minutes(5),
            )
            .expect("second save");

        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.created_by.as_deref(), Some("Dr. A"));
        assert!(second.updated_at > second.created_at);

        let stored = repo
            .section(&patient.id, SectionKind::Diagnosis)
            .expect("fetch");
        assert_eq!(
            stored.data,
            Some(serde_json::json!({"diagnoses": ["RE POAG", "LE POAG"]}))
        );
    }

    #[test]
    fn absent_section_reads_as_not_existing() {
        let dir = TempDir::new().expect("temp dir");
        let repo = repo(&dir);
        let patient = repo
            .create_patient(new_patient(), Utc::now())
            .expect("create");

        let envelope = repo
            .section(&patient.id, SectionKind::FundusExam)
            .expect("fetch");
        assert!(!envelope.exists);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn logging_a_visit_updates_last_visit_metadata() {
        let dir = TempDir::new().expect("temp dir");
        let repo = repo(&dir);
        let patient = repo
            .create_patient(new_patient(), Utc::now())
            .expect("create");

        let visit = VisitSummary {
            clinic: Some("GLAUCOMA CLINIC".into()),
            has_glaucoma: true,
            ..VisitSummary::default()
        };
        let logged = repo
            .add_visit(&patient.id, visit, Utc::now())
            .expect("visit should log");
        assert_eq!(logged.id, 2);

        let updated = repo
            .find_patient(&patient.id)
            .expect("find")
            .expect("exists");
        assert_eq!(updated.last_clinic, "GLAUCOMA CLINIC");
        assert_eq!(updated.visit_type, VisitType::Review);
        assert_eq!(updated.visit_history.len(), 2);
    }

    #[test]
    fn operations_on_unknown_patients() {
        let dir = TempDir::new().expect("temp dir");
        let repo = repo(&dir);

        assert!(repo.find_patient("P0").expect("find").is_none());
        assert!(repo.visits("P0").expect("visits").is_empty());
        assert!(matches!(
            repo.add_visit("P0", VisitSummary::default(), Utc::now()),
            Err(RepoError::PatientNotFound(_))
        ));
        assert!(matches!(
            repo.upsert_section(
                "P0",
                SectionKind::Diagnosis,
                serde_json::json!({}),
                "Dr. A".into(),
                Utc::now()
            ),
            Err(RepoError::PatientNotFound(_))
        ));
    }

    #[test]
    fn delete_section_reports_existence() {
        let dir = TempDir::new().expect("temp dir");
        let repo = repo(&dir);
        let patient = repo
            .create_patient(new_patient(), Utc::now())
            .expect("create");

        assert!(!repo
            .delete_section(&patient.id, SectionKind::Diagnosis)
            .expect("delete"));

        repo.upsert_section(
            &patient.id,
            SectionKind::Diagnosis,
            serde_json::json!({"diagnoses": []}),
            "Dr. A".into(),
            Utc::now(),
        )
        .expect("save");
        assert!(repo
            .delete_section(&patient.id, SectionKind::Diagnosis)
            .expect("delete"));
    }
}
