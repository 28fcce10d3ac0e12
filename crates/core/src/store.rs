//! The patient record store.
//!
//! Single source of truth for the patient collection shown by the queue and
//! registration views. The backend is authoritative when reachable; otherwise
//! the store falls back to the locally persisted collection, seeding it from
//! a built-in dataset on first run. Local state is rewritten after every
//! mutation so the fallback is always current.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use eyenotes_types::{NewPatient, Patient, PatientUpdate};

use crate::api::EmrApi;
use crate::config::CoreConfig;

mod seed;

/// Layout of the local fallback file: one keyed entry holding the serialized
/// patient collection.
#[derive(Serialize, Deserialize)]
struct LocalState {
    patients: Vec<Patient>,
}

pub struct RecordStore {
    patients: Vec<Patient>,
    local_path: PathBuf,
}

impl RecordStore {
    /// Loads the store: backend first, local file second, built-in seed last.
    ///
    /// Never fails; every failure path degrades to a usable collection and
    /// is logged.
    pub fn open(cfg: &CoreConfig, api: &dyn EmrApi) -> Self {
        let local_path = cfg.local_state_path();

        let patients = match api.list_patients() {
            Ok(patients) => patients,
            Err(e) => {
                tracing::warn!("backend unavailable, falling back to local state: {e}");
                match read_local(&local_path) {
                    Some(patients) => patients,
                    None => seed::seed_patients(chrono::Utc::now().timestamp_millis()),
                }
            }
        };

        let store = Self {
            patients,
            local_path,
        };
        store.flush();
        store
    }

    /// The currently loaded collection, in insertion order.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Pure lookup over the loaded collection.
    pub fn get_patient(&self, patient_id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == patient_id)
    }

    /// Pure lookup by MR number (last write wins, no merge logic).
    pub fn get_patient_by_mr(&self, mr_number: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.mr_number == mr_number)
    }

    /// Registers a patient: backend first; when the backend is unavailable a
    /// local record id is allocated instead.
    pub fn add_patient(&mut self, api: &dyn EmrApi, new_patient: NewPatient) -> Patient {
        let patient = match api.create_patient(&new_patient) {
            Ok(patient) => patient,
            Err(e) => {
                tracing::warn!("backend create failed, keeping patient locally: {e}");
                let id = self.allocate_local_id();
                new_patient.into_patient(id)
            }
        };

        self.patients.push(patient.clone());
        self.flush();
        patient
    }

    /// Updates a patient: backend first; on failure the update is applied to
    /// the local record directly. Returns the updated record, or `None` when
    /// the patient is unknown everywhere.
    pub fn update_patient(
        &mut self,
        api: &dyn EmrApi,
        patient_id: &str,
        update: &PatientUpdate,
    ) -> Option<Patient> {
        let updated = match api.update_patient(patient_id, update) {
            Ok(patient) => {
                if let Some(existing) = self.patients.iter_mut().find(|p| p.id == patient_id) {
                    *existing = patient.clone();
                } else {
                    self.patients.push(patient.clone());
                }
                Some(patient)
            }
            Err(e) => {
                tracing::warn!("backend update failed, applying locally: {e}");
                let existing = self.patients.iter_mut().find(|p| p.id == patient_id)?;
                update.apply_to(existing);
                Some(existing.clone())
            }
        };

        self.flush();
        updated
    }

    /// Rewrites the local fallback file. Failures are logged, never fatal.
    pub fn flush(&self) {
        if let Some(parent) = self.local_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create data directory: {e}");
                return;
            }
        }

        let state = LocalState {
            patients: self.patients.clone(),
        };
        match serde_json::to_string_pretty(&state) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.local_path, json) {
                    tracing::warn!("failed to persist local state: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to serialize local state: {e}"),
        }
    }

    /// Allocates an id in the clinic's `P<digits>` shape, re-rolling on the
    /// (unlikely) collision with a loaded record.
    fn allocate_local_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id = format!("P{}", rng.gen_range(0..1_000_000));
            if self.get_patient(&id).is_none() {
                return id;
            }
        }
    }
}

fn read_local(path: &Path) -> Option<Vec<Patient>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return None,
    };

    match serde_json::from_str::<LocalState>(&contents) {
        Ok(state) => Some(state.patients),
        Err(e) => {
            tracing::warn!("ignoring unreadable local state {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::InMemoryBackend;
    use eyenotes_types::VisitType;
    use tempfile::TempDir;

    fn test_cfg(dir: &TempDir) -> CoreConfig {
        CoreConfig::new("http://localhost:5000/api", dir.path().to_path_buf())
            .expect("config should be accepted")
    }

    fn new_patient(mr: &str, name: &str) -> NewPatient {
        NewPatient {
            mr_number: mr.into(),
            name: name.into(),
            age: 40,
            gender: "Female".into(),
            status: "Waiting".into(),
            ..NewPatient::default()
        }
    }

    #[test]
    fn open_prefers_the_backend_collection() {
        let dir = TempDir::new().expect("temp dir");
        let backend = InMemoryBackend::with_patients(vec![Patient {
            id: "P1".into(),
            mr_number: "111".into(),
            name: "From Backend".into(),
            ..Patient::default()
        }]);

        let store = RecordStore::open(&test_cfg(&dir), &backend);

        assert_eq!(store.patients().len(), 1);
        assert_eq!(store.patients()[0].name, "From Backend");
        assert!(dir.path().join("emr_patients.json").is_file());
    }

    #[test]
    fn open_without_backend_seeds_the_builtin_dataset() {
        let dir = TempDir::new().expect("temp dir");
        let store = RecordStore::open(&test_cfg(&dir), &InMemoryBackend::offline());

        let hari = store
            .get_patient_by_mr("758184")
            .expect("seed should contain MR 758184");
        assert_eq!(hari.name, "Hari Prasad");
        assert_eq!(hari.visit_type, VisitType::Review);
        assert!(hari.check_in_timestamp.is_some());
        assert!(store.patients().len() >= 3);
    }

    #[test]
    fn open_without_backend_reuses_persisted_state() {
        let dir = TempDir::new().expect("temp dir");
        let cfg = test_cfg(&dir);
        let backend = InMemoryBackend::offline();

        let mut store = RecordStore::open(&cfg, &backend);
        let registered = store.add_patient(&backend, new_patient("424242", "Persisted Patient"));

        let reopened = RecordStore::open(&cfg, &backend);
        let found = reopened
            .get_patient(&registered.id)
            .expect("patient should survive a restart");
        assert_eq!(found.name, "Persisted Patient");
    }

    #[test]
    fn add_patient_uses_the_backend_assigned_id() {
        let dir = TempDir::new().expect("temp dir");
        let backend = InMemoryBackend::default();
        let mut store = RecordStore::open(&test_cfg(&dir), &backend);

        let patient = store.add_patient(&backend, new_patient("555555", "Via Backend"));

        assert_eq!(patient.id, "P000001");
        assert!(backend
            .patients
            .borrow()
            .iter()
            .any(|p| p.id == patient.id));
        assert!(store.get_patient(&patient.id).is_some());
    }

    #[test]
    fn add_patient_falls_back_to_a_local_id() {
        let dir = TempDir::new().expect("temp dir");
        let backend = InMemoryBackend::offline();
        let mut store = RecordStore::open(&test_cfg(&dir), &backend);

        let patient = store.add_patient(&backend, new_patient("666666", "Local Only"));

        assert!(patient.id.starts_with('P'));
        assert!(patient.id.len() > 1);
        assert!(store.get_patient_by_mr("666666").is_some());
    }

    #[test]
    fn update_patient_applies_locally_when_backend_is_down() {
        let dir = TempDir::new().expect("temp dir");
        let backend = InMemoryBackend::offline();
        let mut store = RecordStore::open(&test_cfg(&dir), &backend);
        let id = store
            .get_patient_by_mr("758184")
            .expect("seeded patient")
            .id
            .clone();

        let update = PatientUpdate {
            city: Some("Madurai".into()),
            ..PatientUpdate::default()
        };
        let updated = store
            .update_patient(&backend, &id, &update)
            .expect("update should apply locally");

        assert_eq!(updated.city, "Madurai");
        assert_eq!(store.get_patient(&id).expect("patient").city, "Madurai");
    }

    #[test]
    fn update_unknown_patient_returns_none() {
        let dir = TempDir::new().expect("temp dir");
        let backend = InMemoryBackend::offline();
        let mut store = RecordStore::open(&test_cfg(&dir), &backend);

        let update = PatientUpdate::default();
        assert!(store.update_patient(&backend, "P999999x", &update).is_none());
    }

    #[test]
    fn lookups_are_pure_and_miss_cleanly() {
        let dir = TempDir::new().expect("temp dir");
        let store = RecordStore::open(&test_cfg(&dir), &InMemoryBackend::offline());

        assert!(store.get_patient("nope").is_none());
        assert!(store.get_patient_by_mr("000000").is_none());
    }
}
