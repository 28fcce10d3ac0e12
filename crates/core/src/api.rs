//! The backend seam.
//!
//! [`EmrApi`] has one method per REST resource. Implementations (the
//! reqwest-backed `eyenotes-gateway`, in-memory test doubles) return strict
//! `Result`s; the `*_or_default` wrappers provide the degradation contract
//! the views rely on: any failure is logged and collapses to a safe empty
//! value, so a dead backend can never crash a caller.
//!
//! The record store uses the strict form: it needs to know the
//! backend is unavailable to fall back to local state.

use eyenotes_types::{
    MedicalAlert, MrLookup, NewPatient, Patient, PatientUpdate, SaveSectionRequest,
    SectionEnvelope, SectionKind, VisitSummary,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("backend request failed: {0}")]
    Transport(String),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// One operation per REST resource of the `/api` surface.
pub trait EmrApi {
    fn list_patients(&self) -> ApiResult<Vec<Patient>>;

    /// Fetch one patient; `Ok(None)` means not found.
    fn fetch_patient(&self, patient_id: &str) -> ApiResult<Option<Patient>>;

    fn check_mr(&self, mr_number: &str) -> ApiResult<MrLookup>;

    /// Create a patient; the backend assigns the record id.
    fn create_patient(&self, new_patient: &NewPatient) -> ApiResult<Patient>;

    fn update_patient(&self, patient_id: &str, update: &PatientUpdate) -> ApiResult<Patient>;

    fn list_visits(&self, patient_id: &str) -> ApiResult<Vec<VisitSummary>>;

    fn log_visit(&self, patient_id: &str, visit: &VisitSummary) -> ApiResult<VisitSummary>;

    /// Fetch one section record; an absent record is `exists: false`, not an
    /// error.
    fn fetch_section(&self, patient_id: &str, kind: SectionKind) -> ApiResult<SectionEnvelope>;

    /// Upsert one section record keyed by (patient, kind).
    fn save_section(
        &self,
        patient_id: &str,
        kind: SectionKind,
        request: &SaveSectionRequest,
    ) -> ApiResult<SectionEnvelope>;

    fn list_alerts(&self, patient_id: &str) -> ApiResult<Vec<MedicalAlert>>;

    fn add_alert(&self, patient_id: &str, alert: &MedicalAlert) -> ApiResult<MedicalAlert>;

    // Safe-default wrappers. Failures degrade to "no data" and are logged,
    // never surfaced.

    fn list_patients_or_default(&self) -> Vec<Patient> {
        self.list_patients().unwrap_or_else(|e| {
            tracing::warn!("listing patients failed: {e}");
            Vec::new()
        })
    }

    fn fetch_patient_or_default(&self, patient_id: &str) -> Option<Patient> {
        self.fetch_patient(patient_id).unwrap_or_else(|e| {
            tracing::warn!("fetching patient {patient_id} failed: {e}");
            None
        })
    }

    fn check_mr_or_default(&self, mr_number: &str) -> MrLookup {
        self.check_mr(mr_number).unwrap_or_else(|e| {
            tracing::warn!("MR lookup for {mr_number} failed: {e}");
            MrLookup::not_found()
        })
    }

    fn list_visits_or_default(&self, patient_id: &str) -> Vec<VisitSummary> {
        self.list_visits(patient_id).unwrap_or_else(|e| {
            tracing::warn!("listing visits for {patient_id} failed: {e}");
            Vec::new()
        })
    }

    fn fetch_section_or_default(&self, patient_id: &str, kind: SectionKind) -> SectionEnvelope {
        self.fetch_section(patient_id, kind).unwrap_or_else(|e| {
            tracing::warn!("loading {kind} for {patient_id} failed: {e}");
            SectionEnvelope::absent()
        })
    }

    fn list_alerts_or_default(&self, patient_id: &str) -> Vec<MedicalAlert> {
        self.list_alerts(patient_id).unwrap_or_else(|e| {
            tracing::warn!("listing alerts for {patient_id} failed: {e}");
            Vec::new()
        })
    }
}
