//! # eyeNotes gateway
//!
//! The backend gateway: a thin HTTP client wrapping the `/api` REST surface.
//!
//! [`RestGateway`] implements [`eyenotes_core::EmrApi`], so the record store,
//! the section lifecycle and the views never see HTTP. Strict errors are
//! typed; the degradation contract (failures collapse to empty data) comes
//! from the trait's `*_or_default` wrappers.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use eyenotes_core::{ApiError, ApiResult, EmrApi};
use eyenotes_types::{
    MedicalAlert, MrLookup, NewPatient, Patient, PatientUpdate, SaveSectionRequest,
    SectionEnvelope, SectionKind, VisitSummary,
};

/// Default per-request timeout. Requests are fire-and-await between user
/// interactions, so a stuck backend must fail fast enough to fall back.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the eyeNotes REST backend.
pub struct RestGateway {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RestGateway {
    /// Creates a gateway for a base URL including the `/api` prefix, e.g.
    /// `http://localhost:5000/api`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the underlying client cannot be
    /// built.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(transport_error)?;
        decode(response)
    }

    /// GET where a 404 means "not found" rather than a failure.
    fn get_optional<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Option<T>> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(transport_error)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).map(Some)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(transport_error)?;
        decode(response)
    }

    fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .map_err(transport_error)?;
        decode(response)
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_connect() {
        ApiError::Transport(format!("backend unreachable: {e}"))
    } else if e.is_timeout() {
        ApiError::Transport("request timed out".into())
    } else {
        ApiError::Transport(e.to_string())
    }
}

fn decode<T: DeserializeOwned>(response: reqwest::blocking::Response) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}

impl EmrApi for RestGateway {
    fn list_patients(&self) -> ApiResult<Vec<Patient>> {
        self.get("/patients")
    }

    fn fetch_patient(&self, patient_id: &str) -> ApiResult<Option<Patient>> {
        self.get_optional(&format!("/patients/{patient_id}"))
    }

    fn check_mr(&self, mr_number: &str) -> ApiResult<MrLookup> {
        self.get(&format!("/patients/mr/{mr_number}"))
    }

    fn create_patient(&self, new_patient: &NewPatient) -> ApiResult<Patient> {
        self.post("/patients", new_patient)
    }

    fn update_patient(&self, patient_id: &str, update: &PatientUpdate) -> ApiResult<Patient> {
        self.put(&format!("/patients/{patient_id}"), update)
    }

    fn list_visits(&self, patient_id: &str) -> ApiResult<Vec<VisitSummary>> {
        self.get(&format!("/patients/{patient_id}/visits"))
    }

    fn log_visit(&self, patient_id: &str, visit: &VisitSummary) -> ApiResult<VisitSummary> {
        self.post(&format!("/patients/{patient_id}/visits"), visit)
    }

    fn fetch_section(&self, patient_id: &str, kind: SectionKind) -> ApiResult<SectionEnvelope> {
        self.get(&format!("/patients/{patient_id}/emr/{kind}"))
    }

    fn save_section(
        &self,
        patient_id: &str,
        kind: SectionKind,
        request: &SaveSectionRequest,
    ) -> ApiResult<SectionEnvelope> {
        self.post(&format!("/patients/{patient_id}/emr/{kind}"), request)
    }

    fn list_alerts(&self, patient_id: &str) -> ApiResult<Vec<MedicalAlert>> {
        self.get(&format!("/patients/{patient_id}/alerts"))
    }

    fn add_alert(&self, patient_id: &str, alert: &MedicalAlert) -> ApiResult<MedicalAlert> {
        self.post(&format!("/patients/{patient_id}/alerts"), alert)
    }
}
