//! REST handlers for the `/api` surface.
//!
//! Failures map to plain status codes: unknown records are 404, storage
//! failures are logged and surface as 500 with a generic message.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use eyenotes_types::{
    MedicalAlert, MrLookup, NewPatient, Patient, PatientUpdate, SaveSectionRequest,
    SectionEnvelope, SectionKind, VisitSummary,
};

use crate::repo::RepoError;
use crate::AppState;

type HandlerError = (StatusCode, &'static str);

fn storage_error(e: RepoError) -> HandlerError {
    match e {
        RepoError::PatientNotFound(_) => (StatusCode::NOT_FOUND, "patient not found"),
        other => {
            tracing::error!("storage error: {other}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

/// Health check response.
#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check response", body = HealthRes))
)]
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "eyeNotes is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "List of patients", body = [Patient]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<Patient>>, HandlerError> {
    let patients = state.repo.list_patients().map_err(storage_error)?;
    Ok(Json(patients))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = String, Path, description = "Patient record id")),
    responses(
        (status = 200, description = "Patient with visit history and alerts", body = Patient),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, HandlerError> {
    match state.repo.find_patient(&id).map_err(storage_error)? {
        Some(patient) => Ok(Json(patient)),
        None => Err((StatusCode::NOT_FOUND, "patient not found")),
    }
}

#[utoipa::path(
    get,
    path = "/api/patients/mr/{mrNumber}",
    params(("mrNumber" = String, Path, description = "Medical-record number")),
    responses((status = 200, description = "Whether the MR number is registered", body = MrLookup))
)]
pub async fn check_mr(
    State(state): State<AppState>,
    Path(mr_number): Path<String>,
) -> Result<Json<MrLookup>, HandlerError> {
    let lookup = match state.repo.find_by_mr(&mr_number).map_err(storage_error)? {
        Some(patient) => MrLookup::found(patient),
        None => MrLookup::not_found(),
    };
    Ok(Json(lookup))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = NewPatient,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_patient(
    State(state): State<AppState>,
    Json(new_patient): Json<NewPatient>,
) -> Result<(StatusCode, Json<Patient>), HandlerError> {
    let patient = state
        .repo
        .create_patient(new_patient, Utc::now())
        .map_err(storage_error)?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    params(("id" = String, Path, description = "Patient record id")),
    request_body = PatientUpdate,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<PatientUpdate>,
) -> Result<Json<Patient>, HandlerError> {
    match state
        .repo
        .update_patient(&id, &update)
        .map_err(storage_error)?
    {
        Some(patient) => Ok(Json(patient)),
        None => Err((StatusCode::NOT_FOUND, "patient not found")),
    }
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/visits",
    params(("id" = String, Path, description = "Patient record id")),
    responses((status = 200, description = "Visit history, oldest first", body = [VisitSummary]))
)]
pub async fn list_visits(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<VisitSummary>>, HandlerError> {
    let visits = state.repo.visits(&id).map_err(storage_error)?;
    Ok(Json(visits))
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/visits",
    params(("id" = String, Path, description = "Patient record id")),
    request_body = VisitSummary,
    responses(
        (status = 201, description = "Visit logged", body = VisitSummary),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn log_visit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(visit): Json<VisitSummary>,
) -> Result<(StatusCode, Json<VisitSummary>), HandlerError> {
    let logged = state
        .repo
        .add_visit(&id, visit, Utc::now())
        .map_err(storage_error)?;
    Ok((StatusCode::CREATED, Json(logged)))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/alerts",
    params(("id" = String, Path, description = "Patient record id")),
    responses((status = 200, description = "Active medical alerts", body = [MedicalAlert]))
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MedicalAlert>>, HandlerError> {
    let alerts = state.repo.alerts(&id).map_err(storage_error)?;
    Ok(Json(alerts))
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/alerts",
    params(("id" = String, Path, description = "Patient record id")),
    request_body = MedicalAlert,
    responses(
        (status = 201, description = "Alert added", body = MedicalAlert),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn add_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(alert): Json<MedicalAlert>,
) -> Result<(StatusCode, Json<MedicalAlert>), HandlerError> {
    let added = state.repo.add_alert(&id, alert).map_err(storage_error)?;
    Ok((StatusCode::CREATED, Json(added)))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/emr",
    params(("id" = String, Path, description = "Patient record id")),
    responses((status = 200, description = "All stored sections keyed by section kind"))
)]
pub async fn all_sections(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BTreeMap<String, SectionEnvelope>>, HandlerError> {
    let sections = state.repo.all_sections(&id).map_err(storage_error)?;
    Ok(Json(sections))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/emr/{sectionKind}",
    params(
        ("id" = String, Path, description = "Patient record id"),
        ("sectionKind" = String, Path, description = "Clinical section kind")
    ),
    responses((status = 200, description = "Stored section record, or exists=false", body = SectionEnvelope))
)]
pub async fn get_section(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, SectionKind)>,
) -> Result<Json<SectionEnvelope>, HandlerError> {
    let envelope = state.repo.section(&id, kind).map_err(storage_error)?;
    Ok(Json(envelope))
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/emr/{sectionKind}",
    params(
        ("id" = String, Path, description = "Patient record id"),
        ("sectionKind" = String, Path, description = "Clinical section kind")
    ),
    request_body = SaveSectionRequest,
    responses(
        (status = 201, description = "Section record upserted", body = SectionEnvelope),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn save_section(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, SectionKind)>,
    Json(request): Json<SaveSectionRequest>,
) -> Result<(StatusCode, Json<SectionEnvelope>), HandlerError> {
    let envelope = state
        .repo
        .upsert_section(&id, kind, request.data, request.created_by, Utc::now())
        .map_err(storage_error)?;
    Ok((StatusCode::CREATED, Json(envelope)))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{id}/emr/{sectionKind}",
    params(
        ("id" = String, Path, description = "Patient record id"),
        ("sectionKind" = String, Path, description = "Clinical section kind")
    ),
    responses(
        (status = 204, description = "Section record deleted"),
        (status = 404, description = "No stored record for this section")
    )
)]
pub async fn delete_section(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, SectionKind)>,
) -> Result<StatusCode, HandlerError> {
    if state.repo.delete_section(&id, kind).map_err(storage_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "no stored record for this section"))
    }
}
