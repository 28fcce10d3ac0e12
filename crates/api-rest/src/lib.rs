//! # eyeNotes REST API
//!
//! Reference REST backend for the eyeNotes EMR.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Storage is the file-backed [`repo::PatientRepo`]; domain logic lives in
//! `eyenotes-core`.

#![warn(rust_2018_idioms)]

pub mod handlers;
pub mod repo;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use eyenotes_types::{
    MedicalAlert, MrLookup, NewPatient, Patient, PatientUpdate, SaveSectionRequest,
    SectionEnvelope, SectionKind, VisitSummary,
};

pub use repo::{PatientRepo, RepoError};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<PatientRepo>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_patients,
        handlers::get_patient,
        handlers::check_mr,
        handlers::create_patient,
        handlers::update_patient,
        handlers::list_visits,
        handlers::log_visit,
        handlers::list_alerts,
        handlers::add_alert,
        handlers::all_sections,
        handlers::get_section,
        handlers::save_section,
        handlers::delete_section,
    ),
    components(schemas(
        handlers::HealthRes,
        Patient,
        NewPatient,
        PatientUpdate,
        VisitSummary,
        MedicalAlert,
        MrLookup,
        SectionEnvelope,
        SaveSectionRequest,
        SectionKind,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router, CORS open for the clinic front-end.
pub fn router(repo: Arc<PatientRepo>) -> Router {
    let api = Router::new()
        .route(
            "/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/patients/:id",
            get(handlers::get_patient).put(handlers::update_patient),
        )
        .route("/patients/mr/:mr_number", get(handlers::check_mr))
        .route(
            "/patients/:id/visits",
            get(handlers::list_visits).post(handlers::log_visit),
        )
        .route(
            "/patients/:id/alerts",
            get(handlers::list_alerts).post(handlers::add_alert),
        )
        .route("/patients/:id/emr", get(handlers::all_sections))
        .route(
            "/patients/:id/emr/:section_kind",
            get(handlers::get_section)
                .post(handlers::save_section)
                .delete(handlers::delete_section),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(AppState { repo })
}
