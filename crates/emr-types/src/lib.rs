//! # eyeNotes types
//!
//! Wire-facing data model for the eyeNotes EMR.
//!
//! This crate contains pure data types shared by the backend gateway, the
//! domain crate and the reference REST backend:
//! - Patient demographics and visit history
//! - Clinical section kinds, payload schemas and the stored-record envelope
//! - Derived medical alerts
//! - Validated text types (MR numbers, required text fields)
//!
//! **No behaviour concerns**: HTTP, storage and the section lifecycle live in
//! `eyenotes-gateway`, `eyenotes-api-rest` and `eyenotes-core`.

pub mod alerts;
pub mod patient;
pub mod sections;
pub mod text;

pub use alerts::{derive_alerts, AlertType, MedicalAlert};
pub use patient::{MrLookup, NewPatient, Patient, PatientUpdate, VisitSummary, VisitType};
pub use sections::{
    AntSegmentExamPayload, ComplaintsPayload, DiagnosisPayload, EyePair, FundusExamPayload,
    HistoryPayload, InvestigationEntry, InvestigationPayload, RefractionPayload, SaveSectionRequest,
    SectionEnvelope, SectionKind, SectionPayload, SpectacleRecord, SystemicCondition,
    UnknownSectionKind,
};
pub use text::{MrNumber, NonEmptyText, TextError};
