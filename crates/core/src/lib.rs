//! # eyeNotes core
//!
//! Domain logic for the eyeNotes EMR.
//!
//! This crate contains everything between the wire and the screen:
//! - the clinical-section load/edit/save lifecycle ([`session`])
//! - the patient record store with local fallback ([`store`])
//! - the queue and registration view models ([`queue`], [`registration`])
//! - the backend seam ([`api::EmrApi`]) implemented by `eyenotes-gateway`
//!
//! **No API concerns**: HTTP clients and servers belong in `eyenotes-gateway`
//! and `eyenotes-api-rest`.

pub mod api;
pub mod author;
pub mod config;
pub mod queue;
pub mod registration;
pub mod session;
pub mod shell;
pub mod store;

pub use api::{ApiError, ApiResult, EmrApi};
pub use author::Author;
pub use config::{CoreConfig, CoreError, CoreResult};
pub use registration::{Registered, RegistrationError, RegistrationForm, RequiredField};
pub use queue::{MrChallengeError, QueueRow, WaitSeverity};
pub use session::{LoadOutcome, SaveError, SaveReceipt, SectionSession, SectionStatus};
pub use shell::{Route, Shell};
pub use store::RecordStore;
