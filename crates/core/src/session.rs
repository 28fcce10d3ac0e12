//! The clinical-section lifecycle.
//!
//! Seven clinical note forms share one load/edit/save/display pattern, so the
//! pattern is written once: [`SectionSession`] is generic over the section's
//! payload schema and drives the state machine
//!
//! ```text
//! Loading -> Editing            (no stored record, or load failed)
//! Loading -> Viewing            (stored record found)
//! Viewing -> Editing            (Edit)
//! Editing -> Viewing            (successful Save)
//! Editing -> Viewing | Editing  (Cancel: snapshot restored, or blank form)
//! ```
//!
//! Load failures are logged and treated exactly like "no record yet": they
//! never block editing and are never surfaced. Saves are user-initiated only;
//! nothing retries automatically.

use chrono::{DateTime, Utc};
use eyenotes_types::{SaveSectionRequest, SectionEnvelope, SectionPayload};

use crate::api::{ApiError, EmrApi};
use crate::author::Author;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    Loading,
    Editing,
    Viewing,
}

/// Ticket handed out by [`SectionSession::begin_load`].
///
/// A slow fetch can resolve after the clinician has started another load or
/// begun editing; the ticket's generation lets the session recognise and
/// discard such stale responses instead of clobbering newer state.
#[derive(Debug, Clone, Copy)]
pub struct LoadRequest {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored record was found and populated the form.
    Loaded,
    /// No stored record (or the fetch failed); the blank form is editable.
    Empty,
    /// The response was stale and ignored.
    Discarded,
}

/// Confirmation returned by a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub saved_at: DateTime<Utc>,
    pub saved_by: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to encode section payload: {0}")]
    Encode(serde_json::Error),
    #[error("save failed: {0}")]
    Backend(ApiError),
}

/// Presents, edits and persists exactly one clinical section record for one
/// patient.
#[derive(Debug)]
pub struct SectionSession<P: SectionPayload> {
    patient_id: String,
    status: SectionStatus,
    payload: P,
    saved_snapshot: Option<P>,
    saved_at: Option<DateTime<Utc>>,
    saved_by: Option<String>,
    generation: u64,
    dirty: bool,
}

impl<P: SectionPayload> SectionSession<P> {
    /// Opens a session for one patient, ready to load.
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            status: SectionStatus::Loading,
            payload: P::default(),
            saved_snapshot: None,
            saved_at: None,
            saved_by: None,
            generation: 0,
            dirty: false,
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn status(&self) -> SectionStatus {
        self.status
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// The payload as presented when viewing a saved record: list-bearing
    /// sections drop rows whose fields are all blank. Display only; the
    /// stored payload is untouched.
    pub fn display_payload(&self) -> P {
        self.payload.for_display()
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    pub fn saved_by(&self) -> Option<&str> {
        self.saved_by.as_deref()
    }

    /// Whether a persisted record backs this session.
    pub fn has_saved_record(&self) -> bool {
        self.saved_snapshot.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Starts a load attempt and returns its staleness ticket.
    pub fn begin_load(&mut self) -> LoadRequest {
        self.generation += 1;
        if !self.dirty {
            self.status = SectionStatus::Loading;
        }
        LoadRequest {
            generation: self.generation,
        }
    }

    /// Applies a fetched envelope to the session.
    ///
    /// The response is discarded when a newer load attempt has started since
    /// the ticket was issued, or when unsaved edits exist.
    pub fn apply_load(&mut self, request: LoadRequest, envelope: SectionEnvelope) -> LoadOutcome {
        if request.generation != self.generation || self.dirty {
            tracing::debug!(
                patient = %self.patient_id,
                section = %P::KIND,
                "discarding stale section load"
            );
            return LoadOutcome::Discarded;
        }

        if envelope.exists {
            if let Some(payload) = envelope.decode::<P>() {
                self.payload = payload.clone();
                self.saved_snapshot = Some(payload);
                self.saved_at = envelope.updated_at.or(envelope.created_at);
                self.saved_by = envelope.created_by;
                self.status = SectionStatus::Viewing;
                return LoadOutcome::Loaded;
            }
            tracing::warn!(
                patient = %self.patient_id,
                section = %P::KIND,
                "stored section payload did not match its schema; starting blank"
            );
        }

        self.status = SectionStatus::Editing;
        LoadOutcome::Empty
    }

    /// Fetches the stored record and applies it in one step.
    ///
    /// Fetch failures degrade to an absent record inside the gateway wrapper,
    /// so this never errors: the clinician lands in an empty editable form.
    pub fn load(&mut self, api: &dyn EmrApi) -> LoadOutcome {
        let request = self.begin_load();
        let envelope = api.fetch_section_or_default(&self.patient_id, P::KIND);
        self.apply_load(request, envelope)
    }

    /// Switches a saved record into the editable state.
    pub fn start_editing(&mut self) {
        if self.status == SectionStatus::Viewing {
            self.status = SectionStatus::Editing;
        }
    }

    /// Mutates the editable payload. Pure local state: no side effects beyond
    /// marking the session dirty.
    pub fn edit(&mut self, mutate: impl FnOnce(&mut P)) {
        mutate(&mut self.payload);
        self.dirty = true;
        self.status = SectionStatus::Editing;
    }

    /// Serialises the full payload plus the authenticated author and submits
    /// it as an upsert keyed by (patient, section-kind).
    ///
    /// # Errors
    ///
    /// On failure the session stays in the editable state with the payload
    /// intact; the clinician may retry indefinitely.
    pub fn save(&mut self, api: &dyn EmrApi, author: &Author) -> Result<SaveReceipt, SaveError> {
        let data = serde_json::to_value(&self.payload).map_err(SaveError::Encode)?;
        let request = SaveSectionRequest {
            data,
            created_by: author.name.clone(),
        };

        let envelope = api
            .save_section(&self.patient_id, P::KIND, &request)
            .map_err(SaveError::Backend)?;

        self.saved_snapshot = Some(self.payload.clone());
        self.saved_at = Some(
            envelope
                .updated_at
                .or(envelope.created_at)
                .unwrap_or_else(Utc::now),
        );
        self.saved_by = Some(author.name.clone());
        self.dirty = false;
        self.status = SectionStatus::Viewing;

        Ok(SaveReceipt {
            saved_at: self.saved_at.unwrap_or_else(Utc::now),
            saved_by: author.name.clone(),
        })
    }

    /// Discards in-progress edits: back to the last persisted snapshot, or to
    /// the blank form if nothing was ever saved.
    pub fn cancel(&mut self) {
        self.dirty = false;
        match &self.saved_snapshot {
            Some(snapshot) => {
                self.payload = snapshot.clone();
                self.status = SectionStatus::Viewing;
            }
            None => {
                self.payload = P::default();
                self.status = SectionStatus::Editing;
            }
        }
    }
}
