//! Clinical section records.
//!
//! A section record is one JSON payload per (patient, section-kind) pair,
//! wrapped in an envelope carrying authorship and timestamps. The seven
//! payload schemas live in the submodules; everything that varies between
//! sections is captured by the [`SectionPayload`] trait so the lifecycle in
//! `eyenotes-core` is written once.

mod ant_segment;
mod complaints;
mod diagnosis;
mod fundus;
mod history;
mod investigation;
mod refraction;

pub use ant_segment::AntSegmentExamPayload;
pub use complaints::ComplaintsPayload;
pub use diagnosis::DiagnosisPayload;
pub use fundus::FundusExamPayload;
pub use history::{HistoryPayload, SystemicCondition};
pub use investigation::{InvestigationEntry, InvestigationPayload};
pub use refraction::{RefractionPayload, SpectacleRecord};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The fixed clinical note categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Complaints,
    History,
    Diagnosis,
    Investigation,
    FundusExam,
    AntSegmentExam,
    Refraction,
}

impl SectionKind {
    /// All kinds, in sidebar order.
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Complaints,
        SectionKind::History,
        SectionKind::Refraction,
        SectionKind::Investigation,
        SectionKind::AntSegmentExam,
        SectionKind::FundusExam,
        SectionKind::Diagnosis,
    ];

    /// The wire name used in `/patients/{id}/emr/{sectionKind}` paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Complaints => "complaints",
            SectionKind::History => "history",
            SectionKind::Diagnosis => "diagnosis",
            SectionKind::Investigation => "investigation",
            SectionKind::FundusExam => "fundusexam",
            SectionKind::AntSegmentExam => "antsegmentexam",
            SectionKind::Refraction => "refraction",
        }
    }

    /// Human-readable title for menus and headers.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Complaints => "Complaints & Ocular History",
            SectionKind::History => "History",
            SectionKind::Diagnosis => "Diagnosis",
            SectionKind::Investigation => "Investigation",
            SectionKind::FundusExam => "Fundus Exam",
            SectionKind::AntSegmentExam => "Ant. Segment Exam",
            SectionKind::Refraction => "Refraction",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a path segment names no known section.
#[derive(Debug, thiserror::Error)]
#[error("unknown section kind: {0}")]
pub struct UnknownSectionKind(pub String);

impl std::str::FromStr for SectionKind {
    type Err = UnknownSectionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownSectionKind(s.to_owned()))
    }
}

/// A section payload schema.
///
/// `Default` is the blank form the editor starts from (including any blank
/// repeatable starter rows). `for_display` is the display-time filter applied
/// when presenting a saved record: list-bearing payloads drop rows whose
/// fields are all blank. It never mutates stored data.
pub trait SectionPayload:
    Clone + Default + PartialEq + Serialize + DeserializeOwned + std::fmt::Debug
{
    const KIND: SectionKind;

    fn for_display(&self) -> Self {
        self.clone()
    }
}

/// Stored-record envelope returned by `GET /patients/{id}/emr/{sectionKind}`.
///
/// `exists: false` distinguishes "no record yet" from a record whose payload
/// happens to hold empty values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SectionEnvelope {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SectionEnvelope {
    /// The "no record yet" response, also the safe default on fetch failure.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Attempts to decode the stored payload into its section schema.
    pub fn decode<P: SectionPayload>(&self) -> Option<P> {
        let data = self.data.as_ref()?;
        match serde_json::from_value(data.clone()) {
            Ok(payload) => Some(payload),
            Err(_) => None,
        }
    }
}

/// Body of `POST /patients/{id}/emr/{sectionKind}`: an upsert keyed by
/// (patient, section-kind).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveSectionRequest {
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    #[serde(rename = "createdBy")]
    pub created_by: String,
}

/// A right-eye/left-eye field pair, the axis along which most clinical
/// fields are recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyePair {
    pub re: String,
    pub le: String,
}

impl EyePair {
    pub fn new(re: impl Into<String>, le: impl Into<String>) -> Self {
        Self {
            re: re.into(),
            le: le.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.re.trim().is_empty() && self.le.trim().is_empty()
    }
}
