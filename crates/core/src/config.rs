//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! services, so nothing reads process-wide environment variables while
//! handling user actions.

use std::path::{Path, PathBuf};

/// File holding the locally persisted patient collection.
const LOCAL_STATE_FILENAME: &str = "emr_patients.json";

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("author name is required")]
    MissingAuthorName,
    #[error("failed to read local state: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write local state: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to create data directory: {0}")]
    DataDirCreation(std::io::Error),
    #[error("failed to serialize local state: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize local state: {0}")]
    Deserialization(serde_json::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: String,
    data_dir: PathBuf,
    clinic: String,
    location: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `api_base_url` is the REST base including the `/api` prefix, e.g.
    /// `http://localhost:5000/api`. `data_dir` holds the locally persisted
    /// fallback state.
    pub fn new(api_base_url: impl Into<String>, data_dir: PathBuf) -> CoreResult<Self> {
        let api_base_url = api_base_url.into();
        if api_base_url.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "api_base_url cannot be empty".into(),
            ));
        }

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_owned(),
            data_dir,
            clinic: "CHN".into(),
            location: "Chennai".into(),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the locally persisted patient collection.
    pub fn local_state_path(&self) -> PathBuf {
        self.data_dir.join(LOCAL_STATE_FILENAME)
    }

    /// Clinic location code stamped on visits, e.g. `CHN`.
    pub fn clinic(&self) -> &str {
        &self.clinic
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_base_url() {
        let err = CoreConfig::new("  ", PathBuf::from("/tmp/emr"))
            .expect_err("empty base url should fail");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn normalizes_trailing_slash() {
        let cfg = CoreConfig::new("http://localhost:5000/api/", PathBuf::from("/tmp/emr"))
            .expect("config should be accepted");
        assert_eq!(cfg.api_base_url(), "http://localhost:5000/api");
        assert!(cfg.local_state_path().ends_with("emr_patients.json"));
    }
}
