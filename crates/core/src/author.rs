//! Save authorship.

use crate::config::{CoreError, CoreResult};

/// The authenticated user a save is attributed to.
///
/// Threaded explicitly into [`crate::session::SectionSession::save`] so that
/// authorship always reflects the signed-in clinician rather than a fixed
/// identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    /// Job role shown alongside the name, e.g. `Ophthalmologist`.
    pub role: String,
}

impl Author {
    /// Creates an author, rejecting blank names.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingAuthorName` if the trimmed name is empty.
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::MissingAuthorName);
        }
        Ok(Self {
            name: name.trim().to_owned(),
            role: role.into().trim().to_owned(),
        })
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.role.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.role)
        }
    }
}
