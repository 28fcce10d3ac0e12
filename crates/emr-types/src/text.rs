//! Validated text types.
//!
//! Registration and the identity challenge both hinge on a handful of fields
//! that must never be blank. These newtypes make that guarantee at
//! construction time instead of sprinkling `is_empty` checks through the
//! views.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during
/// construction; a trimmed-empty input is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A medical-record number, the patient's unique clinic identifier.
///
/// Stored as entered (trimmed); the queue's identity challenge compares
/// against the last three characters via [`MrNumber::last_three`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrNumber(String);

impl MrNumber {
    /// Creates a new `MrNumber` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last three characters of the MR number, used by the queue's
    /// identity challenge. MR numbers shorter than three characters return
    /// the whole number.
    pub fn last_three(&self) -> &str {
        let chars = self.0.chars().count();
        match self.0.char_indices().nth(chars.saturating_sub(3)) {
            Some((idx, _)) => &self.0[idx..],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for MrNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for MrNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for MrNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for MrNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MrNumber::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        let text = NonEmptyText::new("  Hari Prasad  ").expect("should accept non-empty input");
        assert_eq!(text.as_str(), "Hari Prasad");

        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
        assert!(matches!(NonEmptyText::new(""), Err(TextError::Empty)));
    }

    #[test]
    fn mr_number_last_three() {
        let mr = MrNumber::new("758184").expect("should accept digits");
        assert_eq!(mr.last_three(), "184");
    }

    #[test]
    fn mr_number_shorter_than_three_returns_whole() {
        let mr = MrNumber::new("42").expect("should accept short numbers");
        assert_eq!(mr.last_three(), "42");
    }

    #[test]
    fn mr_number_rejects_blank() {
        assert!(matches!(MrNumber::new(" \t"), Err(TextError::Empty)));
    }
}
