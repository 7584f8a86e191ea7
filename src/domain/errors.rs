//! Domain error types
//!
//! This module defines the error hierarchy for Veil.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A detector's backing capability failed
    ///
    /// Recovered locally by the detectors; never surfaced from the engine.
    #[error("Detection unavailable: {0}")]
    DetectionUnavailable(String),

    /// A placeholder-shaped token has no entry in the mapping store
    #[error("Unknown placeholder: {0}")]
    UnknownPlaceholder(String),

    /// Persisted state failed to parse or validate on load
    #[error("Stored state is corrupt: {0}")]
    StoreCorrupt(String),

    /// Category names must be non-empty
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// Custom terms must be non-empty
    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    /// Pattern library errors
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Persistence backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl VeilError {
    /// Whether the error leaves the process in a usable state
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DetectionUnavailable(_) | Self::UnknownPlaceholder(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<regex::Error> for VeilError {
    fn from(err: regex::Error) -> Self {
        VeilError::Pattern(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_veil_error_display() {
        let err = VeilError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");

        let err = VeilError::UnknownPlaceholder("[PERSON_9]".to_string());
        assert_eq!(err.to_string(), "Unknown placeholder: [PERSON_9]");
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(VeilError::DetectionUnavailable("model offline".into()).is_recoverable());
        assert!(VeilError::UnknownPlaceholder("[X_1]".into()).is_recoverable());
        assert!(!VeilError::StoreCorrupt("bad json".into()).is_recoverable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: VeilError = io_err.into();
        assert!(matches!(err, VeilError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: VeilError = json_err.into();
        assert!(matches!(err, VeilError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: VeilError = toml_err.into();
        assert!(matches!(err, VeilError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_regex_error_conversion() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: VeilError = regex_err.into();
        assert!(matches!(err, VeilError::Pattern(_)));
    }
}
