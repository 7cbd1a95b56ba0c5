//! Custom error types for the sales cleaning pipeline.
//!
//! Only the loader boundary can fail for data reasons (missing or unreadable
//! input). Individual cells that cannot be coerced never surface here; they
//! resolve to missing values instead.
//!
//! Errors are serializable so the CLI can emit them as JSON alongside the
//! cleaning report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// The input resource does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) => "INPUT_NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error came from the input resource itself.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::InputNotFound(_) | Self::Io(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            CleaningError::InputNotFound(PathBuf::from("missing.csv")).error_code(),
            "INPUT_NOT_FOUND"
        );
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(CleaningError::from(json_err).error_code(), "JSON_ERROR");
    }

    #[test]
    fn test_is_input_error() {
        assert!(CleaningError::InputNotFound(PathBuf::from("x.csv")).is_input_error());
        assert!(
            CleaningError::InputNotFound(PathBuf::from("x.csv"))
                .with_context("Loading")
                .is_input_error()
        );
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!CleaningError::from(json_err).is_input_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = CleaningError::InputNotFound(PathBuf::from("data/raw/sales.csv"));
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("INPUT_NOT_FOUND"));
        assert!(json.contains("data/raw/sales.csv"));
    }

    #[test]
    fn test_with_context() {
        let error = CleaningError::InputNotFound(PathBuf::from("a.csv")).with_context("While loading");
        assert!(error.to_string().contains("While loading"));
        assert_eq!(error.error_code(), "INPUT_NOT_FOUND"); // Preserves original code
    }
}
