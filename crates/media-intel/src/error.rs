//! Custom error types for the media intelligence dashboard.
//!
//! This module provides a single error hierarchy using `thiserror`
//! covering both halves of the system: cleaning/aggregating an upload and
//! requesting AI insights for a chart.
//!
//! Errors are serializable so a frontend (or the CLI's `--json` report) can
//! show them as `{code, message}` pairs.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for the dashboard core.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The upload could not be parsed as a table.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A column needed by an aggregate is missing from the cleaned table.
    #[error("Column '{0}' not found in cleaned table")]
    ColumnNotFound(String),

    /// A chart has no rows to analyze.
    #[error("No data available for '{0}'")]
    NoData(String),

    /// No API credential is configured.
    #[error("API credential is missing (environment variable '{0}' is not set)")]
    MissingCredential(String),

    /// The endpoint rejected the credential.
    #[error("API rejected the credential (status {status})")]
    Authorization { status: u16 },

    /// The endpoint answered with a non-success status for another reason.
    #[error("API returned an error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Network-level failure (DNS, connect, timeout).
    #[error("Network or API request failed: {0}")]
    Transport(String),

    /// Success status, but the body did not have the expected structure.
    #[error("Unexpected API response: {0}")]
    ResponseShape(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashboardError>,
    },
}

impl DashboardError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashboardError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any context wrappers.
    pub fn root(&self) -> &DashboardError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "MALFORMED_INPUT",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NoData(_) => "NO_DATA",
            Self::MissingCredential(_) => "MISSING_CREDENTIAL",
            Self::Authorization { .. } => "AUTHORIZATION_ERROR",
            Self::Api { .. } => "API_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::ResponseShape(_) => "RESPONSE_SHAPE_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from talking to the insight endpoint.
    pub fn is_insight_failure(&self) -> bool {
        matches!(
            self.root(),
            Self::MissingCredential(_)
                | Self::Authorization { .. }
                | Self::Api { .. }
                | Self::Transport(_)
                | Self::ResponseShape(_)
                | Self::NoData(_)
        )
    }
}

impl From<ConfigValidationError> for DashboardError {
    fn from(err: ConfigValidationError) -> Self {
        DashboardError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for DashboardError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DashboardError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

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
        self.map_err(|e| DashboardError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            DashboardError::MalformedInput("bad".to_string()).error_code(),
            "MALFORMED_INPUT"
        );
        assert_eq!(
            DashboardError::Authorization { status: 401 }.error_code(),
            "AUTHORIZATION_ERROR"
        );
        assert_eq!(
            DashboardError::Api {
                status: 500,
                body: String::new()
            }
            .error_code(),
            "API_ERROR"
        );
    }

    #[test]
    fn test_is_insight_failure() {
        assert!(DashboardError::Transport("refused".to_string()).is_insight_failure());
        assert!(
            DashboardError::MissingCredential("GEMINI_API_KEY".to_string()).is_insight_failure()
        );
        assert!(!DashboardError::MalformedInput("x".to_string()).is_insight_failure());
        assert!(!DashboardError::ColumnNotFound("location".to_string()).is_insight_failure());
    }

    #[test]
    fn test_error_serialization() {
        let error = DashboardError::ColumnNotFound("sentiment".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("sentiment"));
    }

    #[test]
    fn test_with_context_preserves_code_and_root() {
        let error = DashboardError::Authorization { status: 401 }.with_context("Platform Engagements");
        assert!(error.to_string().contains("Platform Engagements"));
        assert_eq!(error.error_code(), "AUTHORIZATION_ERROR");
        assert!(matches!(
            error.root(),
            DashboardError::Authorization { status: 401 }
        ));
        assert!(error.is_insight_failure());
    }

    #[test]
    fn test_config_error_conversion() {
        let error: DashboardError = ConfigValidationError::InvalidLimit {
            field: "top_locations".to_string(),
            value: 0,
        }
        .into();
        assert_eq!(error.error_code(), "INVALID_CONFIG");
        assert!(error.to_string().contains("top_locations"));
    }
}
