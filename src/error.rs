//! Error types for alphadesk
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::sweep::SweepError;

/// All error types that can occur in alphadesk
#[derive(Debug, Error)]
pub enum DeskError {
    /// Backend rejected a request with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request was malformed before it ever reached the wire
    #[error("Invalid request: {0}")]
    Request(String),

    /// Sweep expansion failed validation
    #[error("Sweep error: {0}")]
    Sweep(#[from] SweepError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for alphadesk operations
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error() {
        let err = DeskError::Api {
            status: 503,
            message: "backend unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API error 503: backend unavailable");
    }

    #[test]
    fn test_request_error() {
        let err = DeskError::Request("sweep key must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid request: sweep key must not be empty");
    }

    #[test]
    fn test_sweep_error_conversion() {
        let err: DeskError = SweepError::RangeOrder.into();
        assert!(matches!(err, DeskError::Sweep(SweepError::RangeOrder)));
        assert_eq!(err.to_string(), "Sweep error: range order error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DeskError = io_err.into();
        assert!(matches!(err, DeskError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: DeskError = json_err.into();
        assert!(matches!(err, DeskError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(DeskError::Request("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
