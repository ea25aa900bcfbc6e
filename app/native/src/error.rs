//! Error types for the pasta sink.
//!
//! Sink operations report ordinary refusals as [`Rejection`]s. `SinkError` is
//! the crate-level error for everything around the core: configuration,
//! session scripts, I/O and the CLI.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::sink::Rejection;

/// Errors that can occur during application execution.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum SinkError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// A session script could not be read or understood.
    #[error("Script error: {0}")]
    ScriptError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// The sink refused an operation.
    #[error("Rejected: {0}")]
    Rejected(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<Rejection> for SinkError {
    fn from(err: Rejection) -> Self { Self::Rejected(err.to_string()) }
}

impl From<ConfigError> for SinkError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<String> for SinkError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for SinkError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::TraySize;

    #[test]
    fn test_invalid_arguments_display() {
        let err = SinkError::InvalidArguments("cell must be between 0 and 7".to_string());
        assert_eq!(err.to_string(), "cell must be between 0 and 7");
    }

    #[test]
    fn test_script_error_display() {
        let err = SinkError::ScriptError("unknown step 'boil'".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Script error"));
        assert!(msg.contains("unknown step 'boil'"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: SinkError = io_err.into();
        assert!(matches!(err, SinkError::IoError(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_rejection_from_conversion() {
        let err: SinkError = Rejection::NoSpace { size: TraySize::ExtraLarge }.into();
        assert!(matches!(err, SinkError::Rejected(_)));
        assert_eq!(err.to_string(), "Rejected: no room left for another extraLarge tray");
    }

    #[test]
    fn test_config_error_from_conversion() {
        let err: SinkError = ConfigError::NotFound.into();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_from_string_and_str() {
        let err: SinkError = "boom".into();
        assert!(matches!(err, SinkError::CommandError(_)));
        let err: SinkError = String::from("boom").into();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_error_serializes_with_kind_and_message() {
        let err = SinkError::ConfigError("Invalid JSON".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "ConfigError");
        assert_eq!(json["message"], "Invalid JSON");
    }
}
