//! Error types for iExpert
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for iExpert operations
///
/// Covers input validation, the remote completion exchange, configuration
/// loading, preference storage and credential lookup.
#[derive(Error, Debug)]
pub enum ExpertError {
    /// Submitted input was rejected before reaching the provider
    #[error("Validation error: {0}")]
    Validation(String),

    /// The completion request could not be completed or returned a non-success status
    #[error("Transport error: {0}")]
    Transport(String),

    /// The completion response was JSON but did not have the expected shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key could be resolved from env, config or keyring
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Preference storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unknown theme name
    #[error("Theme error: {0}")]
    Theme(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// SQLite errors from the preference database
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl ExpertError {
    /// Whether this error means the remote exchange failed outright
    ///
    /// Transport failures end the turn without an assistant reply; every
    /// other provider-side problem is absorbed before it reaches the session.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http(_))
    }
}

/// Result type alias for iExpert operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = ExpertError::Validation("empty input".to_string());
        assert_eq!(error.to_string(), "Validation error: empty input");
    }

    #[test]
    fn test_transport_error_display() {
        let error = ExpertError::Transport("HTTP 502".to_string());
        assert_eq!(error.to_string(), "Transport error: HTTP 502");
        assert!(error.is_transport());
    }

    #[test]
    fn test_protocol_error_is_not_transport() {
        let error = ExpertError::Protocol("missing choices".to_string());
        assert_eq!(error.to_string(), "Protocol error: missing choices");
        assert!(!error.is_transport());
    }

    #[test]
    fn test_config_error_display() {
        let error = ExpertError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = ExpertError::MissingCredentials("perplexity".to_string());
        assert_eq!(
            error.to_string(),
            "Missing credentials for provider: perplexity"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ExpertError = io_error.into();
        assert!(matches!(error, ExpertError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: ExpertError = json_error.into();
        assert!(matches!(error, ExpertError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ExpertError = yaml_error.into();
        assert!(matches!(error, ExpertError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExpertError>();
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = ExpertError::Transport("refused".to_string()).into();
        let inner = err.downcast_ref::<ExpertError>().unwrap();
        assert!(inner.is_transport());
    }
}
