//! Test utilities for iExpert
//!
//! Fake completion clients, an event-recording observer, and small helpers
//! shared by unit tests.

use crate::config::Config;
use crate::error::{ExpertError, Result};
use crate::providers::CompletionClient;
use crate::session::{SessionEvent, SessionObserver};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test configuration with default values and a dummy key
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.provider.api_key = Some("pplx-test-key".to_string());
    config
}

/// Build a transport failure as the provider would return it
pub fn transport_error(message: &str) -> anyhow::Error {
    ExpertError::Transport(message.to_string()).into()
}

/// Completion client returning a canned reply or failure
pub struct FakeClient {
    reply: std::result::Result<String, String>,
    calls: Mutex<Vec<String>>,
}

impl FakeClient {
    /// Client that answers every call with `reply`
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Client that fails every call with a transport error
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Texts received so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeClient {
    async fn complete(&self, user_text: &str) -> Result<String> {
        self.calls.lock().unwrap().push(user_text.to_string());
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(message) => Err(transport_error(message)),
        }
    }

    fn model(&self) -> String {
        "fake-model".to_string()
    }
}

/// Observer that records every event it receives
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl RecordingObserver {
    /// Returns the observer and a handle to its event log
    pub fn new() -> (Self, Arc<Mutex<Vec<SessionEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: Arc::clone(&events),
            },
            events,
        )
    }
}

impl SessionObserver for RecordingObserver {
    fn on_event(&self, event: &SessionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_config_is_valid() {
        let config = test_config();
        assert!(config.validate().is_ok());
        assert!(config.provider.api_key.is_some());
    }

    #[tokio::test]
    async fn test_fake_client_records_calls() {
        let client = FakeClient::replying("ok");
        assert_eq!(client.complete("a").await.unwrap(), "ok");
        assert_eq!(client.calls(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_fake_client_failure_is_transport() {
        let client = FakeClient::failing("down");
        let err = client.complete("a").await.unwrap_err();
        assert!(err.downcast_ref::<ExpertError>().unwrap().is_transport());
    }
}
