//! Base provider trait and wire types for iExpert
//!
//! This module defines the `CompletionClient` trait implemented by remote
//! completion backends, along with the chat-completions request and response
//! structures they exchange.

use crate::config::SamplingConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One role/content pair in an outbound request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// `system` or `user`
    pub role: String,
    /// Message text
    pub content: String,
}

impl WireMessage {
    /// Creates a system instruction
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`
///
/// Always carries exactly two messages: the system instruction followed by
/// the current user turn. Earlier turns are never sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub return_images: bool,
    pub return_related_questions: bool,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl CompletionRequest {
    /// Builds the request for a single user turn
    ///
    /// # Examples
    ///
    /// ```
    /// use iexpert::config::SamplingConfig;
    /// use iexpert::providers::CompletionRequest;
    ///
    /// let req = CompletionRequest::for_turn("sonar", "Be helpful", "Hi", &SamplingConfig::default());
    /// assert_eq!(req.messages.len(), 2);
    /// assert_eq!(req.messages[0].role, "system");
    /// assert_eq!(req.messages[1].content, "Hi");
    /// ```
    pub fn for_turn(
        model: &str,
        system_prompt: &str,
        user_text: &str,
        sampling: &SamplingConfig,
    ) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![WireMessage::system(system_prompt), WireMessage::user(user_text)],
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_tokens: sampling.max_tokens,
            return_images: sampling.return_images,
            return_related_questions: sampling.return_related_questions,
            frequency_penalty: sampling.frequency_penalty,
            presence_penalty: sampling.presence_penalty,
        }
    }
}

/// Extracts `choices[0].message.content` from a completion response body
///
/// Returns `None` for any other shape, including an empty or non-string
/// content field.
///
/// # Examples
///
/// ```
/// use iexpert::providers::first_choice_content;
/// use serde_json::json;
///
/// let body = json!({"choices": [{"message": {"content": "Try X"}}]});
/// assert_eq!(first_choice_content(&body), Some("Try X"));
/// assert_eq!(first_choice_content(&json!({"choices": []})), None);
/// ```
pub fn first_choice_content(body: &serde_json::Value) -> Option<&str> {
    body.pointer("/choices/0/message/content")?
        .as_str()
        .filter(|s| !s.is_empty())
}

/// A remote completion backend
///
/// One call is one outbound request: implementations do not retry, cache or
/// batch, and they keep no conversation state between calls.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `user_text` as a single turn and returns the assistant text
    ///
    /// # Errors
    ///
    /// Returns `ExpertError::Transport` when the exchange cannot complete or the
    /// service answers with a non-success status. A response without content
    /// yields the configured fallback reply instead of an error.
    async fn complete(&self, user_text: &str) -> Result<String>;

    /// Model identifier used for requests
    fn model(&self) -> String;
}
