//! Perplexity provider implementation for iExpert
//!
//! This module implements `CompletionClient` against Perplexity's
//! OpenAI-compatible `/chat/completions` endpoint. Each call sends the fixed
//! system prompt plus the current user turn with fixed sampling parameters.

use crate::config::{ChatConfig, ProviderConfig, SamplingConfig};
use crate::error::{ExpertError, Result};
use crate::providers::{first_choice_content, CompletionClient, CompletionRequest};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// Perplexity chat completions client
///
/// # Examples
///
/// ```no_run
/// use iexpert::config::Config;
/// use iexpert::providers::{CompletionClient, PerplexityClient};
///
/// # async fn example() -> iexpert::error::Result<()> {
/// let config = Config::default();
/// let client = PerplexityClient::new(&config, "pplx-...".to_string())?;
/// let reply = client.complete("How do I check battery health?").await?;
/// println!("{}", reply);
/// # Ok(())
/// # }
/// ```
pub struct PerplexityClient {
    client: Client,
    endpoint: String,
    model: String,
    system_prompt: String,
    fallback_reply: String,
    sampling: SamplingConfig,
}

impl PerplexityClient {
    /// Create a new client from configuration and a resolved API key
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client cannot be built
    pub fn new(config: &crate::config::Config, api_key: String) -> Result<Self> {
        Self::from_parts(&config.provider, &config.sampling, &config.chat, api_key)
    }

    /// Create a new client from the individual configuration sections
    pub fn from_parts(
        provider: &ProviderConfig,
        sampling: &SamplingConfig,
        chat: &ChatConfig,
        api_key: String,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|_| ExpertError::Config("API key contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("iexpert/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = provider.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ExpertError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/chat/completions",
            provider.api_base.trim_end_matches('/')
        );

        tracing::debug!(
            "Initialized Perplexity client: endpoint={}, model={}",
            endpoint,
            provider.model
        );

        Ok(Self {
            client,
            endpoint,
            model: provider.model.clone(),
            system_prompt: chat.system_prompt.clone(),
            fallback_reply: chat.fallback_reply.clone(),
            sampling: sampling.clone(),
        })
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, user_text: &str) -> CompletionRequest {
        CompletionRequest::for_turn(&self.model, &self.system_prompt, user_text, &self.sampling)
    }
}

#[async_trait]
impl CompletionClient for PerplexityClient {
    async fn complete(&self, user_text: &str) -> Result<String> {
        let request = self.build_request(user_text);

        tracing::debug!(
            "Sending completion request: model={}, {} chars",
            request.model,
            user_text.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExpertError::Transport(format!("Completion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::debug!("Completion service returned {} with body: {}", status, error_text);
            return Err(ExpertError::Transport(format!("HTTP error! status: {}", status)).into());
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            ExpertError::Transport(format!("Failed to parse completion response: {}", e))
        })?;

        match first_choice_content(&body) {
            Some(content) => {
                tracing::debug!("Completion received: {} chars", content.len());
                Ok(content.to_string())
            }
            None => {
                let err = ExpertError::Protocol(
                    "response has no choices[0].message.content".to_string(),
                );
                tracing::warn!("{}; substituting fallback reply", err);
                Ok(self.fallback_reply.clone())
            }
        }
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}
