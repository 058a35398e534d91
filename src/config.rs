//! Configuration management for iExpert
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ExpertError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default system instruction framing the assistant persona
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an iPhone expert assistant. Provide helpful, \
accurate, and detailed information about iPhones, iOS, Apple products, troubleshooting, \
features, and related topics. Be concise but thorough in your responses.";

/// Greeting the transcript is seeded with at session start
pub const DEFAULT_GREETING: &str = "Hi! I'm your iPhone Expert. I can help you with \
troubleshooting, iOS features, device comparisons, optimization tips, and much more. \
What would you like to know about your iPhone today?";

/// Reply substituted when the provider answers without usable content
pub const DEFAULT_FALLBACK_REPLY: &str = "Sorry, I could not process your request.";

/// Notification shown when a turn fails in transport
pub const DEFAULT_FAILURE_NOTICE: &str = "Failed to get response. Please try again.";

/// Main configuration structure for iExpert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote completion endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Fixed sampling parameters sent with every request
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Chat session texts
    #[serde(default)]
    pub chat: ChatConfig,
    /// Local preference storage
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Provider configuration
///
/// The API key is never compiled in. It is resolved at startup from
/// `IEXPERT_API_KEY`, this file, or the system keyring, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the completions API (the request goes to `{api_base}/chat/completions`)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model identifier sent with each request
    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer credential; prefer the environment or keyring over this field
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Optional request timeout in seconds. Unset means wait for the transport.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_api_base() -> String {
    "https://api.perplexity.ai".to_string()
}

fn default_model() -> String {
    "llama-3.1-sonar-small-128k-online".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

/// Sampling parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SamplingConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_frequency_penalty")]
    pub frequency_penalty: f32,

    #[serde(default)]
    pub presence_penalty: f32,

    /// Ask the service to include image results
    #[serde(default)]
    pub return_images: bool,

    /// Ask the service to suggest related questions
    #[serde(default)]
    pub return_related_questions: bool,
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_p() -> f32 {
    0.9
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_frequency_penalty() -> f32 {
    1.0
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            frequency_penalty: default_frequency_penalty(),
            presence_penalty: 0.0,
            return_images: false,
            return_related_questions: false,
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// System instruction sent ahead of every user turn
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// First assistant message of every session
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Reply used when the response lacks content
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,

    /// Notification text for failed turns
    #[serde(default = "default_failure_notice")]
    pub failure_notice: String,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_fallback_reply() -> String {
    DEFAULT_FALLBACK_REPLY.to_string()
}

fn default_failure_notice() -> String {
    DEFAULT_FAILURE_NOTICE.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            greeting: default_greeting(),
            fallback_reply: default_fallback_reply(),
            failure_notice: default_failure_notice(),
        }
    }
}

/// Preference storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the preferences database. Defaults to the user data directory.
    #[serde(default)]
    pub preferences_db: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ExpertError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ExpertError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_key) = std::env::var("IEXPERT_API_KEY") {
            if !api_key.trim().is_empty() {
                self.provider.api_key = Some(api_key);
            }
        }

        if let Ok(api_base) = std::env::var("IEXPERT_API_BASE") {
            self.provider.api_base = api_base;
        }

        if let Ok(model) = std::env::var("IEXPERT_MODEL") {
            self.provider.model = model;
        }

        if let Ok(timeout) = std::env::var("IEXPERT_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(v) => self.provider.timeout_seconds = Some(v),
                Err(_) => tracing::warn!("Invalid IEXPERT_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(temperature) = std::env::var("IEXPERT_TEMPERATURE") {
            match temperature.parse::<f32>() {
                Ok(v) => self.sampling.temperature = v,
                Err(_) => tracing::warn!("Invalid IEXPERT_TEMPERATURE: {}", temperature),
            }
        }

        if let Ok(max_tokens) = std::env::var("IEXPERT_MAX_TOKENS") {
            match max_tokens.parse::<u32>() {
                Ok(v) => self.sampling.max_tokens = v,
                Err(_) => tracing::warn!("Invalid IEXPERT_MAX_TOKENS: {}", max_tokens),
            }
        }

        if let Ok(db) = std::env::var("IEXPERT_PREFS_DB") {
            tracing::debug!(db = %db, "Env override: IEXPERT_PREFS_DB");
            self.storage.preferences_db = Some(PathBuf::from(db));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(model) = &cli.model {
            self.provider.model = model.clone();
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.provider.api_base).map_err(|e| {
            ExpertError::Config(format!(
                "Invalid provider.api_base '{}': {}",
                self.provider.api_base, e
            ))
        })?;

        if self.provider.model.trim().is_empty() {
            return Err(ExpertError::Config("provider.model cannot be empty".to_string()).into());
        }

        if self.provider.timeout_seconds == Some(0) {
            return Err(ExpertError::Config(
                "provider.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if !(0.0..=2.0).contains(&self.sampling.temperature) {
            return Err(ExpertError::Config(
                "sampling.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.sampling.top_p <= 0.0 || self.sampling.top_p > 1.0 {
            return Err(ExpertError::Config(
                "sampling.top_p must be between 0.0 (exclusive) and 1.0".to_string(),
            )
            .into());
        }

        if self.sampling.max_tokens == 0 {
            return Err(ExpertError::Config(
                "sampling.max_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.system_prompt.trim().is_empty() {
            return Err(
                ExpertError::Config("chat.system_prompt cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            sampling: SamplingConfig::default(),
            chat: ChatConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}
