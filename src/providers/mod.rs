//! Remote completion providers
//!
//! The session talks to the model through the `CompletionClient` trait.
//! `PerplexityClient` is the production implementation; credentials are
//! resolved here so that no key is ever compiled into the binary.

pub mod base;
pub mod perplexity;

pub use base::{first_choice_content, CompletionClient, CompletionRequest, WireMessage};
pub use perplexity::PerplexityClient;

use crate::config::Config;
use crate::error::{ExpertError, Result};

/// Keyring service name used for the stored API key
pub const KEYRING_SERVICE: &str = "iexpert";

/// Keyring user name used for the stored API key
pub const KEYRING_USER: &str = "perplexity";

/// Resolve the API key
///
/// Order: `provider.api_key` (already populated from `IEXPERT_API_KEY` when
/// set), then the system keyring.
///
/// # Errors
///
/// Returns `ExpertError::MissingCredentials` when no source has a key
pub fn resolve_api_key(config: &Config) -> Result<String> {
    if let Some(key) = config
        .provider
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        tracing::debug!("Using API key from configuration");
        return Ok(key.to_string());
    }

    match keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).and_then(|e| e.get_password()) {
        Ok(key) if !key.trim().is_empty() => {
            tracing::debug!("Using API key from system keyring");
            Ok(key.trim().to_string())
        }
        Ok(_) | Err(keyring::Error::NoEntry) => Err(ExpertError::MissingCredentials(format!(
            "{} (set IEXPERT_API_KEY or run `iexpert auth`)",
            KEYRING_USER
        ))
        .into()),
        Err(e) => {
            tracing::warn!("Keyring lookup failed: {}", e);
            Err(ExpertError::MissingCredentials(format!("{}: {}", KEYRING_USER, e)).into())
        }
    }
}

/// Store an API key in the system keyring
pub fn store_api_key(key: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    entry.set_password(key.trim())?;
    tracing::info!("Stored API key in system keyring");
    Ok(())
}

/// Build the configured completion client
///
/// # Errors
///
/// Returns error if no API key can be resolved or the client cannot be built
pub fn create_client(config: &Config) -> Result<Box<dyn CompletionClient>> {
    let api_key = resolve_api_key(config)?;
    Ok(Box::new(PerplexityClient::new(config, api_key)?))
}
