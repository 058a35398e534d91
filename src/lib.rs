//! iExpert - AI-powered iPhone assistant library
//!
//! This library provides the core functionality for the iExpert terminal
//! chat: a conversation transcript, a session controller that turns user
//! input into completion requests, the Perplexity-compatible completion
//! client, a persisted light/dark theme, and the terminal presentation.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `transcript`: Messages and the append-only conversation log
//! - `session`: Session state machine, draft input and event fan-out
//! - `providers`: Completion client abstraction and the Perplexity client
//! - `theme`: Theme preference store and OS color-scheme probing
//! - `presentation`: Terminal rendering of session events and panels
//! - `content`: Static tips, features, diagnostics and quick actions
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use iexpert::providers::create_client;
//! use iexpert::session::{SessionController, TurnOutcome};
//! use iexpert::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let client = create_client(&config)?;
//!     let mut session = SessionController::from_config(&config.chat);
//!     if let TurnOutcome::Replied(reply) = session
//!         .submit(client.as_ref(), "How do I check battery health?")
//!         .await
//!     {
//!         println!("{}", reply.content());
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod presentation;
pub mod providers;
pub mod session;
pub mod theme;
pub mod transcript;

// Re-export commonly used types
pub use config::Config;
pub use error::{ExpertError, Result};
pub use providers::{CompletionClient, PerplexityClient};
pub use session::{SessionController, SessionEvent, SessionObserver, TurnOutcome};
pub use theme::{ThemePreference, ThemeStore};
pub use transcript::{Message, Role, Transcript};

#[cfg(test)]
pub mod test_utils;
