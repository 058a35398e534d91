//! Command-line interface definition for iExpert
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat, one-shot questions, static panels,
//! theme selection and credential storage.

use clap::{Parser, Subcommand};

/// iExpert - AI-powered iPhone assistant
///
/// Ask questions about iPhones and iOS in an interactive chat, or browse
/// tips, feature highlights and diagnostic shortcuts.
#[derive(Parser, Debug, Clone)]
#[command(name = "iexpert")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the model from config
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for iExpert
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question to send
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Show iPhone pro tips and tricks
    Tips,

    /// Show feature highlights
    Features,

    /// Show diagnostic tools and quick actions
    Tools,

    /// Show or change the color theme
    Theme {
        /// Theme action
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Store the API key in the system keyring
    Auth,
}

/// Theme subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    /// Print the active theme
    Show,
    /// Switch to the light theme
    Light,
    /// Switch to the dark theme
    Dark,
    /// Flip between light and dark
    Toggle,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The command to run, treating a bare invocation as `chat`
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            model: None,
            verbose: false,
            command: None,
        }
    }
}
