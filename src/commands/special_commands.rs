//! Special commands parser for interactive chat
//!
//! Special commands open the static panels, fill the prompt with canned
//! questions, change the theme, or leave the session. They are prefixed with
//! `/` and are case-insensitive; anything else is a question for the
//! assistant.

use crate::cli::ThemeAction;
use crate::content::{self, DIAGNOSTIC_TOOLS, QUICK_ACTIONS};
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Show the tips panel
    Tips,

    /// Show the feature highlights panel
    Features,

    /// Show diagnostic tools and quick actions
    Tools,

    /// List quick actions
    ListQuickActions,

    /// Fill the draft with a quick action question
    ///
    /// Holds the question text, already resolved from its position.
    QuickAction(&'static str),

    /// Fill the draft with a diagnostic question
    Diagnose(&'static str),

    /// Show or change the theme (`/theme` alone toggles)
    Theme(ThemeAction),

    /// Display session status
    ShowStatus,

    /// Discard the current draft
    ClearDraft,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input is a question for the assistant.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not a
/// valid command, `UnsupportedArgument` for bad arguments and
/// `MissingArgument` when a required argument is absent.
///
/// # Examples
///
/// ```
/// use iexpert::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/tips").unwrap(), SpecialCommand::Tips);
/// assert_eq!(parse_special_command("Why is my phone hot?").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/tips" => Ok(SpecialCommand::Tips),
        "/features" => Ok(SpecialCommand::Features),
        "/tools" => Ok(SpecialCommand::Tools),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/clear" => Ok(SpecialCommand::ClearDraft),

        "/quick" => Ok(SpecialCommand::ListQuickActions),
        input if input.starts_with("/quick ") => {
            let arg = input[7..].trim();
            arg.parse::<usize>()
                .ok()
                .and_then(content::quick_action)
                .map(|action| SpecialCommand::QuickAction(action.query))
                .ok_or_else(|| CommandError::UnsupportedArgument {
                    command: "/quick".to_string(),
                    arg: format!("{} (expected 1-{})", arg, QUICK_ACTIONS.len()),
                })
        }

        "/diagnose" => Err(CommandError::MissingArgument {
            command: "/diagnose".to_string(),
            usage: format!("/diagnose <{}>", diagnostic_keys()),
        }),
        input if input.starts_with("/diagnose ") => {
            let arg = input[10..].trim();
            content::diagnostic(arg)
                .map(|tool| SpecialCommand::Diagnose(tool.query))
                .ok_or_else(|| CommandError::UnsupportedArgument {
                    command: "/diagnose".to_string(),
                    arg: arg.to_string(),
                })
        }

        "/theme" | "/theme toggle" => Ok(SpecialCommand::Theme(ThemeAction::Toggle)),
        "/theme show" => Ok(SpecialCommand::Theme(ThemeAction::Show)),
        "/theme light" => Ok(SpecialCommand::Theme(ThemeAction::Light)),
        "/theme dark" => Ok(SpecialCommand::Theme(ThemeAction::Dark)),
        input if input.starts_with("/theme ") => Err(CommandError::UnsupportedArgument {
            command: "/theme".to_string(),
            arg: input[7..].trim().to_string(),
        }),

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn diagnostic_keys() -> String {
    DIAGNOSTIC_TOOLS
        .iter()
        .map(|t| t.key)
        .collect::<Vec<_>>()
        .join("|")
}
