/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`: Interactive chat session
- `ask`: One question, one answer
- `panels`: Static tips, features and tools listings
- `theme`: Show or change the color theme
- `auth`: Store the API key in the system keyring

Handlers are small and delegate to the library components: the session
controller, the completion client, the theme store and the presentation
surface.
*/

use crate::cli::ThemeAction;
use crate::config::Config;
use crate::error::{ExpertError, Result};
use crate::theme::{EnvColorScheme, PreferenceStore, SqlitePreferences, ThemeStore};
use std::io::Write;

// Special commands parser for the chat prompt
pub mod special_commands;

/// Open the theme store configured for this run
pub fn open_theme_store(config: &Config) -> Result<ThemeStore<SqlitePreferences>> {
    let prefs = SqlitePreferences::open(config.storage.preferences_db.as_deref())?;
    tracing::debug!("Using preferences database at {}", prefs.path().display());
    Ok(ThemeStore::new(prefs, &EnvColorScheme))
}

/// Apply a theme action and return the resulting theme
pub fn apply_theme_action<S: PreferenceStore>(
    store: &mut ThemeStore<S>,
    action: ThemeAction,
) -> Result<crate::theme::ThemePreference> {
    use crate::theme::ThemePreference;

    match action {
        ThemeAction::Show => {}
        ThemeAction::Light => store.write(ThemePreference::Light)?,
        ThemeAction::Dark => store.write(ThemePreference::Dark)?,
        ThemeAction::Toggle => {
            store.toggle()?;
        }
    }
    Ok(store.current())
}

// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Builds the completion client, theme store and session controller, wires
    //! the terminal surface as a session observer, and runs a readline loop.
    //! The prompt is pre-filled with the session draft, which quick actions and
    //! diagnostic shortcuts populate.

    use super::special_commands::{parse_special_command, SpecialCommand};
    use super::*;
    use crate::presentation::{self, TerminalSurface};
    use crate::providers::{create_client, CompletionClient};
    use crate::session::SessionController;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::cell::Cell;
    use std::rc::Rc;

    const PROMPT: &str = "iexpert> ";

    /// Start interactive chat mode
    ///
    /// # Errors
    ///
    /// Returns error if the API key cannot be resolved, the preference store
    /// cannot be opened, or the terminal cannot be initialized
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::debug!("Starting interactive chat mode");

        let client = create_client(&config)?;
        let mut theme_store = open_theme_store(&config)?;
        let theme = Rc::new(Cell::new(theme_store.current()));

        let mut session = SessionController::from_config(&config.chat);

        let mut stdout = std::io::stdout();
        presentation::write_banner(&mut stdout, theme.get())?;
        for message in session.transcript() {
            presentation::write_message(&mut stdout, message, &theme.get().palette())?;
        }

        session.subscribe(Box::new(TerminalSurface::stdout(Rc::clone(&theme))));

        let mut rl = DefaultEditor::new()?;

        loop {
            let line = if session.draft().is_empty() {
                rl.readline(PROMPT)
            } else {
                rl.readline_with_initial(PROMPT, (session.draft(), ""))
            };

            match line {
                Ok(line) => {
                    let command = match parse_special_command(&line) {
                        Ok(command) => command,
                        Err(e) => {
                            println!("{}\n", e.to_string().yellow());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {
                            if !line.trim().is_empty() {
                                rl.add_history_entry(line.trim())?;
                            }
                            session.set_draft(line);
                            session.submit_draft(client.as_ref()).await;
                        }
                        other => {
                            handle_special(
                                other,
                                &mut session,
                                &mut theme_store,
                                &theme,
                                client.as_ref(),
                            )?;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        tracing::debug!(
            messages = session.transcript().len(),
            "Chat session ended"
        );
        println!("Goodbye!");
        Ok(())
    }

    fn handle_special<S: PreferenceStore>(
        command: SpecialCommand,
        session: &mut SessionController,
        theme_store: &mut ThemeStore<S>,
        theme: &Rc<Cell<crate::theme::ThemePreference>>,
        client: &dyn CompletionClient,
    ) -> Result<()> {
        let mut out = std::io::stdout();
        match command {
            SpecialCommand::Help => presentation::write_help(&mut out)?,
            SpecialCommand::Tips => presentation::write_tips(&mut out)?,
            SpecialCommand::Features => presentation::write_features(&mut out)?,
            SpecialCommand::Tools => presentation::write_tools(&mut out)?,
            SpecialCommand::ListQuickActions => presentation::write_quick_actions(&mut out)?,
            SpecialCommand::QuickAction(query) | SpecialCommand::Diagnose(query) => {
                session.set_draft(query);
            }
            SpecialCommand::ClearDraft => session.set_draft(""),
            SpecialCommand::ShowStatus => presentation::write_status(
                &mut out,
                &session.status(),
                theme.get(),
                &client.model(),
            )?,
            SpecialCommand::Theme(action) => match apply_theme_action(theme_store, action) {
                Ok(current) => {
                    theme.set(current);
                    writeln!(out, "Theme: {}\n", current)?;
                }
                Err(e) => {
                    tracing::warn!("Theme change failed: {:#}", e);
                    writeln!(out, "{}\n", format!("Could not change theme: {}", e).yellow())?;
                }
            },
            SpecialCommand::Exit | SpecialCommand::None => {}
        }
        Ok(())
    }
}

// One-shot question handler
pub mod ask {
    //! Sends one question through a fresh session and prints the reply.

    use super::*;
    use crate::providers::{create_client, CompletionClient};
    use crate::session::{SessionController, TurnOutcome};

    /// Ask a single question using the configured provider
    pub async fn run_ask(config: Config, question: &str) -> Result<()> {
        let client = create_client(&config)?;
        let reply = ask_with_client(&config, client.as_ref(), question).await?;
        println!("{}", reply);
        Ok(())
    }

    /// Ask a single question using `client`
    ///
    /// # Errors
    ///
    /// Returns `ExpertError::Validation` for a blank question and
    /// `ExpertError::Transport` when the turn fails
    pub async fn ask_with_client(
        config: &Config,
        client: &dyn CompletionClient,
        question: &str,
    ) -> Result<String> {
        let mut session = SessionController::from_config(&config.chat);
        match session.submit(client, question).await {
            TurnOutcome::Replied(message) => Ok(message.content().to_string()),
            TurnOutcome::Failed(reason) => {
                tracing::debug!("Ask failed: {}", reason);
                Err(ExpertError::Transport(config.chat.failure_notice.clone()).into())
            }
            TurnOutcome::Ignored => {
                Err(ExpertError::Validation("question is empty".to_string()).into())
            }
            TurnOutcome::Busy | TurnOutcome::Discarded => Err(ExpertError::Transport(
                "turn was not resolved".to_string(),
            )
            .into()),
        }
    }
}

// Static panels
pub mod panels {
    //! Prints the tips, features and tools listings.

    use super::*;
    use crate::presentation;

    /// Which panel to print
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Panel {
        Tips,
        Features,
        Tools,
    }

    /// Print a panel to standard output
    pub fn show_panel(panel: Panel) -> Result<()> {
        let mut out = std::io::stdout();
        write_panel(&mut out, panel)?;
        Ok(())
    }

    /// Write a panel to any stream
    pub fn write_panel(out: &mut dyn Write, panel: Panel) -> std::io::Result<()> {
        match panel {
            Panel::Tips => presentation::write_tips(out),
            Panel::Features => presentation::write_features(out),
            Panel::Tools => presentation::write_tools(out),
        }
    }
}

// Theme command handler
pub mod theme {
    //! Shows or changes the stored theme outside a chat session.

    use super::*;

    /// Run `iexpert theme [action]`
    pub fn run_theme(config: &Config, action: Option<ThemeAction>) -> Result<()> {
        let mut store = open_theme_store(config)?;
        let current = apply_theme_action(&mut store, action.unwrap_or(ThemeAction::Show))?;
        println!("{}", current);
        Ok(())
    }
}

// Credential storage
pub mod auth {
    //! Prompts for the API key and stores it in the system keyring.

    use super::*;
    use rustyline::DefaultEditor;

    /// Run `iexpert auth`
    pub fn run_auth() -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        let key = rl.readline("Perplexity API key: ")?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ExpertError::Validation("API key cannot be empty".to_string()).into());
        }
        crate::providers::store_api_key(key)?;
        println!("API key stored in the system keyring.");
        Ok(())
    }
}
