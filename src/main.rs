//! iExpert - AI-powered iPhone assistant CLI
//!
#![doc = "iExpert - AI-powered iPhone assistant CLI"]
#![doc = "Main entry point for the iExpert terminal chat."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use iexpert::cli::{Cli, Commands};
use iexpert::commands;
use iexpert::commands::panels::Panel;
use iexpert::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command_or_default() {
        Commands::Chat => {
            tracing::debug!(model = %config.provider.model, "Dispatching chat");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { question } => {
            let question = question.join(" ");
            tracing::debug!("Asking one-shot question ({} chars)", question.len());
            commands::ask::run_ask(config, &question).await?;
            Ok(())
        }
        Commands::Tips => commands::panels::show_panel(Panel::Tips),
        Commands::Features => commands::panels::show_panel(Panel::Features),
        Commands::Tools => commands::panels::show_panel(Panel::Tools),
        Commands::Theme { action } => commands::theme::run_theme(&config, action),
        Commands::Auth => commands::auth::run_auth(),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "iexpert=debug" } else { "iexpert=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
