//! SIA CLI - Agricultural decision support
//!
//! Usage:
//!   sia roi --crop Rice --yield 4.2 --fertilizer   Score a yield prediction
//!   sia simulate --crop Rice ... --predicted-yield 4.2   Record a simulation
//!   sia ask "Is it worth irrigating?"               Ask the assistant
//!   sia serve --port 3000                           Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so RUST_LOG from .env applies too
    let env_files = commands::load_env_files(&sia_core::config::env_file_candidates())?;

    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    for path in &env_files {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Roi {
            crop,
            predicted_yield,
            fertilizer,
            irrigation,
            json,
        } => commands::cmd_roi(&config, &crop, predicted_yield, fertilizer, irrigation, json),
        Commands::Simulate(args) => commands::cmd_simulate(&cli.session, &config, &args),
        Commands::Milk { history, forecast } => {
            commands::cmd_milk(&cli.session, &history, &forecast)
        }
        Commands::Cattle { metrics, source } => {
            commands::cmd_cattle(&cli.session, &metrics, &source)
        }
        Commands::Ask { question } => {
            let assistant = commands::build_assistant(&config)?;
            commands::cmd_ask(&cli.session, &assistant, &question.join(" ")).await
        }
        Commands::Context { action, json } => match action {
            Some(ContextAction::Clear) => commands::cmd_context_clear(&cli.session),
            None => commands::cmd_context_show(&cli.session, json),
        },
        Commands::History { clear } => {
            if clear {
                commands::cmd_history_clear(&cli.session)
            } else {
                commands::cmd_history_show(&cli.session)
            }
        }
        Commands::Prices => commands::cmd_prices(&config),
        Commands::Prompts => commands::cmd_prompts_list(),
        Commands::Serve { port, host } => commands::cmd_serve(config, &host, port).await,
    }
}
