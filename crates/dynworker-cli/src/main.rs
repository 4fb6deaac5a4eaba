//! Dynworker CLI - run the dispatcher outside the serverless host.
//!
//! `invoke` feeds one event through the same handler the host uses and prints
//! the encoded envelope. Logs go to stderr, the envelope to stdout.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config_bridge;
mod theme;

use commands::{config, invoke, resolve};

/// Dynworker - load a native worker module and run it against one event
#[derive(Parser)]
#[command(name = "dynworker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "DYNWORKER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one event and print the response envelope
    Invoke {
        /// Event to handle, as a string
        #[arg(short, long, conflicts_with = "event_file")]
        event: Option<String>,

        /// Read the event from a file
        #[arg(short = 'f', long)]
        event_file: Option<PathBuf>,

        /// Request ID to attach to the invocation's logs
        #[arg(long)]
        request_id: Option<String>,

        /// Pretty-print the envelope
        #[arg(short, long)]
        pretty: bool,
    },

    /// Check that the configured module is present
    Resolve,

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the resolved configuration as TOML
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env = dynworker_config::env::collect_env_vars();
    let resolved = dynworker_config::Config::load(cli.config.as_deref(), &env);

    // Set up logging from config, with --verbose override.
    let log_config = match &resolved {
        Ok(resolved) => config_bridge::to_log_config(&resolved.config, cli.verbose)?,
        Err(_) => config_bridge::fallback_log_config(cli.verbose),
    };
    if let Err(e) = dynworker_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let resolved = resolved?;

    match cli.command {
        Commands::Invoke {
            event,
            event_file,
            request_id,
            pretty,
        } => {
            let source = invoke::EventSource::from_args(event, event_file);
            invoke::run_invoke(&resolved.config, source, request_id, pretty).await?;
        },
        Commands::Resolve => {
            resolve::run_resolve(&resolved.config).await?;
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => config::show_config(&resolved)?,
        },
    }

    Ok(())
}
