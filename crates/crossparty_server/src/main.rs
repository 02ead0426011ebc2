//! Crossparty - game server CLI

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use crossparty_server::{ServerConfig, server};
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::CheckConfig { config } => check_config(config),
    }
}

/// Resolves configuration from file, environment and flags.
fn resolve_config(
    path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<ServerConfig> {
    let config = ServerConfig::load(path.as_deref())?
        .apply_env()?
        .with_overrides(host, port);
    config.validate()?;
    Ok(config)
}

/// Run the WebSocket game server
async fn run_server(path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = resolve_config(path, host, port)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    info!(addr = %config.bind_address(), board_size = config.board_size(), "Starting Crossparty server");
    server::run(config).await?;
    Ok(())
}

/// Print the resolved configuration
#[instrument]
fn check_config(path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(path, None, None)?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
