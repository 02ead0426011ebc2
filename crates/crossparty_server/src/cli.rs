//! Command-line interface for crossparty.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Crossparty - two-player grid game server
#[derive(Parser, Debug)]
#[command(name = "crossparty")]
#[command(about = "Matchmaking and game sessions over WebSocket", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve {
        /// Path to a TOML config file (defaults to ./crossparty.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the resolved configuration and exit
    CheckConfig {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from(["crossparty", "serve", "--port", "6000"]).expect("parse");
        match cli.command {
            Command::Serve { port, host, config } => {
                assert_eq!(port, Some(6000));
                assert!(host.is_none());
                assert!(config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_check_config() {
        let cli = Cli::try_parse_from(["crossparty", "check-config", "-c", "x.toml"]).expect("parse");
        assert!(matches!(cli.command, Command::CheckConfig { config: Some(_) }));
    }
}
