//! CLI module - Command-line interface for sessiongate

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sessiongate - session-based signup and login server
#[derive(Parser, Debug)]
#[command(name = "sessiongate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the web server (default)
    Serve,

    /// Create a default config.toml in the current directory
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_command() {
        let cli = Cli::parse_from(["sessiongate"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["sessiongate", "serve", "--config", "alt.toml"]);
        assert_eq!(cli.command, Some(Commands::Serve));
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn test_init_command() {
        let cli = Cli::parse_from(["sessiongate", "init"]);
        assert_eq!(cli.command, Some(Commands::Init));
    }
}
