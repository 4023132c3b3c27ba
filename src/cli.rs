//! Command-line interface definitions using clap
//!
//! No subcommand runs the HTTP server.

use std::path::Path;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::StaticConfig;
use crate::errors::{LinkforgeError, Result};

/// Linkforge - create short links over HTTP
#[derive(Parser, Debug)]
#[command(name = "linkforge")]
#[command(version)]
#[command(about = "Short link creation service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print or write a sample configuration file
    Generate {
        /// Output path (default: print to stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// `config generate`
pub fn config_generate(output: Option<&str>, force: bool) -> Result<()> {
    let Some(path) = output else {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if !force && Path::new(path).exists() {
        return Err(LinkforgeError::file_operation(format!(
            "{} already exists, pass --force to overwrite",
            path
        )));
    }

    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| LinkforgeError::file_operation(format!("Unable to write {}: {}", path, e)))?;

    println!(
        "{} {}",
        "Configuration file generated:".green(),
        path.blue()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs_server() {
        let cli = Cli::try_parse_from(["linkforge"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_parse_config_generate() {
        let cli =
            Cli::try_parse_from(["linkforge", "-c", "alt.toml", "config", "generate", "-o", "out.toml"])
                .unwrap();
        assert_eq!(cli.config, "alt.toml");
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output: Some("out.toml".to_string()),
                    force: false,
                }
            })
        );
    }

    #[test]
    fn test_config_generate_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        config_generate(Some(path), false).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("[links]"));

        assert!(matches!(
            config_generate(Some(path), false),
            Err(LinkforgeError::FileOperation(_))
        ));
        assert!(config_generate(Some(path), true).is_ok());
    }
}
