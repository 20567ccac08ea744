//! Command-line argument parsing

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "edgelink", version, about = "Short links and encrypted links over HTTP")]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a sample configuration file to stdout
    GenerateConfig,
}

impl Args {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}
