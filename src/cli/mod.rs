//! CLI interface for authsession

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "authsession")]
#[command(version)]
#[command(about = "Manage a persisted client-side login session", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new authsession.toml configuration file
    Init,

    /// Store a token and sign in with it
    Login {
        /// Auth token presented to the identity endpoint
        #[arg(short, long, env = "AUTHSESSION_TOKEN")]
        token: String,

        /// Remember the login across sessions
        #[arg(short, long)]
        remember: bool,
    },

    /// Restore the session from the stored token and show it
    Status {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show or change the remember-me flag
    Remember {
        /// New value; omit to show the current one
        state: Option<Toggle>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}
