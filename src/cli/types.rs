//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "incident-intake")]
#[command(about = "Conversational incident-report intake bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to intake.yaml + intake.local.yaml)
    #[arg(short, long, global = true, env = "INTAKE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bot (long polling until Ctrl-C)
    Serve,

    /// Administrator roster management
    #[command(subcommand)]
    Admins(AdminCommands),

    /// Validate configuration and report what is set up
    CheckConfig,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// List administrators
    List,

    /// Add an administrator by numeric Telegram id
    Add {
        /// Telegram user id
        id: i64,
    },

    /// Remove an administrator by numeric Telegram id
    Remove {
        /// Telegram user id
        id: i64,
    },
}
