//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::simulate::SimulateArgs;
use crate::cli::commands::status::StatusArgs;

#[derive(Parser, Debug)]
#[command(name = "promptgate")]
#[command(about = "Promptgate - engagement prompt trigger coordinator", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .promptgate/config.yaml and .promptgate/local.yaml)
    #[arg(short, long, global = true, env = "PROMPTGATE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a scripted page session and print the prompt timeline
    Simulate(SimulateArgs),

    /// Show whether the load prompt has been dismissed
    Status(StatusArgs),
}
