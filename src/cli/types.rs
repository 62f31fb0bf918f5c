//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::analyze::AnalyzeArgs;
use super::commands::discover::DiscoverArgs;
use super::commands::gate::GateArgs;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "qualigate")]
#[command(about = "Qualigate - workspace quality orchestrator and release gate", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Workspace root
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Explicit configuration file, merged above the workspace config files
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full lint analysis and evaluate the quality gate
    Analyze(AnalyzeArgs),

    /// Evaluate the quality gate, reusing the last report when present
    Gate(GateArgs),

    /// Discover and categorize packages without running any tools
    Discover(DiscoverArgs),

    /// Show the last persisted run report
    Report,

    /// Remove the package discovery cache
    Clean,
}
