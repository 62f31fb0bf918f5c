//! Command implementations.
//!
//! Each command exposes `execute(args, &CommandContext) -> Result<bool>`;
//! the returned flag becomes the process exit status (`false` exits 1).

pub mod analyze;
pub mod clean;
pub mod discover;
pub mod gate;
pub mod report;

use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::tools::ProcessToolRunner;
use crate::domain::models::Config;
use crate::services::QualityOrchestrator;

/// Resolved global options shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Workspace root
    pub root: PathBuf,
    /// Effective configuration
    pub config: Config,
    /// Machine-readable output
    pub json: bool,
}

impl CommandContext {
    /// Orchestrator running real tools in this workspace.
    pub fn orchestrator(&self) -> QualityOrchestrator {
        QualityOrchestrator::new(
            &self.root,
            self.config.clone(),
            Arc::new(ProcessToolRunner::new()),
        )
    }
}
