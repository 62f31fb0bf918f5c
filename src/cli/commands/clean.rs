//! Implementation of the `qualigate clean` command.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use super::CommandContext;
use crate::cli::output::{output, CommandOutput};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Result of `qualigate clean`.
pub struct CleanOutput {
    /// Whether a cache file existed
    pub removed: bool,
    /// Cache location
    pub path: PathBuf,
}

impl CommandOutput for CleanOutput {
    fn to_human(&self) -> String {
        if self.removed {
            format!("Removed package cache {}", self.path.display())
        } else {
            "No package cache to remove.".to_string()
        }
    }
}

/// Delete the package discovery cache.
pub fn execute(ctx: &CommandContext) -> Result<bool> {
    let cache = ctx.orchestrator().package_cache();
    let removed = cache
        .clear()
        .with_context(|| format!("Failed to remove {}", cache.path().display()))?;

    tracing::info!(path = %cache.path().display(), removed, "Package cache cleaned");
    output(
        &CleanOutput {
            removed,
            path: cache.path().to_path_buf(),
        },
        ctx.json,
    );
    Ok(true)
}
