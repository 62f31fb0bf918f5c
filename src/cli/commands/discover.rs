//! Implementation of the `qualigate discover` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::CommandContext;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{CategorizedPackage, Tier};

/// Arguments for `qualigate discover`.
#[derive(Args, Debug, Clone, Default)]
pub struct DiscoverArgs {
    /// Ignore the package discovery cache
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Result of `qualigate discover`.
pub struct DiscoverOutput {
    /// Whether discovery was served from the cache
    pub from_cache: bool,
    /// Heavy tier, largest first
    pub heavy: Vec<CategorizedPackage>,
    /// Medium tier, largest first
    pub medium: Vec<CategorizedPackage>,
    /// Light tier, largest first
    pub light: Vec<CategorizedPackage>,
}

impl DiscoverOutput {
    fn total(&self) -> usize {
        self.heavy.len() + self.medium.len() + self.light.len()
    }
}

impl CommandOutput for DiscoverOutput {
    fn to_human(&self) -> String {
        if self.total() == 0 {
            return "No lint-capable packages found.".to_string();
        }

        let mut lines = vec![format!(
            "{} package(s){}: {} {}, {} {}, {} {}",
            self.total(),
            if self.from_cache { " (cached)" } else { "" },
            self.heavy.len(),
            Tier::Heavy,
            self.medium.len(),
            Tier::Medium,
            self.light.len(),
            Tier::Light,
        )];
        let all = self.heavy.iter().chain(&self.medium).chain(&self.light);
        lines.push(TableFormatter::new().format_packages(all));
        lines.join("\n")
    }
}

/// Discover and categorize packages.
pub fn execute(args: DiscoverArgs, ctx: &CommandContext) -> Result<bool> {
    let workspace = ctx.orchestrator().discover(!args.no_cache)?;
    let tiers = workspace.tiers;

    output(
        &DiscoverOutput {
            from_cache: workspace.from_cache,
            heavy: tiers.heavy,
            medium: tiers.medium,
            light: tiers.light,
        },
        ctx.json,
    );
    Ok(true)
}
