//! Tiered execution scheduler.
//!
//! Runs the lint tool for every categorized package under a fixed tier
//! order:
//!
//! 1. **Heavy** -- one invocation per package, strictly sequential, largest
//!    first, each under its own timeout. A failure only affects that package.
//! 2. **Medium** -- one batch invocation covering every medium package, with
//!    the tool's own fan-out capped at `medium_concurrency`.
//! 3. **Light** -- same as medium with `light_concurrency`.
//!
//! In [`AttributionMode::PerPackage`] the medium and light tiers instead run
//! the single-package command for each member, at most `cap` at a time.

use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::aggregator::{batch_results, single_result, ToolOutcome};
use crate::domain::models::{
    AttributionMode, CategorizedPackage, CheckResult, CheckStatus, Placeholders, SchedulerConfig,
    Tier, TieredPackages,
};
use crate::domain::ports::{ToolInvocation, ToolRunner};

/// One package's result as produced by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    /// Package name
    pub name: String,
    /// Recorded result
    pub result: CheckResult,
}

/// Executes lint tooling across tiers.
pub struct TieredScheduler {
    runner: Arc<dyn ToolRunner>,
    root: PathBuf,
    config: SchedulerConfig,
}

impl TieredScheduler {
    /// Create a scheduler running tools through `runner`.
    pub fn new(runner: Arc<dyn ToolRunner>, root: impl Into<PathBuf>, config: SchedulerConfig) -> Self {
        Self {
            runner,
            root: root.into(),
            config,
        }
    }

    /// Run every tier and return one outcome per package, in tier order.
    pub async fn run(&self, tiers: &TieredPackages) -> Vec<PackageOutcome> {
        let mut outcomes = Vec::with_capacity(tiers.len());

        for tier in Tier::ALL {
            let packages = tiers.tier(tier);
            if packages.is_empty() {
                tracing::debug!(tier = %tier, "No packages in tier; skipping");
                continue;
            }

            let start = Instant::now();
            let tier_outcomes = match (tier, self.config.attribution) {
                (Tier::Heavy, _) => self.run_sequential(tier, packages).await,
                (_, AttributionMode::EvenSplit) => {
                    self.run_batch(tier, packages, self.concurrency(tier)).await
                }
                (_, AttributionMode::PerPackage) => {
                    self.run_per_package(tier, packages, self.concurrency(tier))
                        .await
                }
            };

            let failed = tier_outcomes
                .iter()
                .filter(|o| o.result.status == CheckStatus::Failed)
                .count();
            tracing::info!(
                tier = %tier,
                packages = packages.len(),
                failed = failed,
                elapsed_ms = elapsed_ms(start),
                "Tier complete"
            );

            outcomes.extend(tier_outcomes);
        }

        outcomes
    }

    /// Concurrency cap for a batch tier.
    pub const fn concurrency(&self, tier: Tier) -> usize {
        match tier {
            Tier::Heavy => 1,
            Tier::Medium => self.config.medium_concurrency,
            Tier::Light => self.config.light_concurrency,
        }
    }

    /// Invoke packages one after another, each under the per-package timeout.
    async fn run_sequential(
        &self,
        tier: Tier,
        packages: &[CategorizedPackage],
    ) -> Vec<PackageOutcome> {
        let mut outcomes = Vec::with_capacity(packages.len());
        for package in packages {
            outcomes.push(self.run_single(tier, package).await);
        }
        outcomes
    }

    /// Invoke each package individually, at most `cap` at a time.
    ///
    /// Results keep the tier's size ordering regardless of completion order.
    async fn run_per_package(
        &self,
        tier: Tier,
        packages: &[CategorizedPackage],
        cap: usize,
    ) -> Vec<PackageOutcome> {
        stream::iter(packages)
            .map(|package| self.run_single(tier, package))
            .buffered(cap.max(1))
            .collect()
            .await
    }

    async fn run_single(&self, tier: Tier, package: &CategorizedPackage) -> PackageOutcome {
        let path = package.package.path.to_string_lossy().into_owned();
        let command = &self.config.lint_command;
        let invocation = ToolInvocation {
            program: command.program.clone(),
            args: command.render(&Placeholders {
                path: Some(&path),
                ..Default::default()
            }),
            cwd: package.package.path.clone(),
            timeout: Duration::from_secs(self.config.heavy_timeout_secs),
        };

        tracing::info!(
            package = %package.package.name,
            tier = %tier,
            size_bytes = package.package.size_bytes,
            "Linting package"
        );

        let start = Instant::now();
        let outcome = self.runner.run(&invocation).await;
        let mut result = single_result(tier, &outcome);
        if result.duration_ms == 0 {
            result.duration_ms = elapsed_ms(start);
        }

        log_outcome(&package.package.name, &outcome, &result);
        PackageOutcome {
            name: package.package.name.clone(),
            result,
        }
    }

    /// Invoke the whole tier as one batch and attribute the totals evenly.
    async fn run_batch(
        &self,
        tier: Tier,
        packages: &[CategorizedPackage],
        cap: usize,
    ) -> Vec<PackageOutcome> {
        let names: Vec<String> = packages.iter().map(|p| p.package.name.clone()).collect();
        let paths: Vec<String> = packages
            .iter()
            .map(|p| p.package.path.to_string_lossy().into_owned())
            .collect();
        let selectors: Vec<String> = packages
            .iter()
            .map(|p| path_selector(&self.root, &p.package.path))
            .collect();

        let command = &self.config.batch_lint_command;
        let invocation = ToolInvocation {
            program: command.program.clone(),
            args: command.render(&Placeholders {
                paths: &paths,
                selectors: &selectors,
                concurrency: Some(cap),
                ..Default::default()
            }),
            cwd: self.root.clone(),
            timeout: Duration::from_secs(self.config.batch_timeout_secs),
        };

        tracing::info!(
            tier = %tier,
            members = packages.len(),
            concurrency = cap,
            command = %invocation.command_line(),
            "Running batch"
        );

        let start = Instant::now();
        let outcome = self.runner.run(&invocation).await;
        let mut results = batch_results(tier, packages.len(), &outcome);

        match &outcome {
            Ok(output) if output.success => {}
            Ok(output) => tracing::warn!(
                tier = %tier,
                exit_code = ?output.exit_code,
                members = packages.len(),
                "Batch failed; marking every member failed"
            ),
            Err(e) => tracing::warn!(
                tier = %tier,
                error = %e,
                members = packages.len(),
                "Batch invocation error; marking every member failed"
            ),
        }

        let duration = elapsed_ms(start);
        for result in &mut results {
            if result.duration_ms == 0 {
                result.duration_ms = duration;
            }
        }

        names
            .into_iter()
            .zip(results)
            .map(|(name, result)| PackageOutcome { name, result })
            .collect()
    }
}

/// Directory selector for a batch member.
///
/// Members are selected by location rather than manifest name: a package
/// without a `name` is discovered under its relative path, which the batch
/// tool would otherwise read as a name pattern and silently skip.
fn path_selector(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => {
            let rel = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            format!("./{rel}")
        }
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

fn log_outcome(name: &str, outcome: &ToolOutcome, result: &CheckResult) {
    match outcome {
        Ok(output) if output.success => tracing::info!(
            package = %name,
            errors = result.errors,
            warnings = result.warnings,
            duration_ms = result.duration_ms,
            "Package linted"
        ),
        Ok(output) => tracing::warn!(
            package = %name,
            exit_code = ?output.exit_code,
            duration_ms = result.duration_ms,
            "Lint failed"
        ),
        Err(e) => tracing::warn!(
            package = %name,
            error = %e,
            "Lint invocation error"
        ),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
