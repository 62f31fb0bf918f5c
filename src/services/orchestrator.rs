//! Quality run orchestration.
//!
//! Wires the pipeline stages together: discovery, categorization, tiered
//! execution, aggregation into a [`RunReport`], scoring and persistence.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::categorizer::Categorizer;
use super::discovery::PackageDiscovery;
use super::gate_engine::QualityGate;
use super::quality_scorer::QualityScorer;
use super::scheduler::TieredScheduler;
use crate::adapters::storage::{PackageCache, ReportStore};
use crate::domain::models::{Config, GateResult, RunReport, TieredPackages};
use crate::domain::ports::{GateContext, ToolRunner};

/// Packages found and categorized for a run.
#[derive(Debug, Clone)]
pub struct DiscoveredWorkspace {
    /// Packages bucketed by tier
    pub tiers: TieredPackages,
    /// Whether discovery was served from the cache
    pub from_cache: bool,
}

/// Outcome of a full analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// Packages that were analyzed
    pub workspace: DiscoveredWorkspace,
    /// Finalized and persisted report
    pub report: RunReport,
}

/// Drives one orchestration pass over a workspace.
pub struct QualityOrchestrator {
    root: PathBuf,
    config: Config,
    runner: Arc<dyn ToolRunner>,
}

impl QualityOrchestrator {
    /// Create an orchestrator for the workspace at `root`.
    pub fn new(root: impl Into<PathBuf>, config: Config, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            root: root.into(),
            config,
            runner,
        }
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Effective configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// State directory holding the cache and report artifacts.
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(&self.config.workspace.state_dir)
    }

    /// Discovery cache for this workspace.
    pub fn package_cache(&self) -> PackageCache {
        PackageCache::in_state_dir(
            &self.state_dir(),
            Duration::from_secs(self.config.workspace.cache_ttl_secs),
        )
    }

    /// Scorer backed by this workspace's report store.
    pub fn scorer(&self) -> QualityScorer {
        QualityScorer::new(ReportStore::in_state_dir(&self.state_dir()))
    }

    /// Discover and categorize packages.
    pub fn discover(&self, use_cache: bool) -> Result<DiscoveredWorkspace> {
        let discovery = PackageDiscovery::new(
            &self.root,
            self.config.workspace.clone(),
            self.package_cache(),
        );
        let outcome = discovery.discover(use_cache);

        let categorizer = Categorizer::new(&self.config.categorizer)
            .context("Invalid categorizer configuration")?;

        Ok(DiscoveredWorkspace {
            tiers: categorizer.categorize(outcome.packages),
            from_cache: outcome.from_cache,
        })
    }

    /// Run the full pipeline and persist the report.
    pub async fn analyze(&self, use_cache: bool) -> Result<AnalysisRun> {
        let start = Instant::now();
        tracing::info!(root = %self.root.display(), "Starting quality analysis");

        let workspace = self.discover(use_cache)?;
        let scorer = self.scorer();
        let mut report = RunReport::new(workspace.tiers.len(), scorer.baseline());

        let scheduler = TieredScheduler::new(
            Arc::clone(&self.runner),
            &self.root,
            self.config.scheduler.clone(),
        );
        for outcome in scheduler.run(&workspace.tiers).await {
            if let Err(e) = report.record(&outcome.name, outcome.result) {
                tracing::warn!(package = %outcome.name, error = %e, "Result not recorded");
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        let report = scorer
            .finalize(report, duration_ms)
            .context("Failed to persist run report")?;

        Ok(AnalysisRun { workspace, report })
    }

    /// Evaluate the quality gate against a finalized report.
    pub async fn gate(&self, report: &RunReport, include_build: bool) -> Result<GateResult> {
        let gate = QualityGate::standard(&self.config, Arc::clone(&self.runner), include_build)?;
        let ctx = GateContext {
            root: &self.root,
            report,
        };
        Ok(gate.evaluate(&ctx).await)
    }
}
