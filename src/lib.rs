//! Qualigate - workspace quality orchestrator
//!
//! Discovers the lint-capable packages of a multi-package workspace, weighs
//! them into execution tiers, runs lint tooling under a per-tier concurrency
//! policy, scores the aggregated results against the previous run, and feeds
//! the score plus independent checks into a pass/fail release gate.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and ports (`ToolRunner`, `GateChecker`)
//! - **Adapters** (`adapters`): process-backed tool runner and file-backed state
//! - **Service Layer** (`services`): discovery, categorizer, scheduler, scorer, gate
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use qualigate::{Config, ProcessToolRunner, QualityOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator =
//!         QualityOrchestrator::new(".", Config::default(), Arc::new(ProcessToolRunner::new()));
//!     let run = orchestrator.analyze(true).await?;
//!     let gate = orchestrator.gate(&run.report, false).await?;
//!     std::process::exit(i32::from(!gate.passed));
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::storage::{PackageCache, ReportStore};
pub use adapters::tools::{MockToolRunner, ProcessToolRunner};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    CategorizedPackage, CheckResult, CheckStatus, Config, GateCheck, GateResult, Package,
    RunReport, Tier, TieredPackages,
};
pub use domain::ports::{GateChecker, GateContext, ToolError, ToolInvocation, ToolOutput, ToolRunner};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{QualityGate, QualityOrchestrator, QualityScorer, TieredScheduler};
