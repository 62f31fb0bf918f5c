//! Gate checker port.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::models::{GateCheck, RunReport};

/// Inputs shared by every gate checker.
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    /// Workspace root
    pub root: &'a Path,
    /// Finalized lint run
    pub report: &'a RunReport,
}

/// One independent criterion family evaluated by the quality gate.
///
/// A checker contributes one or more [`GateCheck`]s. An `Err` is converted by
/// the gate engine into a single failed check named after the checker.
#[async_trait]
pub trait GateChecker: Send + Sync {
    /// Stable name used when the checker itself fails.
    fn name(&self) -> &str;

    /// Evaluate the criterion.
    async fn evaluate(&self, ctx: &GateContext<'_>) -> anyhow::Result<Vec<GateCheck>>;

    /// Remediation hint for a failed check produced by this checker.
    fn recommendation(&self, check: &GateCheck) -> String;
}
