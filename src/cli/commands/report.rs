//! Implementation of the `qualigate report` command.

use anyhow::Result;
use serde::Serialize;

use super::CommandContext;
use crate::cli::output::summary::run_summary;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::RunReport;
use crate::services::Trend;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Result of `qualigate report`.
pub struct ReportOutput {
    /// Last persisted report, if any
    pub report: Option<RunReport>,
    /// Trend of that report against its baseline
    pub trend: Option<Trend>,
}

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        self.report.as_ref().map_or_else(
            || "No report found. Run `qualigate analyze` first.".to_string(),
            run_summary,
        )
    }
}

/// Print the last persisted report.
pub fn execute(ctx: &CommandContext) -> Result<bool> {
    let report = ctx.orchestrator().scorer().last_report();
    let trend = report.as_ref().map(|r| Trend::from_delta(r.delta()));

    output(&ReportOutput { report, trend }, ctx.json);
    Ok(true)
}
