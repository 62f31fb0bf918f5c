//! Implementation of the `qualigate gate` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::CommandContext;
use crate::cli::output::summary::gate_summary;
use crate::cli::output::{create_spinner, output, CommandOutput};
use crate::domain::models::GateResult;

/// Arguments for `qualigate gate`.
#[derive(Args, Debug, Clone, Default)]
pub struct GateArgs {
    /// Include the build verification check
    #[arg(long)]
    pub build: bool,

    /// Ignore the package discovery cache if an analysis has to run
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Result of `qualigate gate`.
pub struct GateOutput {
    /// Whether the lint analysis ran as part of this command
    pub analyzed: bool,
    /// Quality score of the gated report
    pub quality_score: f64,
    /// Gate verdict
    pub gate: GateResult,
}

impl CommandOutput for GateOutput {
    fn to_human(&self) -> String {
        let source = if self.analyzed {
            "No previous report; ran a fresh analysis"
        } else {
            "Using the last persisted report"
        };
        format!(
            "{source} (quality score {:.2})\n\n{}",
            self.quality_score,
            gate_summary(&self.gate)
        )
    }
}

/// Gate the last report, analyzing first when there is none.
pub async fn execute(args: GateArgs, ctx: &CommandContext) -> Result<bool> {
    let orchestrator = ctx.orchestrator();

    let (report, analyzed) = match orchestrator.scorer().last_report() {
        Some(report) => (report, false),
        None => {
            tracing::info!("No persisted report found; running analysis first");
            let spinner = create_spinner("Running lint analysis...", ctx.json);
            let run = orchestrator.analyze(!args.no_cache).await;
            spinner.finish_and_clear();
            (run?.report, true)
        }
    };

    let spinner = create_spinner("Evaluating quality gate...", ctx.json);
    let gate = orchestrator.gate(&report, args.build).await;
    spinner.finish_and_clear();
    let gate = gate?;

    let passed = gate.passed;
    output(
        &GateOutput {
            analyzed,
            quality_score: report.quality_score,
            gate,
        },
        ctx.json,
    );
    Ok(passed)
}
