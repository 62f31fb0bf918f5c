//! Implementation of the `qualigate analyze` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::CommandContext;
use crate::cli::output::summary::{gate_summary, run_summary};
use crate::cli::output::{create_spinner, output, CommandOutput};
use crate::domain::models::{GateResult, RunReport};

/// Arguments for `qualigate analyze`.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Include the build verification check in the gate
    #[arg(long)]
    pub build: bool,

    /// Ignore the package discovery cache
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Result of `qualigate analyze`.
pub struct AnalyzeOutput {
    /// Whether discovery was served from the cache
    pub from_cache: bool,
    /// Finalized run report
    pub report: RunReport,
    /// Gate verdict for the run
    pub gate: GateResult,
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        let source = if self.from_cache {
            "Packages loaded from cache"
        } else {
            "Packages discovered"
        };
        format!(
            "{source}\n{}\n\n{}",
            run_summary(&self.report),
            gate_summary(&self.gate)
        )
    }
}

/// Analyze the workspace and gate the result. Returns the gate verdict.
pub async fn execute(args: AnalyzeArgs, ctx: &CommandContext) -> Result<bool> {
    let orchestrator = ctx.orchestrator();

    let spinner = create_spinner("Running lint analysis...", ctx.json);
    let run = orchestrator.analyze(!args.no_cache).await;
    spinner.finish_and_clear();
    let run = run?;

    let spinner = create_spinner("Evaluating quality gate...", ctx.json);
    let gate = orchestrator.gate(&run.report, args.build).await;
    spinner.finish_and_clear();
    let gate = gate?;

    let passed = gate.passed;
    output(
        &AnalyzeOutput {
            from_cache: run.workspace.from_cache,
            report: run.report,
            gate,
        },
        ctx.json,
    );
    Ok(passed)
}
