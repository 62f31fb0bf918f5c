//! Text blocks shared by the analysis, gate and report commands.

use console::style;

use super::{format_delta, TableFormatter};
use crate::domain::models::{GateResult, RunReport};
use crate::services::Trend;

/// Headline numbers of a run, followed by the per-package table.
pub fn run_summary(report: &RunReport) -> String {
    let trend = Trend::from_delta(report.delta());
    let delta = format!("{} ({trend})", format_delta(report.delta()));
    let trend_text = match trend {
        Trend::Improved => style(delta).green(),
        Trend::Regressed => style(delta).red(),
        Trend::Unchanged => style(delta).dim(),
    };

    let mut lines = vec![
        format!(
            "Run {} at {}",
            report.run_id,
            report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        format!(
            "Packages: {} discovered, {} linted, {} failed",
            report.total_packages,
            report.linted_packages,
            report.failed_packages()
        ),
        format!(
            "Issues:   {} error(s), {} warning(s)",
            report.errors, report.warnings
        ),
        format!(
            "Score:    {:.2} (previous {:.2}, {trend_text})",
            report.quality_score, report.previous_score
        ),
        format!("Duration: {} ms", report.duration_ms),
    ];

    if !report.package_results.is_empty() {
        lines.push(String::new());
        lines.push(TableFormatter::new().format_results(report));
    }
    lines.join("\n")
}

/// Gate table, verdict line and recommendations.
pub fn gate_summary(gate: &GateResult) -> String {
    let verdict = if gate.passed {
        style(format!("PASSED ({}%)", gate.score)).green().bold()
    } else {
        style(format!("FAILED ({}%)", gate.score)).red().bold()
    };

    let mut lines = vec![
        TableFormatter::new().format_gate(gate),
        format!(
            "Quality gate: {verdict} - {}/{} checks passed",
            gate.passed_checks(),
            gate.checks.len()
        ),
    ];

    if !gate.recommendations.is_empty() {
        lines.push("\nRecommendations:".to_string());
        for rec in &gate.recommendations {
            lines.push(format!("  - {rec}"));
        }
    }
    lines.join("\n")
}
