//! Result parsing and attribution.
//!
//! Tool output is free-form text. Counting is line-oriented and
//! case-sensitive: a line containing `error` adds one error, a line
//! containing `warning` adds one warning (a line may add both).

use crate::domain::models::{CheckResult, CheckStatus, Tier};
use crate::domain::ports::{ToolError, ToolOutput};

/// Outcome of one tool invocation as seen by the aggregator.
pub type ToolOutcome = Result<ToolOutput, ToolError>;

/// Error and warning line counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    /// Lines containing `error`
    pub errors: u64,
    /// Lines containing `warning`
    pub warnings: u64,
}

/// Count issue lines in raw tool output.
pub fn count_issues(output: &str) -> IssueCounts {
    output.lines().fold(IssueCounts::default(), |mut acc, line| {
        if line.contains("error") {
            acc.errors += 1;
        }
        if line.contains("warning") {
            acc.warnings += 1;
        }
        acc
    })
}

/// Per-member share of a batch total: `round(total / members)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn even_share(total: u64, members: usize) -> u32 {
    if members == 0 {
        return 0;
    }
    (total as f64 / members as f64).round() as u32
}

fn outcome_duration(outcome: &ToolOutcome) -> u64 {
    outcome.as_ref().map_or(0, |o| o.duration_ms)
}

/// Result for a single-package invocation.
///
/// Non-zero exits and invocation errors record one error and no warnings.
#[allow(clippy::cast_possible_truncation)]
pub fn single_result(tier: Tier, outcome: &ToolOutcome) -> CheckResult {
    match outcome {
        Ok(output) if output.success => {
            let counts = count_issues(&output.combined);
            CheckResult {
                errors: counts.errors.min(u64::from(u32::MAX)) as u32,
                warnings: counts.warnings.min(u64::from(u32::MAX)) as u32,
                duration_ms: output.duration_ms,
                status: CheckStatus::Success,
                tier,
            }
        }
        _ => CheckResult::failed(tier, outcome_duration(outcome)),
    }
}

/// Results for a batch invocation covering `members` packages.
///
/// A clean batch splits its totals evenly; a failed batch records one error
/// for every member. Returns one result per member, in member order.
pub fn batch_results(tier: Tier, members: usize, outcome: &ToolOutcome) -> Vec<CheckResult> {
    match outcome {
        Ok(output) if output.success => {
            let counts = count_issues(&output.combined);
            let result = CheckResult {
                errors: even_share(counts.errors, members),
                warnings: even_share(counts.warnings, members),
                duration_ms: output.duration_ms,
                status: CheckStatus::Success,
                tier,
            };
            vec![result; members]
        }
        _ => vec![CheckResult::failed(tier, outcome_duration(outcome)); members],
    }
}
