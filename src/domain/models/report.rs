//! Run report domain model.
//!
//! A [`RunReport`] is the aggregate outcome of one orchestration pass. It is
//! built through [`RunReport::record`] and closed by [`RunReport::finalize`];
//! persistence is handled by the report store in the infrastructure layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::package::Tier;
use crate::domain::errors::{DomainError, DomainResult};

/// Tolerated issues per linted package before the score reaches zero.
pub const ISSUES_PER_PACKAGE_BASELINE: f64 = 10.0;

/// Outcome status of one package analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The tool invocation exited cleanly
    Success,
    /// The tool invocation failed or timed out
    Failed,
}

/// One package's lint outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Error lines attributed to the package
    pub errors: u32,
    /// Warning lines attributed to the package
    pub warnings: u32,
    /// Wall-clock duration of the invocation that covered the package
    pub duration_ms: u64,
    /// Invocation status
    pub status: CheckStatus,
    /// Tier the package ran in
    pub tier: Tier,
}

impl CheckResult {
    /// Result recorded when an invocation fails or times out.
    pub const fn failed(tier: Tier, duration_ms: u64) -> Self {
        Self {
            errors: 1,
            warnings: 0,
            duration_ms,
            status: CheckStatus::Failed,
            tier,
        }
    }
}

/// Aggregate outcome of one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Identifier of the run
    pub run_id: Uuid,
    /// When the run started
    pub timestamp: DateTime<Utc>,
    /// Packages found by discovery
    pub total_packages: usize,
    /// Packages with a recorded result
    pub linted_packages: usize,
    /// Running error total
    pub errors: u64,
    /// Running warning total
    pub warnings: u64,
    /// Results keyed by package name
    pub package_results: BTreeMap<String, CheckResult>,
    /// Normalized score in `[0, 100]`
    pub quality_score: f64,
    /// Score of the previous persisted run
    pub previous_score: f64,
    /// Total run duration
    pub duration_ms: u64,
}

impl RunReport {
    /// Start a report for a run over `total_packages` packages.
    ///
    /// `previous_score` is the baseline loaded from the last persisted report
    /// and is never changed afterwards.
    pub fn new(total_packages: usize, previous_score: f64) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            total_packages,
            linted_packages: 0,
            errors: 0,
            warnings: 0,
            package_results: BTreeMap::new(),
            quality_score: 0.0,
            previous_score,
            duration_ms: 0,
        }
    }

    /// Record one package result and bump the running totals.
    pub fn record(&mut self, name: impl Into<String>, result: CheckResult) -> DomainResult<()> {
        let name = name.into();
        if self.package_results.contains_key(&name) {
            return Err(DomainError::DuplicateResult(name));
        }

        self.errors += u64::from(result.errors);
        self.warnings += u64::from(result.warnings);
        self.linted_packages += 1;
        self.package_results.insert(name, result);
        Ok(())
    }

    /// Compute the quality score and stamp the run duration.
    ///
    /// Consumes the report so a run is finalized exactly once.
    #[must_use]
    pub fn finalize(mut self, duration_ms: u64) -> Self {
        self.quality_score = quality_score(self.errors, self.warnings, self.linted_packages);
        self.duration_ms = duration_ms;
        self
    }

    /// Score change relative to the previous run.
    pub fn delta(&self) -> f64 {
        round2(self.quality_score - self.previous_score)
    }

    /// Number of packages whose invocation failed.
    pub fn failed_packages(&self) -> usize {
        self.package_results
            .values()
            .filter(|r| r.status == CheckStatus::Failed)
            .count()
    }
}

/// `clamp(100 - issues / (10 * linted) * 100, 0, 100)`, two decimals.
///
/// With no linted packages there is no evidence of issues and the score is 100.
#[allow(clippy::cast_precision_loss)]
pub fn quality_score(errors: u64, warnings: u64, linted_packages: usize) -> f64 {
    if linted_packages == 0 {
        return 100.0;
    }

    let issues = (errors + warnings) as f64;
    let tolerated = ISSUES_PER_PACKAGE_BASELINE * linted_packages as f64;
    round2((100.0 - issues / tolerated * 100.0).clamp(0.0, 100.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(errors: u32, warnings: u32) -> CheckResult {
        CheckResult {
            errors,
            warnings,
            duration_ms: 5,
            status: CheckStatus::Success,
            tier: Tier::Light,
        }
    }

    #[test]
    fn test_score_is_100_without_issues() {
        assert!((quality_score(0, 0, 7) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_clamps_at_zero() {
        assert!(quality_score(1_000_000, 5, 1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_rounds_to_two_decimals() {
        // 100 - 1 / 30 * 100 = 96.666...
        assert!((quality_score(1, 0, 3) - 96.67).abs() < 1e-9);
    }

    #[test]
    fn test_score_without_linted_packages() {
        assert!((quality_score(0, 0, 0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_accumulates_totals() {
        let mut report = RunReport::new(2, 50.0);
        report.record("a", ok(2, 3)).unwrap();
        report.record("b", CheckResult::failed(Tier::Heavy, 10)).unwrap();

        assert_eq!(report.linted_packages, 2);
        assert_eq!(report.errors, 3);
        assert_eq!(report.warnings, 3);
        assert_eq!(report.failed_packages(), 1);
    }

    #[test]
    fn test_record_rejects_duplicates() {
        let mut report = RunReport::new(1, 0.0);
        report.record("a", ok(1, 0)).unwrap();

        let err = report.record("a", ok(5, 5)).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateResult(ref n) if n == "a"));
        assert_eq!(report.errors, 1);
        assert_eq!(report.linted_packages, 1);
    }

    #[test]
    fn test_finalize_keeps_previous_score() {
        let mut report = RunReport::new(1, 42.5);
        report.record("a", ok(0, 5)).unwrap();
        let report = report.finalize(1234);

        assert!((report.quality_score - 50.0).abs() < f64::EPSILON);
        assert!((report.previous_score - 42.5).abs() < f64::EPSILON);
        assert!((report.delta() - 7.5).abs() < 1e-9);
        assert_eq!(report.duration_ms, 1234);
    }
}
