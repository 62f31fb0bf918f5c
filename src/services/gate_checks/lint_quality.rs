//! Lint quality checks.
//!
//! Reads the finalized [`RunReport`] and produces the three lint criteria:
//! score floor, error ceiling and warning ceiling. No tool is invoked.

use async_trait::async_trait;

use crate::domain::models::{GateCheck, GateConfig};
use crate::domain::ports::{GateChecker, GateContext};

// ---------------------------------------------------------------------------
// LintQualityChecker
// ---------------------------------------------------------------------------

/// Gate checker over the aggregated lint results.
pub struct LintQualityChecker {
    min_score: f64,
    max_errors: u64,
    max_warnings: u64,
}

impl LintQualityChecker {
    /// Check names, in evaluation order.
    pub const SCORE: &'static str = "lint-score";
    /// Error ceiling check.
    pub const ERRORS: &'static str = "lint-errors";
    /// Warning ceiling check.
    pub const WARNINGS: &'static str = "lint-warnings";

    /// Create a checker from explicit thresholds.
    pub const fn new(min_score: f64, max_errors: u64, max_warnings: u64) -> Self {
        Self {
            min_score,
            max_errors,
            max_warnings,
        }
    }

    /// Create a checker from gate configuration.
    pub const fn from_config(config: &GateConfig) -> Self {
        Self::new(config.min_quality_score, config.max_errors, config.max_warnings)
    }
}

#[async_trait]
impl GateChecker for LintQualityChecker {
    fn name(&self) -> &str {
        "lint-quality"
    }

    async fn evaluate(&self, ctx: &GateContext<'_>) -> anyhow::Result<Vec<GateCheck>> {
        let report = ctx.report;

        #[allow(clippy::cast_precision_loss)]
        let checks = vec![
            GateCheck::with_outcome(
                Self::SCORE,
                report.quality_score >= self.min_score,
                format!(
                    "Quality score {:.2} (minimum {:.2})",
                    report.quality_score, self.min_score
                ),
            )
            .with_score(report.quality_score),
            GateCheck::with_outcome(
                Self::ERRORS,
                report.errors <= self.max_errors,
                format!("{} error(s) (maximum {})", report.errors, self.max_errors),
            )
            .with_score(report.errors as f64),
            GateCheck::with_outcome(
                Self::WARNINGS,
                report.warnings <= self.max_warnings,
                format!(
                    "{} warning(s) (maximum {})",
                    report.warnings, self.max_warnings
                ),
            )
            .with_score(report.warnings as f64),
        ];

        tracing::info!(
            checker = self.name(),
            score = report.quality_score,
            errors = report.errors,
            warnings = report.warnings,
            "Lint quality evaluated"
        );
        Ok(checks)
    }

    fn recommendation(&self, check: &GateCheck) -> String {
        match check.name.as_str() {
            Self::SCORE => format!(
                "Raise the lint quality score to at least {:.0} by fixing reported issues",
                self.min_score
            ),
            Self::ERRORS => "Fix all lint errors before releasing".to_string(),
            Self::WARNINGS => format!(
                "Reduce lint warnings to {} or fewer",
                self.max_warnings
            ),
            _ => "Review lint results".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CheckResult, CheckStatus, RunReport, Tier};
    use std::path::Path;

    fn report(errors: u32, warnings: u32) -> RunReport {
        let mut report = RunReport::new(1, 0.0);
        report
            .record(
                "pkg",
                CheckResult {
                    errors,
                    warnings,
                    duration_ms: 1,
                    status: CheckStatus::Success,
                    tier: Tier::Light,
                },
            )
            .unwrap();
        report.finalize(1)
    }

    #[tokio::test]
    async fn clean_report_passes_all_three() {
        let report = report(0, 0);
        let ctx = GateContext {
            root: Path::new("."),
            report: &report,
        };
        let checks = LintQualityChecker::from_config(&GateConfig::default())
            .evaluate(&ctx)
            .await
            .unwrap();

        let names: Vec<_> = checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["lint-score", "lint-errors", "lint-warnings"]);
        assert!(checks.iter().all(|c| c.passed));
        assert_eq!(checks[0].score, Some(100.0));
    }

    #[tokio::test]
    async fn thresholds_are_inclusive() {
        // 5 warnings in one package: score 50, warnings exactly at the ceiling.
        let report = report(0, 5);
        let ctx = GateContext {
            root: Path::new("."),
            report: &report,
        };
        let checks = LintQualityChecker::new(50.0, 0, 5)
            .evaluate(&ctx)
            .await
            .unwrap();
        assert!(checks.iter().all(|c| c.passed));
    }

    #[tokio::test]
    async fn one_error_fails_error_ceiling() {
        let report = report(1, 0);
        let ctx = GateContext {
            root: Path::new("."),
            report: &report,
        };
        let checker = LintQualityChecker::new(80.0, 0, 10);
        let checks = checker.evaluate(&ctx).await.unwrap();

        assert!(checks[0].passed);
        assert!(!checks[1].passed);
        assert!(checks[2].passed);
        assert!(checker.recommendation(&checks[1]).contains("lint errors"));
    }
}
