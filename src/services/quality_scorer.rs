//! Quality scoring and trend tracking.
//!
//! The baseline is loaded explicitly before a run, handed to the report, and
//! the finalized report is persisted unconditionally afterwards.

use serde::Serialize;
use std::fmt;

use crate::adapters::storage::ReportStore;
use crate::domain::errors::DomainResult;
use crate::domain::models::RunReport;

/// Direction of the score relative to the previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Score went up
    Improved,
    /// Score went down
    Regressed,
    /// Same score as last time
    Unchanged,
}

impl Trend {
    /// Classify a score delta.
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Improved
        } else if delta < 0.0 {
            Self::Regressed
        } else {
            Self::Unchanged
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Improved => "improved",
            Self::Regressed => "regressed",
            Self::Unchanged => "unchanged",
        };
        f.write_str(s)
    }
}

/// Scores runs and persists them for the next run's baseline.
pub struct QualityScorer {
    store: ReportStore,
}

impl QualityScorer {
    /// Create a scorer persisting through `store`.
    pub const fn new(store: ReportStore) -> Self {
        Self { store }
    }

    /// Score of the previous persisted run (0 when there is none).
    pub fn baseline(&self) -> f64 {
        let baseline = self.store.load_baseline();
        tracing::debug!(baseline = baseline, "Loaded quality baseline");
        baseline
    }

    /// Compute the score, then overwrite the stored report.
    ///
    /// Persistence failures are the one fatal error class of a run.
    pub fn finalize(&self, report: RunReport, duration_ms: u64) -> DomainResult<RunReport> {
        let report = report.finalize(duration_ms);
        self.store.save(&report)?;

        tracing::info!(
            score = report.quality_score,
            previous = report.previous_score,
            delta = report.delta(),
            trend = %Trend::from_delta(report.delta()),
            errors = report.errors,
            warnings = report.warnings,
            linted = report.linted_packages,
            path = %self.store.path().display(),
            "Run report finalized"
        );
        Ok(report)
    }

    /// The last persisted report, if any.
    pub fn last_report(&self) -> Option<RunReport> {
        self.store.load()
    }
}
