//! Quality gate domain model.

use serde::{Deserialize, Serialize};

/// One named pass/fail criterion evaluated by the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCheck {
    /// Stable check name (e.g. `"security-scan"`)
    pub name: String,
    /// Whether the criterion holds
    pub passed: bool,
    /// Human-readable detail
    pub message: String,
    /// Optional numeric detail (score, count, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl GateCheck {
    /// Passing check.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
            score: None,
        }
    }

    /// Failing check.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
            score: None,
        }
    }

    /// Check whose outcome is given by `passed`.
    pub fn with_outcome(name: impl Into<String>, passed: bool, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            message: message.into(),
            score: None,
        }
    }

    /// Attach a numeric detail.
    #[must_use]
    pub const fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Final gate verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    /// Checks in evaluation order
    pub checks: Vec<GateCheck>,
    /// Percentage of checks passed, rounded
    pub score: u32,
    /// Whether `score` reached the pass percentage
    pub passed: bool,
    /// One remediation hint per failed check, in check order
    pub recommendations: Vec<String>,
}

impl GateResult {
    /// Compute the verdict from evaluated checks and their recommendations.
    pub fn from_checks(
        checks: Vec<GateCheck>,
        recommendations: Vec<String>,
        pass_percentage: u32,
    ) -> Self {
        let score = gate_score(&checks);
        Self {
            checks,
            score,
            passed: score >= pass_percentage,
            recommendations,
        }
    }

    /// Number of passing checks.
    pub fn passed_checks(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }
}

/// `round(100 * passed / total)`; an empty check list scores 0.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn gate_score(checks: &[GateCheck]) -> u32 {
    if checks.is_empty() {
        return 0;
    }
    let passed = checks.iter().filter(|c| c.passed).count() as f64;
    (100.0 * passed / checks.len() as f64).round() as u32
}
