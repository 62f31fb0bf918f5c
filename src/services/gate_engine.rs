//! Quality gate decision engine.
//!
//! Runs the registered checkers in order, converts checker failures into
//! failed checks, and folds everything into one [`GateResult`].

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;

use super::gate_checks::{
    CommandChecker, CommentDebtChecker, LintQualityChecker, SecurityScanChecker,
};
use crate::domain::models::{Config, GateCheck, GateResult};
use crate::domain::ports::{GateChecker, GateContext, ToolRunner};

/// Ordered set of gate checkers plus the pass threshold.
pub struct QualityGate {
    checkers: Vec<Box<dyn GateChecker>>,
    pass_percentage: u32,
}

impl QualityGate {
    /// Create an empty gate.
    pub const fn new(pass_percentage: u32) -> Self {
        Self {
            checkers: Vec::new(),
            pass_percentage,
        }
    }

    /// Append a checker; checks are evaluated in registration order.
    pub fn add(&mut self, checker: Box<dyn GateChecker>) {
        self.checkers.push(checker);
    }

    /// Standard checker sequence. The build check is appended last and only
    /// when `include_build` is set.
    pub fn standard(
        config: &Config,
        runner: Arc<dyn ToolRunner>,
        include_build: bool,
    ) -> Result<Self> {
        let gate = &config.gate;
        let mut quality_gate = Self::new(gate.pass_percentage);

        quality_gate.add(Box::new(LintQualityChecker::from_config(gate)));
        quality_gate.add(Box::new(CommandChecker::type_check(gate, Arc::clone(&runner))));
        quality_gate.add(Box::new(
            SecurityScanChecker::new(gate, &config.workspace)
                .context("Invalid security pattern")?,
        ));
        quality_gate.add(Box::new(CommandChecker::formatting(gate, Arc::clone(&runner))));
        quality_gate.add(Box::new(
            CommentDebtChecker::new(gate, &config.workspace)
                .context("Invalid comment debt pattern")?,
        ));
        quality_gate.add(Box::new(CommandChecker::dependency_audit(
            gate,
            Arc::clone(&runner),
        )));
        if include_build {
            quality_gate.add(Box::new(CommandChecker::build(gate, runner)));
        }

        Ok(quality_gate)
    }

    /// Number of registered checkers.
    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    /// Whether no checkers are registered.
    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    /// Evaluate every checker and render the verdict.
    ///
    /// A checker returning `Err` contributes one failed check named after the
    /// checker, with the error as its message. Each failed check gets exactly
    /// one recommendation, prefixed with the check name.
    pub async fn evaluate(&self, ctx: &GateContext<'_>) -> GateResult {
        let start = Instant::now();
        tracing::info!(checkers = self.checkers.len(), "Evaluating quality gate");

        let mut checks = Vec::new();
        let mut recommendations = Vec::new();

        for checker in &self.checkers {
            let produced = match checker.evaluate(ctx).await {
                Ok(produced) => produced,
                Err(e) => {
                    tracing::error!(checker = checker.name(), error = %e, "Gate checker failed");
                    vec![GateCheck::fail(checker.name(), format!("{e:#}"))]
                }
            };

            for check in produced {
                if check.passed {
                    tracing::debug!(check = %check.name, "Gate check passed");
                } else {
                    tracing::warn!(check = %check.name, message = %check.message, "Gate check failed");
                    recommendations.push(format!(
                        "{}: {}",
                        check.name,
                        checker.recommendation(&check)
                    ));
                }
                checks.push(check);
            }
        }

        let result = GateResult::from_checks(checks, recommendations, self.pass_percentage);

        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            score = result.score,
            passed = result.passed,
            checks = result.checks.len(),
            passed_checks = result.passed_checks(),
            elapsed_ms,
            "Quality gate evaluated"
        );
        result
    }
}
