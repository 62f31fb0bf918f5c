//! Tool-backed gate checks.
//!
//! Type checking, formatting, dependency audit and build verification all
//! reduce to "run a command in the workspace root and require a zero exit".
//! Output is not parsed; the tail of it is kept in the check message.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::models::{GateCheck, GateConfig, Placeholders, ToolCommand};
use crate::domain::ports::{GateChecker, GateContext, ToolInvocation, ToolRunner};

/// Lines of tool output kept in a failing check's message.
const OUTPUT_TAIL_LINES: usize = 5;

// ---------------------------------------------------------------------------
// CommandChecker
// ---------------------------------------------------------------------------

/// Gate checker that passes when a tool exits cleanly.
pub struct CommandChecker {
    name: &'static str,
    command: ToolCommand,
    level: Option<String>,
    timeout: Duration,
    hint: String,
    runner: Arc<dyn ToolRunner>,
}

impl CommandChecker {
    /// Create a checker for an arbitrary command.
    pub fn new(
        name: &'static str,
        command: ToolCommand,
        timeout: Duration,
        hint: impl Into<String>,
        runner: Arc<dyn ToolRunner>,
    ) -> Self {
        Self {
            name,
            command,
            level: None,
            timeout,
            hint: hint.into(),
            runner,
        }
    }

    /// Substitute `{level}` in the command arguments.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// `type-check`: the type checker must succeed.
    pub fn type_check(config: &GateConfig, runner: Arc<dyn ToolRunner>) -> Self {
        Self::new(
            "type-check",
            config.type_check_command.clone(),
            Duration::from_secs(config.tool_timeout_secs),
            "Resolve the type errors reported by the type checker",
            runner,
        )
    }

    /// `formatting`: the formatter must report no differences.
    pub fn formatting(config: &GateConfig, runner: Arc<dyn ToolRunner>) -> Self {
        Self::new(
            "formatting",
            config.format_command.clone(),
            Duration::from_secs(config.tool_timeout_secs),
            "Run the code formatter and commit the result",
            runner,
        )
    }

    /// `dependency-audit`: no vulnerabilities at or above the severity floor.
    pub fn dependency_audit(config: &GateConfig, runner: Arc<dyn ToolRunner>) -> Self {
        Self::new(
            "dependency-audit",
            config.audit_command.clone(),
            Duration::from_secs(config.tool_timeout_secs),
            format!(
                "Upgrade or replace dependencies with {} severity vulnerabilities",
                config.audit_level
            ),
            runner,
        )
        .with_level(config.audit_level.clone())
    }

    /// `build`: the workspace must build.
    pub fn build(config: &GateConfig, runner: Arc<dyn ToolRunner>) -> Self {
        Self::new(
            "build",
            config.build_command.clone(),
            Duration::from_secs(config.tool_timeout_secs),
            "Fix the build failure before releasing",
            runner,
        )
    }

    fn invocation(&self, ctx: &GateContext<'_>) -> ToolInvocation {
        ToolInvocation {
            program: self.command.program.clone(),
            args: self.command.render(&Placeholders {
                level: self.level.as_deref(),
                ..Default::default()
            }),
            cwd: ctx.root.to_path_buf(),
            timeout: self.timeout,
        }
    }
}

/// Last few non-empty lines of tool output.
fn output_tail(output: &str) -> String {
    let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    lines[start..].join("\n")
}

#[async_trait]
impl GateChecker for CommandChecker {
    fn name(&self) -> &str {
        self.name
    }

    async fn evaluate(&self, ctx: &GateContext<'_>) -> anyhow::Result<Vec<GateCheck>> {
        let invocation = self.invocation(ctx);
        let command_line = invocation.command_line();
        tracing::info!(checker = self.name, command = %command_line, "Running gate tool");

        let check = match self.runner.run(&invocation).await {
            Ok(output) if output.success => {
                GateCheck::pass(self.name, format!("`{command_line}` succeeded"))
            }
            Ok(output) => {
                let code = output
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string());
                let tail = output_tail(&output.combined);
                let message = if tail.is_empty() {
                    format!("`{command_line}` exited with {code}")
                } else {
                    format!("`{command_line}` exited with {code}:\n{tail}")
                };
                GateCheck::fail(self.name, message)
            }
            Err(e) => GateCheck::fail(self.name, format!("`{command_line}`: {e}")),
        };

        tracing::info!(checker = self.name, passed = check.passed, "Gate tool complete");
        Ok(vec![check])
    }

    fn recommendation(&self, _check: &GateCheck) -> String {
        self.hint.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tools::MockToolRunner;
    use crate::domain::models::RunReport;
    use crate::domain::ports::{ToolError, ToolOutput};
    use std::path::Path;

    fn ctx(report: &RunReport) -> GateContext<'_> {
        GateContext {
            root: Path::new("/ws"),
            report,
        }
    }

    #[test]
    fn output_tail_keeps_last_lines() {
        let output = "a\n\nb\nc\nd\ne\nf\n";
        assert_eq!(output_tail(output), "b\nc\nd\ne\nf");
        assert_eq!(output_tail(""), "");
    }

    #[tokio::test]
    async fn audit_renders_level_and_runs_in_root() {
        let runner = Arc::new(MockToolRunner::new());
        let checker = CommandChecker::dependency_audit(&GateConfig::default(), runner.clone());
        let report = RunReport::new(0, 0.0);

        let checks = checker.evaluate(&ctx(&report)).await.unwrap();
        assert_eq!(checks.len(), 1);
        assert!(checks[0].passed);
        assert_eq!(checks[0].name, "dependency-audit");

        let calls = runner.calls();
        assert_eq!(calls[0].args, vec!["audit", "--audit-level=high"]);
        assert_eq!(calls[0].cwd, Path::new("/ws"));
        assert_eq!(calls[0].timeout, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn non_zero_exit_fails_with_output_tail() {
        let runner = Arc::new(MockToolRunner::new().on_args_containing(
            "tsc",
            Ok(ToolOutput::failed(2, "src/a.ts(1,1): error TS2304")),
        ));
        let checker = CommandChecker::type_check(&GateConfig::default(), runner);
        let report = RunReport::new(0, 0.0);

        let checks = checker.evaluate(&ctx(&report)).await.unwrap();
        assert!(!checks[0].passed);
        assert!(checks[0].message.contains("exited with 2"));
        assert!(checks[0].message.contains("TS2304"));
        assert!(checker.recommendation(&checks[0]).contains("type errors"));
    }

    #[tokio::test]
    async fn timeout_fails_check() {
        let runner = Arc::new(MockToolRunner::with_default(Err(ToolError::Timeout(300))));
        let checker = CommandChecker::formatting(&GateConfig::default(), runner);
        let report = RunReport::new(0, 0.0);

        let checks = checker.evaluate(&ctx(&report)).await.unwrap();
        assert!(!checks[0].passed);
        assert!(checks[0].message.contains("timed out"));
    }
}
