//! Tool runner port.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A fully rendered external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Executable to run
    pub program: String,
    /// Rendered arguments
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Hard limit on wall-clock time
    pub timeout: Duration,
}

impl ToolInvocation {
    /// Command line for logs and messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Output of a tool that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    /// Whether the exit status was zero
    pub success: bool,
    /// Exit code, when the process exited normally
    pub exit_code: Option<i32>,
    /// Captured stdout followed by stderr
    pub combined: String,
    /// Wall-clock duration
    pub duration_ms: u64,
}

impl ToolOutput {
    /// Successful output with the given text.
    pub fn ok(combined: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            combined: combined.into(),
            duration_ms: 0,
        }
    }

    /// Failed output with the given exit code and text.
    pub fn failed(exit_code: i32, combined: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: Some(exit_code),
            combined: combined.into(),
            duration_ms: 0,
        }
    }
}

/// Invocation errors: the tool never produced a usable exit status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    /// Killed after the given number of seconds.
    #[error("Tool timed out after {0}s")]
    Timeout(u64),

    /// The program could not be started.
    #[error("Failed to spawn tool: {0}")]
    Spawn(String),

    /// Output could not be collected.
    #[error("Failed to collect tool output: {0}")]
    Io(String),
}

/// Port for running external analysis, format, audit and build tools.
///
/// The orchestrator only consumes combined text output and exit status.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run the invocation to completion or until its timeout.
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError>;
}
