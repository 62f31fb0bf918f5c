//! Subprocess tool runner.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::timeout;

use crate::domain::ports::{ToolError, ToolInvocation, ToolOutput, ToolRunner};

/// Runs tools as child processes with an enforced timeout.
///
/// On unix the child leads its own process group. An expired timeout kills
/// the whole group, so workers forked by the tool (eslint under `npm run`,
/// pnpm's per-package scripts) die with it. `kill_on_drop` still covers a
/// cancelled run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessToolRunner;

impl ProcessToolRunner {
    /// Create a new process runner.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolRunner for ProcessToolRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        tracing::debug!(
            command = %invocation.command_line(),
            cwd = %invocation.cwd.display(),
            timeout_secs = invocation.timeout.as_secs(),
            "Spawning tool"
        );

        let start = Instant::now();
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(|e| {
            tracing::error!(
                program = %invocation.program,
                error = %e,
                "Failed to spawn tool"
            );
            ToolError::Spawn(format!("{}: {}", invocation.program, e))
        })?;
        let pid = child.id();

        let output = match timeout(invocation.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ToolError::Io(e.to_string())),
            Err(_) => {
                kill_process_group(pid);
                tracing::warn!(
                    command = %invocation.command_line(),
                    timeout_secs = invocation.timeout.as_secs(),
                    "Tool timed out; process group killed"
                );
                return Err(ToolError::Timeout(invocation.timeout.as_secs()));
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&stderr);
        }

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;

        Ok(ToolOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            combined,
            duration_ms,
        })
    }
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    match killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        // Group already gone.
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => tracing::warn!(pgid = pid, error = %e, "Failed to kill process group"),
    }
}

#[cfg(not(unix))]
const fn kill_process_group(_pid: Option<u32>) {}
