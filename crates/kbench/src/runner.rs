//! External process execution.

use crate::launch::Invocation;
use crate::output::RunFailure;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code (0 = success, -1 when killed by a signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Wall-clock duration observed by the harness.
    pub elapsed: Duration,
}

impl ProcessOutput {
    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes invocations one at a time.
///
/// Implementations must not return until the process has exited or been
/// killed after `timeout`.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(
        &self,
        invocation: &Invocation,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, RunFailure>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, RunFailure> {
        let start = Instant::now();

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .envs(invocation.env.iter().cloned())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(|e| RunFailure::Spawn {
            message: format!("{}: {}", invocation.program, e),
        })?;
        let group = ProcessGroup::led_by(&child);

        let output = match timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(waited) => waited,
                Err(_) => {
                    group.kill();
                    return Err(RunFailure::TimedOut {
                        millis: limit.as_millis() as u64,
                    });
                }
            },
            None => child.wait_with_output().await,
        }
        .map_err(|e| RunFailure::Spawn {
            message: e.to_string(),
        })?;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            elapsed: start.elapsed(),
        })
    }
}

/// Process group whose leader is a spawned child.
///
/// Launchers and shell wrappers fork workers that outlive a killed leader;
/// signalling the group reaches all of them.
#[derive(Debug, Clone, Copy)]
struct ProcessGroup(Option<u32>);

impl ProcessGroup {
    fn led_by(child: &Child) -> Self {
        Self(child.id())
    }

    #[cfg(unix)]
    fn kill(self) {
        let Some(pgid) = self.0 else { return };
        // SAFETY: killpg only delivers a signal; an empty group yields ESRCH.
        let rc = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
        if rc != 0 {
            tracing::debug!(pgid, "Process group already gone");
        }
    }

    #[cfg(not(unix))]
    fn kill(self) {}
}
