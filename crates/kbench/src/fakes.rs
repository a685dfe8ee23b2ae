//! In-memory process runner (testing only)
//!
//! `ScriptedRunner` satisfies the `ProcessRunner` contract without spawning
//! anything: each invocation is matched against scripted responses and
//! recorded for later inspection.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::launch::Invocation;
use crate::output::RunFailure;
use crate::runner::{ProcessOutput, ProcessRunner};

/// One scripted reply to an invocation.
#[derive(Debug, Clone)]
pub struct ScriptedResponse(Result<ProcessOutput, RunFailure>);

impl ScriptedResponse {
    /// Exit with the given code and streams.
    pub fn exit(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self(Ok(ProcessOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            elapsed: Duration::from_millis(1),
        }))
    }

    /// Exit 0 with the given stdout.
    pub fn stdout(stdout: &str) -> Self {
        Self::exit(0, stdout, "")
    }

    /// Exit 0 with a well-formed two-line candidate report.
    pub fn report(duration_secs: &str, checksum: &str) -> Self {
        Self::stdout(&format!("{duration_secs}\n{checksum}\n"))
    }

    /// Fail before producing output (spawn error, timeout).
    pub fn failure(failure: RunFailure) -> Self {
        Self(Err(failure))
    }
}

struct Script {
    pattern: String,
    responses: VecDeque<ScriptedResponse>,
}

/// Process runner that replays scripted responses.
///
/// An invocation is matched to the first script whose pattern occurs in its
/// command line. Responses are consumed in order and the last one repeats.
/// Unmatched invocations exit 0 with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    scripts: Mutex<Vec<Script>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the responses for invocations whose command line contains `pattern`.
    pub fn on(
        self,
        pattern: impl Into<String>,
        responses: impl IntoIterator<Item = ScriptedResponse>,
    ) -> Self {
        self.scripts.lock().unwrap().push(Script {
            pattern: pattern.into(),
            responses: responses.into_iter().collect(),
        });
        self
    }

    /// Every invocation received so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Invocations whose command line contains `pattern`.
    pub fn invocations_matching(&self, pattern: &str) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|inv| inv.display().contains(pattern))
            .collect()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        _timeout: Option<Duration>,
    ) -> Result<ProcessOutput, RunFailure> {
        self.invocations.lock().unwrap().push(invocation.clone());

        let command_line = invocation.display();
        let mut scripts = self.scripts.lock().unwrap();
        let response = scripts
            .iter_mut()
            .find(|s| command_line.contains(&s.pattern))
            .and_then(|s| {
                if s.responses.len() > 1 {
                    s.responses.pop_front()
                } else {
                    s.responses.front().cloned()
                }
            })
            .unwrap_or_else(|| ScriptedResponse::stdout(""));

        response.0
    }
}
