//! Repeated, strictly sequential timed execution of every candidate.

use crate::candidate::{CandidateRegistry, CandidateSpec};
use crate::config::BenchConfig;
use crate::launch::{candidate_invocation, Invocation};
use crate::output::{parse_candidate_output, ParsedOutput, RunFailure};
use crate::runner::ProcessRunner;
use crate::stats::{GoldenChecksum, RunSample};
use std::time::Duration;
use tracing::{debug, info, warn};

/// All samples collected for one candidate.
#[derive(Debug, Clone)]
pub struct CandidateRun {
    /// Candidate name.
    pub name: String,

    /// One sample per attempt, in attempt order.
    pub samples: Vec<RunSample>,
}

impl CandidateRun {
    /// Number of attempts that produced usable output.
    pub fn succeeded_count(&self) -> usize {
        self.samples.iter().filter(|s| s.succeeded).count()
    }

    /// Number of attempts that failed.
    pub fn failed_count(&self) -> usize {
        self.samples.iter().filter(|s| !s.succeeded).count()
    }
}

/// Run one invocation to completion and parse its output.
///
/// Nonzero exits are never parsed.
pub async fn run_attempt(
    runner: &dyn ProcessRunner,
    invocation: &Invocation,
    timeout: Option<Duration>,
) -> ParsedOutput {
    let output = runner.run(invocation, timeout).await?;
    if !output.success() {
        debug!(stderr = %output.stderr.trim(), "Candidate stderr");
        return Err(RunFailure::NonZeroExit {
            exit_code: output.exit_code,
        });
    }
    parse_candidate_output(&output.stdout)
}

/// Run one candidate `config.repetitions` times.
///
/// Failed attempts are recorded and skipped; they never stop the loop.
pub async fn run_candidate(
    runner: &dyn ProcessRunner,
    candidate: &CandidateSpec,
    config: &BenchConfig,
    workers: usize,
    golden: GoldenChecksum,
) -> CandidateRun {
    let invocation = candidate_invocation(candidate, config, workers);
    let total = config.repetitions;

    info!(
        candidate = %candidate.name,
        launch = candidate.launch_kind.name(),
        command = %invocation.display(),
        "Benchmarking candidate"
    );

    let mut samples = Vec::with_capacity(total as usize);
    for attempt in 1..=total {
        let sample = match run_attempt(runner, &invocation, config.timeout()).await {
            Ok(output) => {
                let verdict = if output.checksum == golden.0 { "OK" } else { "MISMATCH" };
                info!(
                    candidate = %candidate.name,
                    attempt,
                    total,
                    duration_secs = output.duration_secs,
                    checksum = %output.checksum,
                    verdict,
                    "Run complete"
                );
                RunSample::success(output)
            }
            Err(failure) => {
                warn!(
                    candidate = %candidate.name,
                    attempt,
                    total,
                    error = %failure,
                    "Run failed"
                );
                RunSample::failure(failure)
            }
        };
        samples.push(sample);
    }

    CandidateRun {
        name: candidate.name.clone(),
        samples,
    }
}

/// Benchmark every candidate in registry order, baseline included.
pub async fn run_all(
    runner: &dyn ProcessRunner,
    registry: &CandidateRegistry,
    config: &BenchConfig,
    workers: usize,
    golden: GoldenChecksum,
) -> Vec<CandidateRun> {
    info!(
        workers,
        repetitions = config.repetitions,
        candidates = registry.len(),
        "Starting benchmark"
    );

    let mut runs = Vec::with_capacity(registry.len());
    for candidate in registry.candidates() {
        runs.push(run_candidate(runner, candidate, config, workers, golden).await);
    }
    runs
}
