//! Reference checksum from a single baseline run.

use crate::candidate::CandidateRegistry;
use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::executor::run_attempt;
use crate::launch::candidate_invocation;
use crate::runner::ProcessRunner;
use crate::stats::GoldenChecksum;
use tracing::info;

/// Run the baseline once and return its checksum as the reference.
///
/// Every failure is fatal: without a reference no run can be judged.
pub async fn establish_golden(
    runner: &dyn ProcessRunner,
    registry: &CandidateRegistry,
    config: &BenchConfig,
    workers: usize,
) -> Result<GoldenChecksum> {
    let baseline = registry.baseline()?;
    info!(baseline = %baseline.name, "Obtaining reference checksum");

    let invocation = candidate_invocation(baseline, config, workers);
    let output = run_attempt(runner, &invocation, config.timeout())
        .await
        .map_err(|failure| BenchError::OracleFailed {
            reason: format!("baseline '{}' {}", baseline.name, failure),
        })?;

    let golden = GoldenChecksum(output.checksum);
    info!(
        checksum = %golden,
        duration_secs = output.duration_secs,
        "Reference checksum obtained"
    );
    Ok(golden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{CandidateSpec, LaunchKind};
    use crate::fakes::{ScriptedResponse, ScriptedRunner};
    use crate::output::RunFailure;

    fn config() -> BenchConfig {
        BenchConfig {
            baseline: "seq".to_string(),
            candidates: vec![
                CandidateSpec::new("seq", "seq.c", "seq", LaunchKind::Plain, "true"),
                CandidateSpec::new("omp", "omp.c", "omp", LaunchKind::ThreadPoolConfigured, "true"),
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_golden_from_baseline() {
        let config = config();
        let registry = config.registry().unwrap();
        let runner = ScriptedRunner::new().on("./seq", [ScriptedResponse::report("1.0", "12345")]);

        let golden = establish_golden(&runner, &registry, &config, 4).await.unwrap();
        assert_eq!(golden, GoldenChecksum(12345));

        // Exactly one run, of the baseline only
        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].program, "./seq");
    }

    #[tokio::test]
    async fn test_baseline_exit_failure_is_fatal() {
        let config = config();
        let registry = config.registry().unwrap();
        let runner = ScriptedRunner::new().on("./seq", [ScriptedResponse::exit(2, "", "segfault")]);

        let err = establish_golden(&runner, &registry, &config, 4).await.unwrap_err();
        assert!(matches!(err, BenchError::OracleFailed { reason } if reason.contains("exited with code 2")));
    }

    #[tokio::test]
    async fn test_baseline_unparsable_output_is_fatal() {
        let config = config();
        let registry = config.registry().unwrap();
        let runner = ScriptedRunner::new().on("./seq", [ScriptedResponse::stdout("only one line\n")]);

        let err = establish_golden(&runner, &registry, &config, 4).await.unwrap_err();
        assert!(matches!(err, BenchError::OracleFailed { .. }));
    }

    #[tokio::test]
    async fn test_baseline_timeout_is_fatal() {
        let config = config();
        let registry = config.registry().unwrap();
        let runner = ScriptedRunner::new().on(
            "./seq",
            [ScriptedResponse::failure(RunFailure::TimedOut { millis: 1000 })],
        );

        let err = establish_golden(&runner, &registry, &config, 4).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
