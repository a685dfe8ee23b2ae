//! Sequential, fail-fast compilation of every candidate.

use crate::candidate::CandidateRegistry;
use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::launch::build_invocation;
use crate::runner::ProcessRunner;
use tracing::{error, info};

/// Build every candidate in registry order.
///
/// Stops at the first failing build command; later candidates are not built
/// and nothing is benchmarked.
pub async fn build_all(
    runner: &dyn ProcessRunner,
    registry: &CandidateRegistry,
    config: &BenchConfig,
) -> Result<()> {
    for candidate in registry.candidates() {
        info!(
            candidate = %candidate.name,
            source = %candidate.source_path.display(),
            "Building candidate"
        );

        let invocation = build_invocation(candidate, config);
        let output = match runner.run(&invocation, None).await {
            Ok(output) => output,
            Err(failure) => {
                error!(candidate = %candidate.name, error = %failure, "Build could not run");
                return Err(BenchError::BuildFailed {
                    candidate: candidate.name.clone(),
                    exit_code: -1,
                    stderr: failure.to_string(),
                });
            }
        };

        if !output.success() {
            error!(candidate = %candidate.name, exit_code = output.exit_code, "Build failed");
            return Err(BenchError::BuildFailed {
                candidate: candidate.name.clone(),
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        info!(
            candidate = %candidate.name,
            duration_ms = output.elapsed.as_millis() as u64,
            "Build OK"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{CandidateSpec, LaunchKind};
    use crate::fakes::{ScriptedRunner, ScriptedResponse};

    fn config() -> BenchConfig {
        BenchConfig {
            baseline: "a".to_string(),
            candidates: vec![
                CandidateSpec::new("a", "a.c", "a", LaunchKind::Plain, "build-a"),
                CandidateSpec::new("b", "b.c", "b", LaunchKind::Plain, "build-b"),
                CandidateSpec::new("c", "c.c", "c", LaunchKind::Plain, "build-c"),
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_all_builds_succeed() {
        let config = config();
        let registry = config.registry().unwrap();
        let runner = ScriptedRunner::new();

        build_all(&runner, &registry, &config).await.unwrap();

        let commands: Vec<String> = runner
            .invocations()
            .iter()
            .map(|inv| inv.args[1].clone())
            .collect();
        assert_eq!(commands, vec!["build-a", "build-b", "build-c"]);
    }

    #[tokio::test]
    async fn test_build_failure_stops_immediately() {
        let config = config();
        let registry = config.registry().unwrap();
        let runner = ScriptedRunner::new().on(
            "sh -c build-b",
            [ScriptedResponse::exit(1, "", "b.c:1: error: expected ';'")],
        );

        let err = build_all(&runner, &registry, &config).await.unwrap_err();
        match err {
            BenchError::BuildFailed {
                candidate,
                exit_code,
                stderr,
            } => {
                assert_eq!(candidate, "b");
                assert_eq!(exit_code, 1);
                assert!(stderr.contains("expected ';'"));
            }
            other => panic!("unexpected error: {other}"),
        }

        // build-c never ran
        assert_eq!(runner.invocations().len(), 2);
    }
}
