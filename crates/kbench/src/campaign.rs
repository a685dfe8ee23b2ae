//! Campaign orchestration: probe, build, reference, benchmark, report.

use crate::builder::build_all;
use crate::config::BenchConfig;
use crate::error::Result;
use crate::executor::{run_all, CandidateRun};
use crate::oracle::establish_golden;
use crate::probe::{check_toolchain, detect_workers};
use crate::report::{build_rows, ComparisonReport};
use crate::runner::ProcessRunner;
use crate::stats::{summarize, CandidateSummary};
use chrono::Utc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Switches that change which phases run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignOptions {
    /// Use existing artifacts instead of building them.
    pub skip_build: bool,
}

/// Result of a complete campaign.
#[derive(Debug, Clone)]
pub struct CampaignResult {
    /// Rendered-ready comparison.
    pub report: ComparisonReport,

    /// Per-candidate statistics, in registry order.
    pub summaries: Vec<CandidateSummary>,

    /// Raw samples, in registry order.
    pub runs: Vec<CandidateRun>,

    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl CampaignResult {
    /// Number of failed attempts across every candidate.
    pub fn failed_attempts(&self) -> usize {
        self.runs.iter().map(|r| r.failed_count()).sum()
    }
}

/// Benchmark campaign driver.
pub struct Campaign;

impl Campaign {
    /// Run a full campaign.
    ///
    /// Fatal errors (missing tool, failed build, no reference checksum) are
    /// returned before any candidate is benchmarked. Individual run failures
    /// are absorbed into the samples.
    pub async fn run(
        runner: &dyn ProcessRunner,
        config: &BenchConfig,
        options: CampaignOptions,
    ) -> Result<CampaignResult> {
        let start = Instant::now();
        let started_at = Utc::now();
        let campaign_id = Uuid::new_v4();

        config.validate()?;
        let registry = config.registry()?;
        let workers = config.workers.unwrap_or_else(detect_workers);

        info!(
            campaign_id = %campaign_id,
            candidates = registry.len(),
            baseline = registry.baseline_name(),
            workers,
            "Starting benchmark campaign"
        );

        if options.skip_build {
            if registry.uses_launcher() {
                check_toolchain(&[config.launcher.as_str()])?;
            }
            info!("Skipping build phase");
        } else {
            check_toolchain(&config.required_tools())?;
            build_all(runner, &registry, config).await?;
        }

        let golden = establish_golden(runner, &registry, config, workers).await?;
        let runs = run_all(runner, &registry, config, workers, golden).await;

        let summaries: Vec<CandidateSummary> = runs
            .iter()
            .map(|run| summarize(&run.name, &run.samples, golden, config.repetitions))
            .collect();

        for summary in &summaries {
            info!(
                candidate = %summary.name,
                average_secs = summary.average_duration,
                stdev_secs = summary.stdev_duration,
                correctness = %summary.correctness_ratio(),
                "Candidate summary"
            );
        }

        let report = ComparisonReport {
            campaign_id,
            started_at,
            registry_digest: config.registry_digest(),
            golden_checksum: golden,
            workers,
            repetitions: config.repetitions,
            rows: build_rows(&summaries, registry.baseline_name()),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(campaign_id = %campaign_id, duration_ms, "Benchmark campaign finished");

        Ok(CampaignResult {
            report,
            summaries,
            runs,
            duration_ms,
        })
    }
}
