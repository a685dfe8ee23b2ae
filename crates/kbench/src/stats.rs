//! Per-candidate samples and their statistical reduction.

use crate::output::{CandidateOutput, RunFailure};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference checksum produced by the baseline candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoldenChecksum(pub i128);

impl fmt::Display for GoldenChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one benchmark attempt.
///
/// `duration_secs` and `checksum` are present exactly when `succeeded`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSample {
    pub duration_secs: Option<f64>,
    pub checksum: Option<i128>,
    pub succeeded: bool,
    pub failure: Option<RunFailure>,
}

impl RunSample {
    pub fn success(output: CandidateOutput) -> Self {
        Self {
            duration_secs: Some(output.duration_secs),
            checksum: Some(output.checksum),
            succeeded: true,
            failure: None,
        }
    }

    pub fn failure(failure: RunFailure) -> Self {
        Self {
            duration_secs: None,
            checksum: None,
            succeeded: false,
            failure: Some(failure),
        }
    }

    /// Whether this attempt succeeded with the reference checksum.
    pub fn matches(&self, golden: GoldenChecksum) -> bool {
        self.succeeded && self.checksum == Some(golden.0)
    }
}

/// Aggregated statistics for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    /// Candidate name.
    pub name: String,

    /// Mean duration of successful runs in seconds (0 = no data).
    pub average_duration: f64,

    /// Sample standard deviation of successful durations (0 below two runs).
    pub stdev_duration: f64,

    /// Runs that exited cleanly with parsable output.
    pub successful_runs: u32,

    /// Successful runs whose checksum matched the reference.
    pub correct_count: u32,

    /// Configured attempts, failed ones included.
    pub total_attempts: u32,
}

impl CandidateSummary {
    /// Whether every configured attempt produced the reference checksum.
    pub fn all_correct(&self) -> bool {
        self.correct_count == self.total_attempts
    }

    /// Correctness ratio as `correct/total`.
    pub fn correctness_ratio(&self) -> String {
        format!("{}/{}", self.correct_count, self.total_attempts)
    }
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Bessel-corrected sample standard deviation, 0 below two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Reduce a candidate's samples into its summary.
pub fn summarize(
    name: &str,
    samples: &[RunSample],
    golden: GoldenChecksum,
    total_attempts: u32,
) -> CandidateSummary {
    let durations: Vec<f64> = samples
        .iter()
        .filter(|s| s.succeeded)
        .filter_map(|s| s.duration_secs)
        .collect();
    let correct_count = samples.iter().filter(|s| s.matches(golden)).count() as u32;

    CandidateSummary {
        name: name.to_string(),
        average_duration: mean(&durations),
        stdev_duration: sample_std_dev(&durations),
        successful_runs: durations.len() as u32,
        correct_count,
        total_attempts,
    }
}
