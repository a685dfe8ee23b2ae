//! Candidate output contract: two lines, duration then checksum.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single benchmark attempt did not yield a usable sample.
///
/// Always recoverable: the attempt is recorded as failed and the campaign
/// continues.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunFailure {
    /// Process could not be started
    #[error("failed to spawn process: {message}")]
    Spawn { message: String },

    /// Process exceeded the per-attempt timeout
    #[error("timed out after {millis} ms")]
    TimedOut { millis: u64 },

    /// Process exited unsuccessfully
    #[error("exited with code {exit_code}")]
    NonZeroExit { exit_code: i32 },

    /// Stdout was not exactly two lines
    #[error("expected 2 output lines, got {lines}")]
    MalformedOutput { lines: usize },

    /// First line was not a finite, non-negative number of seconds
    #[error("invalid duration '{value}'")]
    InvalidDuration { value: String },

    /// Second line was not an integer
    #[error("invalid checksum '{value}'")]
    InvalidChecksum { value: String },
}

/// Values reported by a successful candidate run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateOutput {
    /// Elapsed time reported by the candidate, in seconds.
    pub duration_secs: f64,

    /// Checksum of the computed clustering.
    pub checksum: i128,
}

/// Tagged result of parsing candidate stdout.
pub type ParsedOutput = Result<CandidateOutput, RunFailure>;

/// Parse candidate stdout.
///
/// Surrounding whitespace is ignored, then exactly two lines must remain:
/// a floating-point duration in seconds followed by an integer checksum.
pub fn parse_candidate_output(stdout: &str) -> ParsedOutput {
    let lines: Vec<&str> = stdout.trim().split('\n').map(str::trim).collect();

    let [time_line, checksum_line] = lines.as_slice() else {
        let count = if stdout.trim().is_empty() { 0 } else { lines.len() };
        return Err(RunFailure::MalformedOutput { lines: count });
    };

    let duration_secs = time_line
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| RunFailure::InvalidDuration {
            value: time_line.to_string(),
        })?;

    let checksum = checksum_line
        .parse::<i128>()
        .map_err(|_| RunFailure::InvalidChecksum {
            value: checksum_line.to_string(),
        })?;

    Ok(CandidateOutput {
        duration_secs,
        checksum,
    })
}
