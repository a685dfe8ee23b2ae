//! kbench - correctness-checked benchmarking of k-means implementations
//!
//! Provides a benchmark campaign driver that:
//! - Verifies the build toolchain and compiles every candidate
//! - Obtains a reference checksum from the baseline candidate
//! - Runs each candidate repeatedly under its launch convention
//! - Aggregates timings and correctness into a comparison report

pub mod builder;
pub mod campaign;
pub mod candidate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod executor;
pub mod fakes;
pub mod launch;
pub mod oracle;
pub mod output;
pub mod probe;
pub mod report;
pub mod runner;
pub mod stats;
pub mod telemetry;

// Re-export key types
pub use campaign::{Campaign, CampaignOptions, CampaignResult};
pub use candidate::{CandidateRegistry, CandidateSpec, LaunchKind};
pub use config::{AlgorithmParams, BenchConfig};
pub use error::{BenchError, Result};
pub use executor::CandidateRun;
pub use output::{parse_candidate_output, CandidateOutput, ParsedOutput, RunFailure};
pub use report::{render_table, ComparisonReport, ComparisonRow, TableView};
pub use runner::{ProcessOutput, ProcessRunner, SystemRunner};
pub use stats::{CandidateSummary, GoldenChecksum, RunSample};
pub use telemetry::init_tracing;
