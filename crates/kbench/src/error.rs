//! Error types for kbench

use thiserror::Error;

/// Fatal errors that abort a benchmark campaign.
///
/// Recoverable per-attempt failures are not represented here; they are
/// carried as [`crate::output::RunFailure`] inside each sample.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Required build tool not resolvable on PATH
    #[error("Required tool '{tool}' is not installed or not in PATH")]
    ToolMissing { tool: String },

    /// Candidate build command failed
    #[error("Build of '{candidate}' failed (exit code {exit_code}):\n{stderr}")]
    BuildFailed {
        candidate: String,
        exit_code: i32,
        stderr: String,
    },

    /// Baseline candidate is not registered
    #[error("Baseline candidate '{0}' is not registered")]
    BaselineMissing(String),

    /// Baseline run could not produce a reference checksum
    #[error("Failed to obtain reference checksum: {reason}")]
    OracleFailed { reason: String },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for kbench operations
pub type Result<T> = std::result::Result<T, BenchError>;
