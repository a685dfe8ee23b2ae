//! Candidate definitions and the registry of implementations under test.

use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Convention used to start a candidate process.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LaunchKind {
    /// Invoke the artifact directly.
    Plain,

    /// Invoke directly with the worker-count environment variable set.
    #[serde(rename = "thread_pool")]
    ThreadPoolConfigured,

    /// Wrap the invocation with the distributed-process launcher.
    #[serde(rename = "distributed")]
    DistributedLauncher,
}

impl LaunchKind {
    /// Get the launch kind name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            LaunchKind::Plain => "plain",
            LaunchKind::ThreadPoolConfigured => "thread_pool",
            LaunchKind::DistributedLauncher => "distributed",
        }
    }
}

/// Description of one implementation under test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateSpec {
    /// Unique identifier within the registry.
    pub name: String,

    /// Source file the candidate is compiled from.
    pub source_path: PathBuf,

    /// Executable produced by the build, relative to the working directory.
    pub artifact_path: PathBuf,

    /// How the artifact is launched.
    pub launch_kind: LaunchKind,

    /// Shell command that builds the artifact.
    pub build_command: String,
}

impl CandidateSpec {
    /// Create a new candidate description.
    pub fn new(
        name: impl Into<String>,
        source_path: impl Into<PathBuf>,
        artifact_path: impl Into<PathBuf>,
        launch_kind: LaunchKind,
        build_command: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
            artifact_path: artifact_path.into(),
            launch_kind,
            build_command: build_command.into(),
        }
    }
}

/// Ordered, validated set of candidates with one designated baseline.
///
/// Benchmark order equals registration order.
#[derive(Debug, Clone)]
pub struct CandidateRegistry {
    candidates: Vec<CandidateSpec>,
    baseline: String,
}

impl CandidateRegistry {
    /// Build a registry, rejecting empty sets, duplicate names and a
    /// baseline that is not among the candidates.
    pub fn new(candidates: Vec<CandidateSpec>, baseline: impl Into<String>) -> Result<Self> {
        let baseline = baseline.into();

        if candidates.is_empty() {
            return Err(BenchError::InvalidConfig(
                "at least one candidate must be registered".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for candidate in &candidates {
            if !seen.insert(candidate.name.as_str()) {
                return Err(BenchError::InvalidConfig(format!(
                    "duplicate candidate name '{}'",
                    candidate.name
                )));
            }
        }

        if !seen.contains(baseline.as_str()) {
            return Err(BenchError::BaselineMissing(baseline));
        }

        Ok(Self {
            candidates,
            baseline,
        })
    }

    /// All candidates in registration order.
    pub fn candidates(&self) -> &[CandidateSpec] {
        &self.candidates
    }

    /// Name of the baseline candidate.
    pub fn baseline_name(&self) -> &str {
        &self.baseline
    }

    /// The baseline candidate.
    pub fn baseline(&self) -> Result<&CandidateSpec> {
        self.get(&self.baseline)
            .ok_or_else(|| BenchError::BaselineMissing(self.baseline.clone()))
    }

    /// Look up a candidate by name.
    pub fn get(&self, name: &str) -> Option<&CandidateSpec> {
        self.candidates.iter().find(|c| c.name == name)
    }

    /// Whether any candidate needs the distributed launcher.
    pub fn uses_launcher(&self) -> bool {
        self.candidates
            .iter()
            .any(|c| c.launch_kind == LaunchKind::DistributedLauncher)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
