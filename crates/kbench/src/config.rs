//! Benchmark campaign configuration.

use crate::candidate::{CandidateRegistry, CandidateSpec, LaunchKind};
use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Default number of attempts per candidate.
pub const DEFAULT_REPETITIONS: u32 = 30;

/// Default per-attempt timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Parameters passed to every candidate, in argument order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AlgorithmParams {
    /// Dataset file path.
    pub dataset: PathBuf,

    /// Number of points in the dataset.
    pub points: u64,

    /// Dimensionality of each point.
    pub dimensions: u32,

    /// Number of clusters.
    pub clusters: u32,

    /// Number of iterations.
    pub iterations: u32,
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("dataset.txt"),
            points: 1_000_000,
            dimensions: 10,
            clusters: 100,
            iterations: 50,
        }
    }
}

impl AlgorithmParams {
    /// Command-line arguments for a candidate, in contract order.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.dataset.to_string_lossy().into_owned(),
            self.points.to_string(),
            self.dimensions.to_string(),
            self.clusters.to_string(),
            self.iterations.to_string(),
        ]
    }
}

/// Complete configuration of a benchmark campaign.
///
/// Built once at startup and passed by reference into every component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BenchConfig {
    /// Name of the candidate whose output is the reference.
    pub baseline: String,

    /// Attempts per candidate.
    pub repetitions: u32,

    /// Per-attempt timeout in seconds (0 = no timeout).
    pub timeout_secs: u64,

    /// Directory builds and runs execute in.
    pub work_dir: PathBuf,

    /// Tools that must resolve on PATH before building.
    pub required_tools: Vec<String>,

    /// Environment variable carrying the worker count to thread-pool candidates.
    pub thread_env_var: String,

    /// Distributed-process launcher program.
    pub launcher: String,

    /// Launcher flag preceding the process count.
    pub launcher_np_flag: String,

    /// Worker count override; detected from the CPU count when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Algorithm parameters.
    pub params: AlgorithmParams,

    /// Implementations under test, in benchmark order.
    pub candidates: Vec<CandidateSpec>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            baseline: "sequential".to_string(),
            repetitions: DEFAULT_REPETITIONS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            work_dir: PathBuf::from("."),
            required_tools: vec!["gcc".to_string(), "mpicc".to_string()],
            thread_env_var: "OMP_NUM_THREADS".to_string(),
            launcher: "mpirun".to_string(),
            launcher_np_flag: "-np".to_string(),
            workers: None,
            params: AlgorithmParams::default(),
            candidates: default_candidates(),
        }
    }
}

fn default_candidates() -> Vec<CandidateSpec> {
    vec![
        CandidateSpec::new(
            "sequential",
            "kmeans_sequencial.c",
            "kmeans_sequencial",
            LaunchKind::Plain,
            "gcc -o kmeans_sequencial kmeans_sequencial.c -O3",
        ),
        CandidateSpec::new(
            "openmp",
            "kmeans_openmp.c",
            "kmeans_openmp",
            LaunchKind::ThreadPoolConfigured,
            "gcc -o kmeans_openmp kmeans_openmp.c -fopenmp -O3",
        ),
        CandidateSpec::new(
            "pthreads",
            "kmeans_pthreads.c",
            "kmeans_pthreads",
            LaunchKind::Plain,
            "gcc -o kmeans_pthreads kmeans_pthreads.c -lpthread -O3",
        ),
        CandidateSpec::new(
            "mpi",
            "kmeans_mpi.c",
            "kmeans_mpi",
            LaunchKind::DistributedLauncher,
            "mpicc -o kmeans_mpi kmeans_mpi.c -O3",
        ),
    ]
}

impl BenchConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render this configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configurations no campaign can run with.
    pub fn validate(&self) -> Result<()> {
        if self.repetitions == 0 {
            return Err(BenchError::InvalidConfig(
                "repetitions must be at least 1".to_string(),
            ));
        }
        if self.params.points == 0 || self.params.dimensions == 0 || self.params.clusters == 0 {
            return Err(BenchError::InvalidConfig(
                "points, dimensions and clusters must be positive".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(BenchError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        self.registry().map(|_| ())
    }

    /// Build the validated candidate registry.
    pub fn registry(&self) -> Result<CandidateRegistry> {
        CandidateRegistry::new(self.candidates.clone(), self.baseline.clone())
    }

    /// Per-attempt timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<std::time::Duration> {
        (self.timeout_secs > 0).then(|| std::time::Duration::from_secs(self.timeout_secs))
    }

    /// Tools that must resolve on PATH, including the launcher when needed.
    pub fn required_tools(&self) -> Vec<String> {
        let mut tools = self.required_tools.clone();
        let needs_launcher = self
            .candidates
            .iter()
            .any(|c| c.launch_kind == LaunchKind::DistributedLauncher);
        if needs_launcher && !tools.contains(&self.launcher) {
            tools.push(self.launcher.clone());
        }
        tools
    }

    /// Deterministic digest of the ordered candidate set.
    pub fn registry_digest(&self) -> String {
        compute_registry_digest(&self.candidates)
    }
}

/// Compute a digest over candidate names and launch kinds, order-sensitive.
fn compute_registry_digest(candidates: &[CandidateSpec]) -> String {
    let mut hasher = Sha256::new();
    for candidate in candidates {
        hasher.update(candidate.name.as_bytes());
        hasher.update(b"\0");
        hasher.update(candidate.launch_kind.name().as_bytes());
        hasher.update(b"\0");
    }
    hex::encode(hasher.finalize())
}
