//! Process invocations for each launch convention.

use crate::candidate::{CandidateSpec, LaunchKind};
use crate::config::BenchConfig;
use std::path::{Path, PathBuf};

/// A fully resolved external process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable (first element of the command line).
    pub program: String,

    /// Arguments after the program.
    pub args: Vec<String>,

    /// Extra environment variables, on top of the inherited environment.
    pub env: Vec<(String, String)>,

    /// Working directory for the process.
    pub current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            env: Vec::new(),
            current_dir: None,
        }
    }

    /// Run a command string through `sh -c`.
    pub fn shell(command: &str) -> Self {
        Self::new("sh", vec!["-c".to_string(), command.to_string()])
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Command line as a single display string.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Path of a candidate's artifact as seen from the working directory.
///
/// Bare file names get a `./` prefix so they are never looked up on PATH.
pub fn artifact_command(artifact: &Path) -> String {
    if artifact.is_absolute() || artifact.components().count() > 1 {
        artifact.to_string_lossy().into_owned()
    } else {
        format!("./{}", artifact.to_string_lossy())
    }
}

/// Build the invocation for one benchmark attempt of `candidate`.
pub fn candidate_invocation(
    candidate: &CandidateSpec,
    config: &BenchConfig,
    workers: usize,
) -> Invocation {
    let artifact = artifact_command(&candidate.artifact_path);
    let args = config.params.to_args();

    let invocation = match candidate.launch_kind {
        LaunchKind::Plain => Invocation::new(artifact, args),
        LaunchKind::ThreadPoolConfigured => Invocation::new(artifact, args)
            .with_env(config.thread_env_var.clone(), workers.to_string()),
        LaunchKind::DistributedLauncher => {
            let mut launcher_args = vec![
                config.launcher_np_flag.clone(),
                workers.to_string(),
                artifact,
            ];
            launcher_args.extend(args);
            Invocation::new(config.launcher.clone(), launcher_args)
        }
    };

    invocation.in_dir(config.work_dir.clone())
}

/// Build the invocation that compiles `candidate`.
pub fn build_invocation(candidate: &CandidateSpec, config: &BenchConfig) -> Invocation {
    Invocation::shell(&candidate.build_command).in_dir(config.work_dir.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(kind: LaunchKind) -> CandidateSpec {
        CandidateSpec::new("c", "c.c", "kmeans_c", kind, "gcc -o kmeans_c c.c")
    }

    #[test]
    fn test_plain_invocation() {
        let config = BenchConfig::default();
        let inv = candidate_invocation(&candidate(LaunchKind::Plain), &config, 8);

        assert_eq!(inv.program, "./kmeans_c");
        assert_eq!(inv.args, config.params.to_args());
        assert!(inv.env.is_empty());
        assert_eq!(inv.current_dir, Some(PathBuf::from(".")));
    }

    #[test]
    fn test_thread_pool_invocation_sets_env() {
        let config = BenchConfig::default();
        let inv = candidate_invocation(&candidate(LaunchKind::ThreadPoolConfigured), &config, 8);

        assert_eq!(inv.program, "./kmeans_c");
        assert_eq!(
            inv.env,
            vec![("OMP_NUM_THREADS".to_string(), "8".to_string())]
        );
    }

    #[test]
    fn test_distributed_invocation_wraps_launcher() {
        let config = BenchConfig::default();
        let inv = candidate_invocation(&candidate(LaunchKind::DistributedLauncher), &config, 4);

        assert_eq!(inv.program, "mpirun");
        assert_eq!(&inv.args[..3], &["-np", "4", "./kmeans_c"]);
        assert_eq!(&inv.args[3..], config.params.to_args().as_slice());
        assert!(inv.env.is_empty());
    }

    #[test]
    fn test_artifact_command_paths() {
        assert_eq!(artifact_command(Path::new("kmeans")), "./kmeans");
        assert_eq!(artifact_command(Path::new("bin/kmeans")), "bin/kmeans");
        assert_eq!(artifact_command(Path::new("/opt/kmeans")), "/opt/kmeans");
    }

    #[test]
    fn test_build_invocation_uses_shell() {
        let config = BenchConfig::default();
        let inv = build_invocation(&candidate(LaunchKind::Plain), &config);
        assert_eq!(inv.program, "sh");
        assert_eq!(inv.args, vec!["-c", "gcc -o kmeans_c c.c"]);
    }

    #[test]
    fn test_display() {
        let inv = Invocation::new("mpirun", vec!["-np".to_string(), "2".to_string()]);
        assert_eq!(inv.display(), "mpirun -np 2");
    }
}
