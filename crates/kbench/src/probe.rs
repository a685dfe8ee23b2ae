//! Toolchain presence checks and CPU detection.

use crate::error::{BenchError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Worker count used when the CPU count cannot be detected.
pub const FALLBACK_WORKERS: usize = 4;

/// Resolve `tool` against the directories in `PATH`.
///
/// Names containing a path separator are checked as given.
pub fn find_on_path(tool: &str) -> Option<PathBuf> {
    let direct = Path::new(tool);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Verify every tool resolves on PATH, failing on the first one that does not.
pub fn check_toolchain<S: AsRef<str>>(tools: &[S]) -> Result<()> {
    for tool in tools {
        let tool = tool.as_ref();
        match find_on_path(tool) {
            Some(path) => debug!(tool, path = %path.display(), "Found tool"),
            None => {
                return Err(BenchError::ToolMissing {
                    tool: tool.to_string(),
                })
            }
        }
    }
    info!(count = tools.len(), "Toolchain available");
    Ok(())
}

/// Number of logical CPUs, or [`FALLBACK_WORKERS`] when detection fails.
pub fn detect_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(FALLBACK_WORKERS)
}
