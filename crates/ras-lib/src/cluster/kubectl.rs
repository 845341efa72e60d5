//! `kubectl` subprocess implementation of [`ClusterCli`]

use super::{parse_pod_names, ClusterCli, ClusterError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Binary looked up on `PATH` when no override is given
pub const DEFAULT_KUBECTL: &str = "kubectl";

/// A required external tool is not installed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{tool}' not installed. Please install '{tool}' and re-run the program")]
pub struct PrerequisiteError {
    pub tool: String,
}

/// Runs `kubectl` as a child process
#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: PathBuf,
}

impl Kubectl {
    /// Use a binary at a known location without checking it exists
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Locate `tool` on `PATH` (or at the given path) and fail fast if it is
    /// not there
    pub fn locate(tool: &str) -> Result<Self, PrerequisiteError> {
        let binary = find_executable(tool).ok_or_else(|| PrerequisiteError {
            tool: tool.to_string(),
        })?;
        debug!(binary = %binary.display(), "Found cluster CLI");
        Ok(Self::new(binary))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    /// Run with `args` and return stdout decoded as UTF-8
    async fn run(&self, args: &[&str]) -> Result<String, ClusterError> {
        let rendered = format!("{} {}", self.binary.display(), args.join(" "));
        debug!(command = %rendered, "Running cluster command");

        let output = self
            .command()
            .args(args)
            .output()
            .await
            .map_err(|source| ClusterError::Spawn {
                command: rendered.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ClusterError::Failed {
                command: rendered,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ClusterError::NonUtf8 { command: rendered })
    }
}

#[async_trait]
impl ClusterCli for Kubectl {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, ClusterError> {
        let listing = self.run(&["-n", namespace, "get", "pods"]).await?;
        Ok(parse_pod_names(&listing))
    }

    async fn read_file(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        path: &str,
    ) -> Result<String, ClusterError> {
        self.run(&[
            "-n", namespace, "exec", "-c", container, pod, "--", "cat", path,
        ])
        .await
    }
}

/// Find an executable the way a shell would: names containing a path
/// separator are checked directly, bare names are searched on `PATH`.
pub fn find_executable(tool: &str) -> Option<PathBuf> {
    let candidate = Path::new(tool);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(tool))
        .find(|full| is_executable(full))
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
