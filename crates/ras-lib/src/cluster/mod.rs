//! Cluster access through the `kubectl` binary
//!
//! Everything the run needs from the cluster goes through [`ClusterCli`]:
//! listing pod names in a namespace and reading a file inside a container.

mod kubectl;
mod resolver;

pub use kubectl::{find_executable, Kubectl, PrerequisiteError, DEFAULT_KUBECTL};
pub use resolver::{parse_pod_names, resolve_pod, ResolveError};

use async_trait::async_trait;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures of a single cluster CLI invocation
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("`{command}` produced output that is not valid UTF-8")]
    NonUtf8 { command: String },
}

/// Trait for cluster access implementations
#[async_trait]
pub trait ClusterCli: Send + Sync {
    /// List the names of all pods in a namespace
    async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, ClusterError>;

    /// Return the contents of `path` inside `container` of `pod`
    async fn read_file(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        path: &str,
    ) -> Result<String, ClusterError>;
}
