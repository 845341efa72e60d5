//! cgroup v1 readings taken inside the container
//!
//! Reads the accounting files through [`ClusterCli::read_file`]:
//! - `cpuacct.usage_all` for cumulative per-CPU user/system time
//! - `memory.usage_in_bytes` for current memory usage

use crate::cluster::ClusterCli;
use crate::models::{ContainerTarget, Sample, SampleSource};
use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

/// Per-CPU user and system time in nanoseconds
pub const CPUACCT_USAGE_ALL_PATH: &str = "/sys/fs/cgroup/cpu/cpuacct.usage_all";

/// Current memory usage in bytes
pub const MEMORY_USAGE_PATH: &str = "/sys/fs/cgroup/memory/memory.usage_in_bytes";

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CgroupParseError {
    #[error("failed to parse memory usage from {}: {content:?} is not a byte count", MEMORY_USAGE_PATH)]
    InvalidMemoryUsage { content: String },
}

/// Sum the user and system columns of `cpuacct.usage_all`.
///
/// Only lines of exactly three fields whose last two are plain integers
/// count; the `cpu user system` header and anything malformed is skipped.
pub fn parse_cpuacct_usage_all(content: &str) -> u64 {
    let mut total_ns = 0u64;

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 3 {
            continue;
        }
        match (parse_digits(parts[1]), parse_digits(parts[2])) {
            (Some(user), Some(system)) => {
                total_ns = total_ns.saturating_add(user).saturating_add(system);
            }
            _ => debug!(line, "Skipping malformed cpuacct line"),
        }
    }

    total_ns
}

fn parse_digits(field: &str) -> Option<u64> {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Convert a nanosecond total to CPU-seconds
pub fn nanos_to_seconds(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_SEC
}

/// Parse `memory.usage_in_bytes`. Output lines are trimmed and joined before
/// parsing, so a value split across lines is read as one number.
pub fn parse_memory_usage(content: &str) -> Result<u64, CgroupParseError> {
    let joined: String = content.lines().map(str::trim).collect();

    joined
        .parse()
        .map_err(|_| CgroupParseError::InvalidMemoryUsage { content: joined })
}

/// Take one cgroup reading of the target container
pub async fn read_cgroup_sample(
    cluster: &dyn ClusterCli,
    target: &ContainerTarget,
) -> Result<Sample> {
    let cpu_content = cluster
        .read_file(
            &target.namespace,
            &target.pod,
            &target.container,
            CPUACCT_USAGE_ALL_PATH,
        )
        .await
        .with_context(|| format!("Failed to read {}", CPUACCT_USAGE_ALL_PATH))?;
    let cpu_seconds = nanos_to_seconds(parse_cpuacct_usage_all(&cpu_content));

    let memory_content = cluster
        .read_file(
            &target.namespace,
            &target.pod,
            &target.container,
            MEMORY_USAGE_PATH,
        )
        .await
        .with_context(|| format!("Failed to read {}", MEMORY_USAGE_PATH))?;
    let memory_bytes = parse_memory_usage(&memory_content)?;

    debug!(cpu_seconds, memory_bytes, "Recorded cgroup reading");
    Ok(Sample::now(SampleSource::Cgroup, cpu_seconds, memory_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockCluster;

    #[test]
    fn test_parse_cpuacct_usage_all() {
        let content = "cpu user system\n0 100 200\n1 50 50\n";
        let total = parse_cpuacct_usage_all(content);
        assert_eq!(total, 400);
        assert_eq!(nanos_to_seconds(total), 400.0 / 1e9);
    }

    #[test]
    fn test_parse_cpuacct_skips_malformed_lines() {
        let content = "cpu user system\n\
                       0 1000000000 500000000\n\
                       1 12 abc\n\
                       2 7\n\
                       3 -5 10\n\
                       4 1 2 3\n\
                       5 500000000 0\n";

        assert_eq!(parse_cpuacct_usage_all(content), 2_000_000_000);
        assert_eq!(nanos_to_seconds(2_000_000_000), 2.0);
    }

    #[test]
    fn test_parse_cpuacct_empty() {
        assert_eq!(parse_cpuacct_usage_all(""), 0);
    }

    #[test]
    fn test_parse_memory_usage() {
        assert_eq!(parse_memory_usage("104857600\n"), Ok(104857600));
    }

    #[test]
    fn test_parse_memory_usage_joins_lines() {
        assert_eq!(parse_memory_usage("123\n456\n"), Ok(123456));
    }

    #[test]
    fn test_parse_memory_usage_rejects_garbage() {
        assert_eq!(
            parse_memory_usage("cat: memory.usage_in_bytes: No such file\n"),
            Err(CgroupParseError::InvalidMemoryUsage {
                content: "cat: memory.usage_in_bytes: No such file".to_string()
            })
        );
        assert!(parse_memory_usage("").is_err());
    }

    #[tokio::test]
    async fn test_read_cgroup_sample() {
        let cluster = MockCluster::new(&["api-7f"])
            .with_file(CPUACCT_USAGE_ALL_PATH, "cpu user system\n0 3000000000 1000000000\n")
            .with_file(MEMORY_USAGE_PATH, "52428800\n");
        let target = ContainerTarget {
            namespace: "default".to_string(),
            pod: "api-7f".to_string(),
            container: "api".to_string(),
        };

        let sample = read_cgroup_sample(&cluster, &target).await.unwrap();
        assert_eq!(sample.source, SampleSource::Cgroup);
        assert_eq!(sample.cpu_seconds, 4.0);
        assert_eq!(sample.memory_bytes, 52428800);
    }

    #[tokio::test]
    async fn test_read_cgroup_sample_missing_file() {
        let cluster = MockCluster::new(&["api-7f"]);
        let target = ContainerTarget {
            namespace: "default".to_string(),
            pod: "api-7f".to_string(),
            container: "api".to_string(),
        };

        let err = read_cgroup_sample(&cluster, &target).await.unwrap_err();
        assert!(format!("{err:#}").contains(CPUACCT_USAGE_ALL_PATH));
    }
}
