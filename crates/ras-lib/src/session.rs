//! One sampling run against a resolved container
//!
//! [`SamplingSession`] owns the cluster and datasource handles plus the
//! resolved target. Readings are returned to the caller, which decides how
//! to collect and report them.

use crate::aggregate;
use crate::cgroup::read_cgroup_sample;
use crate::cluster::{resolve_pod, ClusterCli};
use crate::config::RunConfig;
use crate::models::{AggregateRow, ContainerTarget, Sample, SampleSource};
use crate::prometheus::{to_bytes, AggregateQueries, MetricsSource, SampleQueries};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info};

pub struct SamplingSession {
    target: ContainerTarget,
    duration_secs: u64,
    cluster: Box<dyn ClusterCli>,
    metrics: Box<dyn MetricsSource>,
}

impl SamplingSession {
    /// Resolve the target pod and open the session
    pub async fn start(
        config: &RunConfig,
        cluster: Box<dyn ClusterCli>,
        metrics: Box<dyn MetricsSource>,
    ) -> Result<Self> {
        let pods = cluster
            .list_pods(&config.namespace)
            .await
            .with_context(|| format!("Failed to list pods in namespace '{}'", config.namespace))?;
        debug!(count = pods.len(), namespace = %config.namespace, "Listed pods");

        let pod = resolve_pod(&pods, &config.pod)?;
        info!(pod = %pod, namespace = %config.namespace, selector = %config.pod, "Resolved target pod");

        Ok(Self {
            target: ContainerTarget {
                namespace: config.namespace.clone(),
                pod,
                container: config.container.clone(),
            },
            duration_secs: config.duration_secs,
            cluster,
            metrics,
        })
    }

    pub fn target(&self) -> &ContainerTarget {
        &self.target
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Read the container's cgroup accounting files
    pub async fn sample_cgroup(&self) -> Result<Sample> {
        read_cgroup_sample(self.cluster.as_ref(), &self.target).await
    }

    /// Read the container's current CPU and working-set values from the
    /// datasource
    pub async fn sample_datasource(&self) -> Result<Sample> {
        let queries = SampleQueries::new(&self.target);

        let cpu_seconds = self.metrics.instant_value(&queries.cpu).await?;
        let memory = self.metrics.instant_value(&queries.memory).await?;
        let memory_bytes = to_bytes(memory, &queries.memory)?;

        debug!(cpu_seconds, memory_bytes, "Recorded datasource reading");
        Ok(Sample::now(SampleSource::Prometheus, cpu_seconds, memory_bytes))
    }

    /// Sleep for the configured interval between sample points
    pub async fn wait_interval(&self) {
        info!(seconds = self.duration_secs, "Waiting between sample points");
        tokio::time::sleep(Duration::from_secs(self.duration_secs)).await;
    }

    /// Queries covering the sampling window
    pub fn aggregate_queries(&self) -> AggregateQueries {
        AggregateQueries::new(&self.target, self.duration_secs)
    }

    /// Build the four aggregate comparison rows
    pub async fn aggregate(&self) -> Result<Vec<AggregateRow>> {
        let rows = aggregate::aggregate(self.metrics.as_ref(), &self.aggregate_queries())
            .await
            .context("Failed to aggregate datasource readings")?;
        Ok(rows)
    }
}
