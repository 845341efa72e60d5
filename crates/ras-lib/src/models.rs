//! Core data models for a sampling run

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a reading was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleSource {
    /// cgroup pseudo-files read inside the container
    Cgroup,
    /// Prometheus-compatible datasource
    Prometheus,
}

impl fmt::Display for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSource::Cgroup => f.write_str("Cgroup"),
            SampleSource::Prometheus => f.write_str("Prometheus"),
        }
    }
}

/// A single point-in-time reading of one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Local>,
    pub source: SampleSource,
    /// Cumulative CPU time in seconds
    pub cpu_seconds: f64,
    pub memory_bytes: u64,
}

impl Sample {
    /// Record a reading taken now
    pub fn now(source: SampleSource, cpu_seconds: f64, memory_bytes: u64) -> Self {
        Self {
            timestamp: Local::now(),
            source,
            cpu_seconds,
            memory_bytes,
        }
    }
}

/// The container being sampled, once the pod has been resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerTarget {
    pub namespace: String,
    pub pod: String,
    pub container: String,
}

/// How an aggregate row was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateKind {
    /// Reduced client-side from a raw range series
    Calculated,
    /// Returned by a datasource function
    Query,
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateKind::Calculated => f.write_str("Calculated"),
            AggregateKind::Query => f.write_str("Query"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "CPU")]
    Cpu,
    Memory,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Cpu => f.write_str("CPU"),
            Metric::Memory => f.write_str("Memory"),
        }
    }
}

/// One row of the aggregate comparison.
///
/// Values a path cannot produce are `None`: the rate query yields only a
/// mean, the `min_over_time`/`max_over_time` queries yield no mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub kind: AggregateKind,
    pub metric: Metric,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}
