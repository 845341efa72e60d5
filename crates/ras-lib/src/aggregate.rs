//! Min/max/mean over the sampling window
//!
//! Each metric is aggregated twice: client-side from the raw range series,
//! and by the datasource's own functions, so the two can be compared.

use crate::models::{AggregateKind, AggregateRow, Metric};
use crate::prometheus::{to_bytes, AggregateQueries, MetricsSource, QueryError};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Seconds between consecutive CPU datapoints assumed when turning deltas
/// into a per-second rate. Fixed, not derived from the series timestamps.
pub const ASSUMED_SCRAPE_INTERVAL_SECS: f64 = 30.0;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("query `{query}` returned {points} datapoint(s); at least two are needed to compute a CPU rate")]
    NotEnoughPoints { query: String, points: usize },

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Summary statistics of a non-empty series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Stats {
    /// `None` for an empty series
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        Some(Self { min, max, mean })
    }
}

/// Differences between consecutive values
pub fn successive_differences(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Approximate per-second rates of a cumulative counter series
pub fn approximate_rates(values: &[f64]) -> Vec<f64> {
    successive_differences(values)
        .into_iter()
        .map(|delta| delta / ASSUMED_SCRAPE_INTERVAL_SECS)
        .collect()
}

impl AggregateRow {
    pub fn calculated(metric: Metric, stats: Stats) -> Self {
        Self {
            kind: AggregateKind::Calculated,
            metric,
            min: Some(stats.min),
            max: Some(stats.max),
            mean: Some(stats.mean),
        }
    }

    /// Datasource `rate()` yields a single value, reported as the mean
    pub fn queried_cpu_rate(rate: f64) -> Self {
        Self {
            kind: AggregateKind::Query,
            metric: Metric::Cpu,
            min: None,
            max: None,
            mean: Some(rate),
        }
    }

    /// Datasource `min_over_time()`/`max_over_time()`; no mean
    pub fn queried_memory(min: f64, max: f64) -> Self {
        Self {
            kind: AggregateKind::Query,
            metric: Metric::Memory,
            min: Some(min),
            max: Some(max),
            mean: None,
        }
    }
}

/// Run the aggregate queries and build the four comparison rows:
/// calculated CPU, queried CPU, calculated memory, queried memory.
pub async fn aggregate(
    source: &dyn MetricsSource,
    queries: &AggregateQueries,
) -> Result<Vec<AggregateRow>, AggregateError> {
    let cpu_values = source.range_values(&queries.cpu_range).await?;
    let rates = approximate_rates(&cpu_values);
    let cpu_stats = Stats::from_values(&rates).ok_or_else(|| AggregateError::NotEnoughPoints {
        query: queries.cpu_range.clone(),
        points: cpu_values.len(),
    })?;
    debug!(points = cpu_values.len(), ?cpu_stats, "Calculated CPU rate statistics");

    let cpu_rate = source.instant_value(&queries.cpu_rate).await?;

    let memory_values = source.range_values(&queries.memory_range).await?;
    let memory_values = memory_values
        .into_iter()
        .map(|value| to_bytes(value, &queries.memory_range).map(|bytes| bytes as f64))
        .collect::<Result<Vec<_>, _>>()?;
    // range_values never returns an empty series
    let memory_stats = Stats::from_values(&memory_values).ok_or_else(|| {
        QueryError::EmptyResult {
            query: queries.memory_range.clone(),
        }
    })?;
    debug!(points = memory_values.len(), ?memory_stats, "Calculated memory statistics");

    let memory_min = source.instant_value(&queries.memory_min).await?;
    let memory_max = source.instant_value(&queries.memory_max).await?;

    Ok(vec![
        AggregateRow::calculated(Metric::Cpu, cpu_stats),
        AggregateRow::queried_cpu_rate(cpu_rate),
        AggregateRow::calculated(Metric::Memory, memory_stats),
        AggregateRow::queried_memory(memory_min, memory_max),
    ])
}
