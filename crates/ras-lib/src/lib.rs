//! Resource accuracy sampling library
//!
//! This crate provides the building blocks of `prom-ras`:
//! - Run configuration and validation
//! - Pod resolution and remote file reads through `kubectl`
//! - cgroup v1 accounting file parsing
//! - Prometheus instant/range queries
//! - Client-side and query-side aggregation

pub mod aggregate;
pub mod cgroup;
pub mod cluster;
pub mod config;
pub mod models;
pub mod prometheus;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigError, ConfigWarning, PodSelector, RunConfig, RunOptions, Validated};
pub use models::*;
pub use session::SamplingSession;
