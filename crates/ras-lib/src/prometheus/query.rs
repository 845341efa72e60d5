//! PromQL expressions for the sampled container

use crate::models::ContainerTarget;

/// Cumulative CPU time consumed by the container
pub const CPU_USAGE_METRIC: &str = "container_cpu_usage_seconds_total";

/// Memory actively in use by the container
pub const MEMORY_WORKING_SET_METRIC: &str = "container_memory_working_set_bytes";

/// `metric{container="..", image!="", pod=".."}`.
///
/// The `image!=""` matcher drops the pause container and the pod-level
/// cgroup series.
pub fn container_selector(metric: &str, target: &ContainerTarget) -> String {
    format!(
        r#"{}{{container="{}", image!="", pod="{}"}}"#,
        metric,
        escape_label_value(&target.container),
        escape_label_value(&target.pod)
    )
}

/// `expr[<secs>s]`
pub fn range_selector(expr: &str, secs: u64) -> String {
    format!("{}[{}s]", expr, secs)
}

/// `func(expr)`
pub fn call(function: &str, expr: &str) -> String {
    format!("{}({})", function, expr)
}

fn escape_label_value(value: &str) -> String {
    value.replace('\\', r"\\").replace('"', "\\\"")
}

/// Instant queries taken at each sample point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleQueries {
    pub cpu: String,
    pub memory: String,
}

impl SampleQueries {
    pub fn new(target: &ContainerTarget) -> Self {
        Self {
            cpu: container_selector(CPU_USAGE_METRIC, target),
            memory: container_selector(MEMORY_WORKING_SET_METRIC, target),
        }
    }
}

/// Queries issued over the sampling window once both sample points are in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQueries {
    pub cpu_range: String,
    pub cpu_rate: String,
    pub memory_range: String,
    pub memory_min: String,
    pub memory_max: String,
}

impl AggregateQueries {
    pub fn new(target: &ContainerTarget, window_secs: u64) -> Self {
        let cpu_range = range_selector(&container_selector(CPU_USAGE_METRIC, target), window_secs);
        let memory_range = range_selector(
            &container_selector(MEMORY_WORKING_SET_METRIC, target),
            window_secs,
        );

        Self {
            cpu_rate: call("rate", &cpu_range),
            memory_min: call("min_over_time", &memory_range),
            memory_max: call("max_over_time", &memory_range),
            cpu_range,
            memory_range,
        }
    }

    /// Queries with a human label, in the order they are reported
    pub fn labelled(&self) -> [(&'static str, &str); 5] {
        [
            ("Memory Query", self.memory_range.as_str()),
            ("Memory Min Query", self.memory_min.as_str()),
            ("Memory Max Query", self.memory_max.as_str()),
            ("CPU Query", self.cpu_range.as_str()),
            ("CPU Rate Query", self.cpu_rate.as_str()),
        ]
    }
}
