//! The sampling run
//!
//! validate → resolve pod → sample(t0) → sleep → sample(t1) → aggregate

use anyhow::Result;
use ras_lib::cluster::Kubectl;
use ras_lib::prometheus::PrometheusClient;
use ras_lib::{RunConfig, SamplingSession};
use tracing::info;

use crate::output::{OutputFormat, Reporter, RunReport};

const SAMPLE_POINTS: [&str; 2] = ["First", "Second"];

/// Take both sample points and report them with the aggregates
pub async fn run(config: RunConfig, kubectl: &str, format: OutputFormat) -> Result<()> {
    let kubectl = Kubectl::locate(kubectl)?;
    let metrics = PrometheusClient::new(config.datasource_url.clone())?;
    let reporter = Reporter::new(format);

    let session = SamplingSession::start(&config, Box::new(kubectl), Box::new(metrics)).await?;
    let target = session.target().clone();
    reporter.info(&format!(
        "Sampling container '{}' of pod '{}' in namespace '{}'",
        target.container, target.pod, target.namespace
    ));

    let mut samples = Vec::with_capacity(SAMPLE_POINTS.len() * 2);
    for (index, point) in SAMPLE_POINTS.iter().enumerate() {
        if index > 0 {
            reporter.line(&format!(
                "Sleeping for {} Seconds!",
                session.duration_secs()
            ));
            session.wait_interval().await;
        }

        reporter.step(&format!("{} Reading - Recording Cgroup readings ...", point));
        samples.push(session.sample_cgroup().await?);
        reporter.done();

        reporter.step(&format!(
            "{} Reading - Recording Prometheus readings ...",
            point
        ));
        samples.push(session.sample_datasource().await?);
        reporter.done();
    }
    info!(samples = samples.len(), "Sampling complete");

    reporter.samples(&samples);

    let queries = session.aggregate_queries();
    reporter.queries(&queries);
    let aggregates = session.aggregate().await?;
    reporter.aggregates(&aggregates);

    reporter.finish(&RunReport {
        namespace: &target.namespace,
        pod: &target.pod,
        container: &target.container,
        duration_seconds: session.duration_secs(),
        samples: &samples,
        aggregates: &aggregates,
    })
}
