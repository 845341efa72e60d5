//! Prometheus-compatible datasource access
//!
//! Every query, instant or range vector, is a `GET <url>?query=<promql>`
//! against the configured endpoint.

mod query;
mod response;

pub use query::{
    call, container_selector, range_selector, AggregateQueries, SampleQueries, CPU_USAGE_METRIC,
    MEMORY_WORKING_SET_METRIC,
};
pub use response::{to_bytes, QueryData, QueryResponse, SamplePair, Series};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("request for query `{query}` failed: {source}")]
    Http {
        query: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("datasource returned HTTP {status} for query `{query}`: {body}")]
    Status {
        query: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse datasource response for query `{query}`: {source}")]
    Decode {
        query: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("query `{query}` failed ({error_type}): {error}")]
    Failed {
        query: String,
        error_type: String,
        error: String,
    },

    #[error("query `{query}` returned an empty result")]
    EmptyResult { query: String },

    #[error("query `{query}` returned an unexpected response shape: {detail}")]
    UnexpectedShape { query: String, detail: String },

    #[error("query `{query}` returned a non-numeric sample value {value:?}")]
    InvalidNumber { query: String, value: String },
}

/// Trait for datasource implementations
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Run a PromQL expression and return the decoded response
    async fn query(&self, promql: &str) -> Result<QueryResponse, QueryError>;

    /// Value of the first series of an instant query
    async fn instant_value(&self, promql: &str) -> Result<f64, QueryError> {
        self.query(promql).await?.instant_value(promql)
    }

    /// Values of the first series of a range query
    async fn range_values(&self, promql: &str) -> Result<Vec<f64>, QueryError> {
        self.query(promql).await?.range_values(promql)
    }
}

/// HTTP client for the query endpoint
pub struct PrometheusClient {
    client: Client,
    url: Url,
}

impl PrometheusClient {
    /// Create a client for the query endpoint at `url`.
    ///
    /// No request timeout is set: a stalled datasource stalls the run.
    pub fn new(url: Url) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl MetricsSource for PrometheusClient {
    async fn query(&self, promql: &str) -> Result<QueryResponse, QueryError> {
        debug!(url = %self.url, query = promql, "Querying datasource");

        let response = self
            .client
            .get(self.url.clone())
            .query(&[("query", promql)])
            .send()
            .await
            .map_err(|source| QueryError::Http {
                query: promql.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                query: promql.to_string(),
                status,
                body,
            });
        }

        let body = response.text().await.map_err(|source| QueryError::Http {
            query: promql.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| QueryError::Decode {
            query: promql.to_string(),
            source,
        })
    }
}
