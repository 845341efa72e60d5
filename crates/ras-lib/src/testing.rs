//! In-memory stand-ins for the cluster and the datasource

use crate::cluster::{ClusterCli, ClusterError};
use crate::prometheus::{MetricsSource, QueryError, QueryResponse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Cluster with a fixed pod list and fixed file contents
pub struct MockCluster {
    pods: Vec<String>,
    files: HashMap<String, String>,
    reads: Mutex<Vec<(String, String, String, String)>>,
}

impl MockCluster {
    pub fn new(pods: &[&str]) -> Self {
        Self {
            pods: pods.iter().map(|p| p.to_string()).collect(),
            files: HashMap::new(),
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    /// `(namespace, pod, container, path)` of every read so far
    pub fn reads(&self) -> Vec<(String, String, String, String)> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClusterCli for MockCluster {
    async fn list_pods(&self, _namespace: &str) -> Result<Vec<String>, ClusterError> {
        Ok(self.pods.clone())
    }

    async fn read_file(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        path: &str,
    ) -> Result<String, ClusterError> {
        self.reads.lock().unwrap().push((
            namespace.to_string(),
            pod.to_string(),
            container.to_string(),
            path.to_string(),
        ));

        self.files.get(path).cloned().ok_or_else(|| ClusterError::Spawn {
            command: format!("cat {}", path),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        })
    }
}

/// Datasource answering each known query with a canned body
pub struct StaticMetrics {
    bodies: HashMap<String, String>,
}

impl StaticMetrics {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
        }
    }

    pub fn with_instant(mut self, query: &str, value: &str) -> Self {
        let body = format!(
            r#"{{"status":"success","data":{{"resultType":"vector","result":[{{"metric":{{}},"value":[1700000000,"{}"]}}]}}}}"#,
            value
        );
        self.bodies.insert(query.to_string(), body);
        self
    }

    pub fn with_range(mut self, query: &str, values: &[&str]) -> Self {
        let points: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!(r#"[{},"{}"]"#, 1700000000 + i * 15, v))
            .collect();
        let body = format!(
            r#"{{"status":"success","data":{{"resultType":"matrix","result":[{{"metric":{{}},"values":[{}]}}]}}}}"#,
            points.join(",")
        );
        self.bodies.insert(query.to_string(), body);
        self
    }

    pub fn with_empty(mut self, query: &str) -> Self {
        self.bodies.insert(
            query.to_string(),
            r#"{"status":"success","data":{"resultType":"matrix","result":[]}}"#.to_string(),
        );
        self
    }
}

#[async_trait]
impl MetricsSource for StaticMetrics {
    async fn query(&self, promql: &str) -> Result<QueryResponse, QueryError> {
        let body = self
            .bodies
            .get(promql)
            .ok_or_else(|| QueryError::EmptyResult {
                query: promql.to_string(),
            })?;

        serde_json::from_str(body).map_err(|source| QueryError::Decode {
            query: promql.to_string(),
            source,
        })
    }
}
