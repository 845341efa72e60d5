//! Datasource query response model

use super::QueryError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Top-level body of a query response
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<QueryData>,
    #[serde(default, rename = "errorType")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryData {
    #[serde(rename = "resultType")]
    pub result_type: String,
    pub result: Vec<Series>,
}

/// One series. Instant vectors carry `value`, range vectors carry `values`.
#[derive(Debug, Clone, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,
    #[serde(default)]
    pub value: Option<SamplePair>,
    #[serde(default)]
    pub values: Vec<SamplePair>,
}

/// `[unix timestamp, "decimal string"]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SamplePair(pub f64, pub String);

impl SamplePair {
    pub fn parse(&self, query: &str) -> Result<f64, QueryError> {
        self.1.trim().parse().map_err(|_| QueryError::InvalidNumber {
            query: query.to_string(),
            value: self.1.clone(),
        })
    }
}

impl QueryResponse {
    /// Result series of a successful response
    pub fn into_series(self, query: &str) -> Result<Vec<Series>, QueryError> {
        if self.status != "success" {
            return Err(QueryError::Failed {
                query: query.to_string(),
                error_type: self.error_type.unwrap_or_else(|| self.status.clone()),
                error: self.error.unwrap_or_default(),
            });
        }

        self.data
            .map(|data| data.result)
            .ok_or_else(|| QueryError::UnexpectedShape {
                query: query.to_string(),
                detail: "missing `data`".to_string(),
            })
    }

    /// Value of the first series of an instant query
    pub fn instant_value(self, query: &str) -> Result<f64, QueryError> {
        let series = self.first_series(query)?;
        let pair = series.value.ok_or_else(|| QueryError::UnexpectedShape {
            query: query.to_string(),
            detail: "first result has no `value`".to_string(),
        })?;
        pair.parse(query)
    }

    /// Values of the first series of a range query, in timestamp order
    pub fn range_values(self, query: &str) -> Result<Vec<f64>, QueryError> {
        let series = self.first_series(query)?;
        if series.values.is_empty() {
            return Err(QueryError::EmptyResult {
                query: query.to_string(),
            });
        }
        series.values.iter().map(|pair| pair.parse(query)).collect()
    }

    fn first_series(self, query: &str) -> Result<Series, QueryError> {
        self.into_series(query)?
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::EmptyResult {
                query: query.to_string(),
            })
    }
}

/// Convert a sample value to a whole byte count
pub fn to_bytes(value: f64, query: &str) -> Result<u64, QueryError> {
    if !value.is_finite() || value < 0.0 {
        return Err(QueryError::InvalidNumber {
            query: query.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value.round() as u64)
}
