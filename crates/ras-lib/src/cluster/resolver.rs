//! Pod name resolution

use crate::config::PodSelector;
use thiserror::Error;

/// Header of the first column in `kubectl get pods` output
const NAME_HEADER: &str = "NAME";

/// No pod matched the selector. Carries every discovered pod name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid podname '{name}', please try with a correct pod name. Available pods: {}", format_pods(.available))]
    NoPodNamed {
        name: String,
        available: Vec<String>,
    },

    #[error("No pod matches search '{search}'. Available pods: {}", format_pods(.available))]
    NoPodMatching {
        search: String,
        available: Vec<String>,
    },
}

impl ResolveError {
    pub fn available(&self) -> &[String] {
        match self {
            ResolveError::NoPodNamed { available, .. } => available,
            ResolveError::NoPodMatching { available, .. } => available,
        }
    }
}

fn format_pods(pods: &[String]) -> String {
    format!("[{}]", pods.join(", "))
}

/// Extract pod names (first column) from columnar `get pods` output
pub fn parse_pod_names(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|name| *name != NAME_HEADER)
        .map(str::to_string)
        .collect()
}

/// Pick the target pod: exact match for a name, first substring match for a
/// search
pub fn resolve_pod(pods: &[String], selector: &PodSelector) -> Result<String, ResolveError> {
    let found = match selector {
        PodSelector::Name(name) => pods.iter().find(|pod| *pod == name),
        PodSelector::Search(search) => pods.iter().find(|pod| pod.contains(search.as_str())),
    };

    match (found, selector) {
        (Some(pod), _) => Ok(pod.clone()),
        (None, PodSelector::Name(name)) => Err(ResolveError::NoPodNamed {
            name: name.clone(),
            available: pods.to_vec(),
        }),
        (None, PodSelector::Search(search)) => Err(ResolveError::NoPodMatching {
            search: search.clone(),
            available: pods.to_vec(),
        }),
    }
}
