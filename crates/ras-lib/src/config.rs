//! Run configuration and validation
//!
//! Raw option values arrive as [`RunOptions`] and are turned into an
//! immutable [`RunConfig`] before anything touches the cluster or the
//! datasource.

use std::fmt;
use thiserror::Error;
use url::Url;

/// Namespace used when none is given
pub const DEFAULT_NAMESPACE: &str = "default";

/// Option values as supplied on the command line, before validation
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub pod_name: Option<String>,
    pub pod_search: Option<String>,
    pub container: Option<String>,
    pub duration: Option<String>,
    pub url: Option<String>,
    pub namespace: Option<String>,
}

/// How the target pod is picked from the namespace listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodSelector {
    /// Exact pod name
    Name(String),
    /// First pod whose name contains this string
    Search(String),
}

impl fmt::Display for PodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PodSelector::Name(name) => write!(f, "pod name '{}'", name),
            PodSelector::Search(search) => write!(f, "pod search '{}'", search),
        }
    }
}

/// Validated, immutable configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub pod: PodSelector,
    pub container: String,
    pub duration_secs: u64,
    pub datasource_url: Url,
    pub namespace: String,
}

/// Validation errors. Each one is reported together with the usage text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Either a pod name (--podname) or a pod search string (--podsearch) is required")]
    MissingPodSelector,

    #[error("Invalid podname")]
    EmptyPodName,

    #[error("Invalid pod search string")]
    EmptyPodSearch,

    #[error("Invalid container name")]
    MissingContainer,

    #[error("Time duration is required (--duration)")]
    MissingDuration,

    #[error("Invalid value for time duration '{0}'. Please enter a numeric value for duration")]
    InvalidDuration(String),

    #[error("Time duration must be greater than zero")]
    ZeroDuration,

    #[error("Datasource url is required (--url)")]
    MissingUrl,

    #[error("Invalid datasource url '{0}'. Please enter a valid url")]
    InvalidUrl(String),

    #[error("Invalid namespace")]
    EmptyNamespace,
}

/// Non-fatal findings from validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    PodSearchIgnored { pod_name: String, pod_search: String },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::PodSearchIgnored {
                pod_name,
                pod_search,
            } => write!(
                f,
                "Both POD NAME ('{}') and POD SEARCH ('{}') are given, using POD NAME and ignoring POD SEARCH",
                pod_name, pod_search
            ),
        }
    }
}

/// A validated configuration plus any warnings raised on the way
#[derive(Debug, Clone)]
pub struct Validated {
    pub config: RunConfig,
    pub warnings: Vec<ConfigWarning>,
}

impl RunConfig {
    /// Validate raw options. Values are trimmed first, so a value made of
    /// whitespace counts as empty.
    pub fn validate(options: RunOptions) -> Result<Validated, ConfigError> {
        let pod_name = trimmed(options.pod_name);
        let pod_search = trimmed(options.pod_search);

        let duration_secs = parse_duration(trimmed(options.duration))?;
        let datasource_url = parse_url(trimmed(options.url))?;

        let mut warnings = Vec::new();
        if let (Some(name), Some(search)) = (&pod_name, &pod_search) {
            warnings.push(ConfigWarning::PodSearchIgnored {
                pod_name: name.clone(),
                pod_search: search.clone(),
            });
        }

        if matches!(&pod_name, Some(name) if name.is_empty()) {
            return Err(ConfigError::EmptyPodName);
        }
        if matches!(&pod_search, Some(search) if search.is_empty()) {
            return Err(ConfigError::EmptyPodSearch);
        }

        let pod = match (pod_name, pod_search) {
            (Some(name), _) => PodSelector::Name(name),
            (None, Some(search)) => PodSelector::Search(search),
            (None, None) => return Err(ConfigError::MissingPodSelector),
        };

        let container = trimmed(options.container)
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingContainer)?;

        let namespace = match trimmed(options.namespace) {
            Some(ns) if ns.is_empty() => return Err(ConfigError::EmptyNamespace),
            Some(ns) => ns,
            None => DEFAULT_NAMESPACE.to_string(),
        };

        Ok(Validated {
            config: RunConfig {
                pod,
                container,
                duration_secs,
                datasource_url,
                namespace,
            },
            warnings,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn parse_duration(raw: Option<String>) -> Result<u64, ConfigError> {
    let raw = raw.ok_or(ConfigError::MissingDuration)?;

    // Digits only: rejects signs, decimals and the empty string
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidDuration(raw));
    }

    let secs: u64 = raw
        .parse()
        .map_err(|_| ConfigError::InvalidDuration(raw.clone()))?;

    if secs == 0 {
        return Err(ConfigError::ZeroDuration);
    }
    Ok(secs)
}

fn parse_url(raw: Option<String>) -> Result<Url, ConfigError> {
    let raw = raw.ok_or(ConfigError::MissingUrl)?;

    let url = Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl(raw.clone()))?;
    let web_scheme = matches!(url.scheme(), "http" | "https");
    let has_host = url.host_str().is_some_and(|h| !h.is_empty());

    if !web_scheme || !has_host {
        return Err(ConfigError::InvalidUrl(raw));
    }
    Ok(url)
}
