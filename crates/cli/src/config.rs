//! Command-line configuration

use crate::Cli;
use ras_lib::RunOptions;

/// Printed when the program is started without any argument
pub const REQUIRED_ARGS_MESSAGE: &str =
    "Following args are required : POD NAME (or) POD SEARCH, CONTAINER NAME, DURATION (in secs), DATASOURCE URL";

impl Cli {
    /// Raw option values for validation
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            pod_name: self.pod_name.clone(),
            pod_search: self.pod_search.clone(),
            container: self.container.clone(),
            duration: self.duration.clone(),
            url: self.url.clone(),
            namespace: self.namespace.clone(),
        }
    }
}
