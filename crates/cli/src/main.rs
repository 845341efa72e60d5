//! prom-ras
//!
//! Samples a container's CPU and memory usage from its cgroup files and from
//! a Prometheus-compatible datasource, twice, then prints both side by side
//! together with min/max/mean aggregates over the window.

mod commands;
mod config;
mod output;

use clap::{CommandFactory, Parser};
use commands::sample;
use ras_lib::RunConfig;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compare cgroup and Prometheus resource readings for a Kubernetes container
#[derive(Parser, Debug)]
#[command(name = "prom-ras")]
#[command(author, version, about = "Compare cgroup and Prometheus resource readings for a Kubernetes container", long_about = None)]
pub struct Cli {
    /// Name of the pod
    #[arg(short = 'p', long = "podname")]
    pub pod_name: Option<String>,

    /// Name of pod to search (the first result will be taken as the pod name)
    #[arg(short = 'P', long = "podsearch")]
    pub pod_search: Option<String>,

    /// Name of the container
    #[arg(short, long)]
    pub container: Option<String>,

    /// Time duration in seconds to sleep in between the metric recordings
    #[arg(short = 't', long)]
    pub duration: Option<String>,

    /// URL of the datasource to query
    #[arg(short, long)]
    pub url: Option<String>,

    /// Namespace of the pod [default: default]
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// kubectl binary to use
    #[arg(long = "kubectl-command", default_value = ras_lib::cluster::DEFAULT_KUBECTL)]
    pub kubectl_command: String,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if std::env::args_os().len() < 2 {
        output::print_error(config::REQUIRED_ARGS_MESSAGE);
        print_usage();
        return ExitCode::FAILURE;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version are reported through this path too
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose, cli.log_json);

    let validated = match RunConfig::validate(cli.run_options()) {
        Ok(validated) => validated,
        Err(err) => {
            output::print_error(&err.to_string());
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    for warning in &validated.warnings {
        debug!(%warning, "Ignoring option");
        output::print_warning(&warning.to_string());
    }

    match sample::run(validated.config, &cli.kubectl_command, cli.format).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!("\n{}", Cli::command().render_help());
}
