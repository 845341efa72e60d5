//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use ras_lib::prometheus::AggregateQueries;
use ras_lib::{AggregateRow, Sample};
use serde::Serialize;
use std::io::Write;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Progress messages and tables (default)
    #[default]
    Table,
    /// One JSON document at the end of the run
    Json,
}

/// Row for the raw readings table
#[derive(Tabled)]
struct SampleRow {
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Datasource")]
    datasource: String,
    #[tabled(rename = "CPU readings")]
    cpu: String,
    #[tabled(rename = "Memory Readings")]
    memory: String,
}

/// Row for the aggregates table
#[derive(Tabled)]
struct AggregateTableRow {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Mean")]
    mean: String,
}

/// Render the raw readings, one row per source per sample point
pub fn render_samples(samples: &[Sample]) -> String {
    let rows: Vec<SampleRow> = samples
        .iter()
        .map(|s| SampleRow {
            timestamp: s.timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            datasource: s.source.to_string(),
            cpu: s.cpu_seconds.to_string(),
            memory: s.memory_bytes.to_string(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render the aggregate comparison; values a row does not carry show as `-`
pub fn render_aggregates(rows: &[AggregateRow]) -> String {
    let rows: Vec<AggregateTableRow> = rows
        .iter()
        .map(|r| AggregateTableRow {
            kind: r.kind.to_string(),
            metric: r.metric.to_string(),
            min: format_optional(r.min),
            max: format_optional(r.max),
            mean: format_optional(r.mean),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Everything a run produced, for `--format json`
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub namespace: &'a str,
    pub pod: &'a str,
    pub container: &'a str,
    pub duration_seconds: u64,
    pub samples: &'a [Sample],
    pub aggregates: &'a [AggregateRow],
}

/// Writes run progress and results to stdout in the selected format.
///
/// In JSON mode stdout carries only the final document.
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn is_table(&self) -> bool {
        matches!(self.format, OutputFormat::Table)
    }

    pub fn info(&self, message: &str) {
        if self.is_table() {
            print_info(message);
        }
    }

    pub fn line(&self, message: &str) {
        if self.is_table() {
            println!("{}", message);
        }
    }

    /// Start a step; completed by [`Reporter::done`]
    pub fn step(&self, message: &str) {
        if self.is_table() {
            print!("{} ", message);
            if let Err(err) = std::io::stdout().flush() {
                debug!(error = %err, "Failed to flush progress line");
            }
        }
    }

    pub fn done(&self) {
        if self.is_table() {
            println!("{}", "Done.".green());
        }
    }

    pub fn samples(&self, samples: &[Sample]) {
        if self.is_table() {
            println!("{}", "CPU & Memory Recordings table :".bold());
            println!("{}", render_samples(samples));
        }
    }

    pub fn queries(&self, queries: &AggregateQueries) {
        if self.is_table() {
            println!(
                "{}",
                "Calculating the min, max and mean from prometheus queries:".bold()
            );
            for (label, query) in queries.labelled() {
                println!("{} - {}", label, query);
            }
        }
    }

    pub fn aggregates(&self, rows: &[AggregateRow]) {
        if self.is_table() {
            println!("{}", render_aggregates(rows));
        }
    }

    pub fn finish(&self, report: &RunReport<'_>) -> Result<()> {
        match self.format {
            OutputFormat::Table => print_success("Sampling complete"),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        }
        Ok(())
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use ras_lib::{AggregateKind, Metric, SampleSource};

    fn rows() -> Vec<AggregateRow> {
        vec![
            AggregateRow {
                kind: AggregateKind::Calculated,
                metric: Metric::Cpu,
                min: Some(1.0),
                max: Some(2.0),
                mean: Some(1.5),
            },
            AggregateRow {
                kind: AggregateKind::Query,
                metric: Metric::Cpu,
                min: None,
                max: None,
                mean: Some(1.4),
            },
            AggregateRow {
                kind: AggregateKind::Calculated,
                metric: Metric::Memory,
                min: Some(100.0),
                max: Some(300.0),
                mean: Some(200.0),
            },
            AggregateRow {
                kind: AggregateKind::Query,
                metric: Metric::Memory,
                min: Some(100.0),
                max: Some(300.0),
                mean: None,
            },
        ]
    }

    /// Non-empty cells of every table line containing `needle`
    fn cells_of(table: &str, needle: &str) -> Vec<Vec<String>> {
        table
            .lines()
            .filter(|line| line.contains(needle))
            .map(|line| {
                line.split('│')
                    .map(str::trim)
                    .filter(|cell| !cell.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_render_aggregates_is_deterministic() {
        let first = render_aggregates(&rows());
        let second = render_aggregates(&rows());
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_aggregates_cells() {
        let table = render_aggregates(&rows());

        assert_eq!(
            cells_of(&table, "Type"),
            vec![vec!["Type", "Metric", "Min", "Max", "Mean"]]
        );
        assert_eq!(
            cells_of(&table, "Calculated"),
            vec![
                vec!["Calculated", "CPU", "1", "2", "1.5"],
                vec!["Calculated", "Memory", "100", "300", "200"],
            ]
        );
        assert_eq!(
            cells_of(&table, "Query"),
            vec![
                vec!["Query", "CPU", "-", "-", "1.4"],
                vec!["Query", "Memory", "100", "300", "-"],
            ]
        );
    }

    #[test]
    fn test_render_samples() {
        let timestamp = Local.with_ymd_and_hms(2026, 3, 1, 12, 0, 5).unwrap();
        let samples = vec![
            Sample {
                timestamp,
                source: SampleSource::Cgroup,
                cpu_seconds: 12.5,
                memory_bytes: 123456,
            },
            Sample {
                timestamp,
                source: SampleSource::Prometheus,
                cpu_seconds: 12.75,
                memory_bytes: 120000,
            },
        ];

        let table = render_samples(&samples);
        assert_eq!(
            cells_of(&table, "Timestamp"),
            vec![vec!["Timestamp", "Datasource", "CPU readings", "Memory Readings"]]
        );
        assert_eq!(
            cells_of(&table, "2026-03-01"),
            vec![
                vec!["2026-03-01 12:00:05.000000", "Cgroup", "12.5", "123456"],
                vec!["2026-03-01 12:00:05.000000", "Prometheus", "12.75", "120000"],
            ]
        );
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(None), "-");
        assert_eq!(format_optional(Some(0.25)), "0.25");
        assert_eq!(format_optional(Some(104857600.0)), "104857600");
    }

    #[test]
    fn test_run_report_json() {
        let rows = rows();
        let report = RunReport {
            namespace: "default",
            pod: "api-7f",
            container: "api",
            duration_seconds: 30,
            samples: &[],
            aggregates: &rows,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["pod"], "api-7f");
        assert_eq!(value["aggregates"][1]["kind"], "Query");
        assert_eq!(value["aggregates"][1]["metric"], "CPU");
        assert!(value["aggregates"][1]["min"].is_null());
        assert_eq!(value["aggregates"][0]["mean"], 1.5);
    }
}
