//! Benchmark result reporting
//!
//! This module turns a [`Stats`] into a flat record and renders it in one of
//! several formats, either as a string or appended to a file.
//!
//! # Output Formats
//!
//! - **CSV**: One header row and one row per run
//! - **Markdown**: A pipe table, rows appended below the separator
//! - **JSON**: `{"runs": [{"metadata": {...}, "data": {...}}]}`
//! - **Console**: Human-readable summary for a terminal
//!
//! # Example
//!
//! ```no_run
//! use benchit::reporter::{stats_as, OutputFormat};
//! use benchit::{Described, Stats};
//!
//! # fn example() -> benchit::Result<()> {
//! let stats = Stats::new(vec![0.1, 0.2, 0.3], Described::snippet("work()"), 0)?;
//!
//! let formatted = stats_as(&stats, "markdown".parse()?);
//! println!("{}", formatted.resource(false)?);
//!
//! // Append to a file, writing the header only if it does not exist yet
//! stats_as(&stats, OutputFormat::Csv).save("results.csv", true)?;
//! # Ok(())
//! # }
//! ```

mod console;
mod csv;
mod json;
mod markdown;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::config::OutputConfig;
use crate::descriptor::KeywordArgs;
use crate::error::{BenchError, Result};
use crate::stats::{Stats, TimeUnit};

/// Metadata column names, in output order.
pub const METADATA_COLUMNS: [&str; 10] = [
    "Timestamp",
    "Warmups",
    "Name",
    "Function",
    "Setup",
    "File",
    "Line",
    "Args",
    "Kwargs",
    "Unit",
];

/// Statistic column names, in output order.
pub const DATA_COLUMNS: [&str; 14] = [
    "Repetitions",
    "Total Time",
    "Mean",
    "Std",
    "Std Outliers",
    "Throughput",
    "Throughput (Min)",
    "Min",
    "5th Percentile",
    "25th Percentile",
    "Median",
    "75th Percentile",
    "95th Percentile",
    "Max",
];

/// Output format for benchmark results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum OutputFormat {
    /// Comma separated values
    #[default]
    Csv,
    /// Markdown table for documentation
    Markdown,
    /// JSON document with a list of runs
    Json,
    /// Human-readable console summary
    Console,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
            OutputFormat::Console => "console",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = BenchError;

    /// Parse a format name in upper or lower case.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "console" => Ok(OutputFormat::Console),
            _ => Err(BenchError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = BenchError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OutputFormat> for &'static str {
    fn from(format: OutputFormat) -> Self {
        format.as_str()
    }
}

/// Descriptive columns of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetadata {
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "Warmups")]
    pub warmups: usize,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Function")]
    pub function: String,
    #[serde(rename = "Setup")]
    pub setup: String,
    #[serde(rename = "File")]
    pub file: Option<String>,
    #[serde(rename = "Line")]
    pub line: Option<u32>,
    #[serde(rename = "Args")]
    pub args: Option<String>,
    #[serde(rename = "Kwargs")]
    pub kwargs: Option<KeywordArgs>,
    #[serde(rename = "Unit")]
    pub unit: TimeUnit,
}

/// Statistic columns of one run, in the run's unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunData {
    #[serde(rename = "Repetitions")]
    pub repetitions: usize,
    #[serde(rename = "Total Time")]
    pub total: f64,
    #[serde(rename = "Mean")]
    pub mean: f64,
    #[serde(rename = "Std")]
    pub std: f64,
    #[serde(rename = "Std Outliers")]
    pub std_outliers: usize,
    #[serde(rename = "Throughput")]
    pub throughput: f64,
    #[serde(rename = "Throughput (Min)")]
    pub throughput_min: f64,
    #[serde(rename = "Min")]
    pub minimum: f64,
    #[serde(rename = "5th Percentile")]
    pub percentile_5th: f64,
    #[serde(rename = "25th Percentile")]
    pub percentile_25th: f64,
    #[serde(rename = "Median")]
    pub median: f64,
    #[serde(rename = "75th Percentile")]
    pub percentile_75th: f64,
    #[serde(rename = "95th Percentile")]
    pub percentile_95th: f64,
    #[serde(rename = "Max")]
    pub maximum: f64,
}

/// Owned snapshot of one benchmark run, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRecord {
    pub metadata: RunMetadata,
    pub data: RunData,
}

impl StatsRecord {
    pub fn from_stats(stats: &Stats) -> Self {
        let metadata = RunMetadata {
            timestamp: stats.timestamp(),
            warmups: stats.warmups(),
            name: stats.function_name().map(str::to_string),
            function: stats.function().to_string(),
            setup: stats.setup().to_string(),
            file: stats.file().map(str::to_string),
            line: stats.line(),
            args: stats.function_args().map(str::to_string),
            kwargs: stats.function_kwargs().cloned(),
            unit: stats.unit(),
        };

        let data = RunData {
            repetitions: stats.repetitions(),
            total: stats.total(),
            mean: stats.mean(),
            std: stats.std(),
            std_outliers: stats.std_outliers(),
            throughput: stats.throughput(),
            throughput_min: stats.throughput_min(),
            minimum: stats.minimum(),
            percentile_5th: stats.percentile_5th(),
            percentile_25th: stats.percentile_25th(),
            median: stats.median(),
            percentile_75th: stats.percentile_75th(),
            percentile_95th: stats.percentile_95th(),
            maximum: stats.maximum(),
        };

        Self { metadata, data }
    }

    /// Column names, metadata first.
    pub fn header() -> impl Iterator<Item = &'static str> {
        METADATA_COLUMNS.into_iter().chain(DATA_COLUMNS)
    }

    /// Cell texts in [`header`](Self::header) order. Absent values are empty.
    pub fn cells(&self) -> Vec<String> {
        let m = &self.metadata;
        let d = &self.data;
        let optional = |value: Option<String>| value.unwrap_or_default();

        vec![
            m.timestamp.to_rfc3339(),
            m.warmups.to_string(),
            optional(m.name.clone()),
            m.function.clone(),
            m.setup.clone(),
            optional(m.file.clone()),
            optional(m.line.map(|line| line.to_string())),
            optional(m.args.clone()),
            optional(m.kwargs.as_ref().map(kwargs_text)),
            m.unit.to_string(),
            d.repetitions.to_string(),
            d.total.to_string(),
            d.mean.to_string(),
            d.std.to_string(),
            d.std_outliers.to_string(),
            d.throughput.to_string(),
            d.throughput_min.to_string(),
            d.minimum.to_string(),
            d.percentile_5th.to_string(),
            d.percentile_25th.to_string(),
            d.median.to_string(),
            d.percentile_75th.to_string(),
            d.percentile_95th.to_string(),
            d.maximum.to_string(),
        ]
    }
}

fn kwargs_text(kwargs: &KeywordArgs) -> String {
    kwargs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A run rendered in one output format.
#[derive(Debug, Clone)]
pub struct FormattedStats {
    format: OutputFormat,
    record: StatsRecord,
}

impl FormattedStats {
    pub fn new(record: StatsRecord, format: OutputFormat) -> Self {
        Self { format, record }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn record(&self) -> &StatsRecord {
        &self.record
    }

    /// Render the run.
    ///
    /// With `append` set the header is left out: CSV and Markdown produce a
    /// single row and JSON produces the bare run object instead of the
    /// `{"runs": [...]}` document. Console output ignores `append`.
    pub fn resource(&self, append: bool) -> Result<String> {
        match self.format {
            OutputFormat::Csv => Ok(csv::render(&self.record, append)),
            OutputFormat::Markdown => Ok(markdown::render(&self.record, append)),
            OutputFormat::Json => json::render(&self.record, append),
            OutputFormat::Console => console::render(&self.record),
        }
    }

    /// Save the run to `path`.
    ///
    /// With `append` set the run is added to an existing file, or a new file
    /// with a header is created. Without it the file must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::FileAlreadyExists`] if `append` is false and
    /// `path` exists, or an I/O or serialization error.
    pub fn save<P: AsRef<Path>>(&self, path: P, append: bool) -> Result<()> {
        let path = path.as_ref();
        let exists = path.exists();
        if !append && exists {
            return Err(BenchError::FileAlreadyExists(path.to_path_buf()));
        }
        let append = append && exists;
        debug!(path = %path.display(), format = %self.format, append, "Saving benchmark results");

        match self.format {
            OutputFormat::Json => json::save(&self.record, path, append),
            _ => {
                let text = self.resource(append)?;
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                file.write_all(text.as_bytes())?;
                Ok(())
            }
        }
    }
}

/// Snapshot `stats` and wrap it for rendering in `format`.
pub fn stats_as(stats: &Stats, format: OutputFormat) -> FormattedStats {
    FormattedStats::new(StatsRecord::from_stats(stats), format)
}

/// Reporter for benchmark results
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Report results to stdout, with a header
    pub fn report(&self, stats: &Stats) -> Result<()> {
        let output = self.render(stats)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    /// Save results to a file, see [`FormattedStats::save`]
    pub fn save<P: AsRef<Path>>(&self, stats: &Stats, path: P, append: bool) -> Result<()> {
        stats_as(stats, self.format).save(path, append)
    }

    /// Format results as a string, with a header
    pub fn render(&self, stats: &Stats) -> Result<String> {
        stats_as(stats, self.format).resource(false)
    }

    /// Write results where `output` says: its file if one is set, stdout otherwise.
    pub fn emit(stats: &Stats, output: &OutputConfig) -> Result<()> {
        let reporter = Reporter::new(output.format);
        match &output.file {
            Some(path) => reporter.save(stats, path, output.append),
            None => reporter.report(stats),
        }
    }
}
