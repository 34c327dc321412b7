//! Configuration parsing for benchmark runs
//!
//! This module provides TOML-based configuration for the sampling defaults,
//! the output target, and the master switch that turns the decorator layer
//! into a pass-through.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::reporter::OutputFormat;

/// Environment variable that disables benchmarking when set to `"0"`.
pub const ENABLE_BENCHMARKING_ENV: &str = "ENABLE_BENCHMARKING";

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Sampling defaults and the master switch
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    /// Where and how results are written
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - A value has the wrong type
    ///
    /// # Example
    ///
    /// ```no_run
    /// use benchit::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("bench.toml")?.with_env_overrides();
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use benchit::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [benchmark]
    ///     repetitions = 50
    ///
    ///     [output]
    ///     format = "markdown"
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.benchmark.repetitions, 50);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Defaults with the environment applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides.
    ///
    /// Reads [`ENABLE_BENCHMARKING_ENV`] once; `"0"` disables benchmarking.
    /// Call this at startup and pass the resulting config around.
    pub fn with_env_overrides(self) -> Self {
        let value = std::env::var(ENABLE_BENCHMARKING_ENV).ok();
        self.with_enable_flag(value.as_deref())
    }

    fn with_enable_flag(mut self, value: Option<&str>) -> Self {
        if value.map(str::trim) == Some("0") {
            self.benchmark.enabled = false;
        }
        self
    }
}

/// Sampling defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Master switch; when false every wrapper passes calls through
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Measured repetitions per run (default: 30)
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,
    /// Leading samples to discard (default: 1)
    #[serde(default = "default_warmups")]
    pub warmups: usize,
    /// Minimum measured repetitions for throughput runs (default: 1)
    #[serde(default = "default_min_repetitions")]
    pub min_repetitions: usize,
    /// Minimum cumulative measured time for throughput runs (default: 1000ms)
    #[serde(default = "default_min_duration", rename = "min_duration_ms", with = "duration_ms")]
    pub min_duration: Duration,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            repetitions: default_repetitions(),
            warmups: default_warmups(),
            min_repetitions: default_min_repetitions(),
            min_duration: default_min_duration(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_repetitions() -> usize {
    30
}

fn default_warmups() -> usize {
    1
}

fn default_min_repetitions() -> usize {
    1
}

fn default_min_duration() -> Duration {
    Duration::from_secs(1)
}

/// Output target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (default: csv)
    #[serde(default)]
    pub format: OutputFormat,
    /// File to save results to; reports go to stdout when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Append to an existing file instead of refusing to overwrite it
    #[serde(default = "default_append")]
    pub append: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            file: None,
            append: default_append(),
        }
    }
}

fn default_append() -> bool {
    true
}

/// Serde module for serializing/deserializing Duration as milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
