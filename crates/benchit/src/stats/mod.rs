//! Statistical analysis of benchmark results
//!
//! [`Stats`] owns a raw timing series together with the number of leading
//! warmup samples to ignore. Every derived statistic is computed over the
//! series after warmup removal, lazily on first read, and memoized until the
//! next unit conversion.
//!
//! # Examples
//!
//! ```
//! use benchit::{Described, Stats};
//!
//! // Sample data with one warmup run
//! let times = vec![0.9, 0.1, 0.2, 0.3, 0.4, 0.5];
//! let mut stats = Stats::new(times, Described::snippet("work()"), 1).unwrap();
//!
//! assert_eq!(stats.repetitions(), 5);
//! assert_eq!(stats.minimum(), 0.1);
//! assert_eq!(stats.median(), 0.3);
//!
//! stats.to_milliseconds();
//! assert_eq!(stats.maximum(), 500.0);
//! ```

pub mod outliers;
pub mod percentiles;
pub mod unit;

use chrono::{DateTime, Utc};
use std::cell::OnceCell;
use std::io::Write;
use tracing::warn;

use crate::descriptor::{Described, KeywordArgs};
use crate::error::{BenchError, Result};

// Re-export main types and functions
pub use outliers::{remove_warmup, StdOutliers};
pub use percentiles::percentile;
pub use unit::{Conversion, TimeUnit};

/// Relative standard deviation (in percent) from which `validate` warns.
pub const MAX_RELATIVE_STD_PERCENT: f64 = 10.0;

/// Smallest trustworthy minimum timing, in milliseconds.
pub const MIN_TRUSTED_MILLISECONDS: f64 = 1.0;

/// Coefficient of variation (`std / mean`), `f64::INFINITY` for a zero mean.
pub fn coefficient_of_variation(std: f64, mean: f64) -> f64 {
    if mean == 0.0 {
        f64::INFINITY
    } else {
        std / mean
    }
}

/// Memoized derived statistics.
///
/// Invalidation replaces the whole struct, so a slot added here is
/// invalidated along with the rest.
#[derive(Debug, Clone, Default)]
struct StatsCache {
    sorted: OnceCell<Vec<f64>>,
    minimum: OnceCell<f64>,
    maximum: OnceCell<f64>,
    mean: OnceCell<f64>,
    std: OnceCell<f64>,
    median: OnceCell<f64>,
    std_outliers: OnceCell<usize>,
    total: OnceCell<f64>,
    throughput: OnceCell<f64>,
    throughput_min: OnceCell<f64>,
    percentile_5th: OnceCell<f64>,
    percentile_25th: OnceCell<f64>,
    percentile_75th: OnceCell<f64>,
    percentile_95th: OnceCell<f64>,
}

/// Timing samples of one benchmark run plus their descriptive statistics.
#[derive(Debug, Clone)]
pub struct Stats {
    // samples as recorded, in seconds; every unit is derived from these
    seconds: Vec<f64>,
    raw_times: Vec<f64>,
    warmups: usize,
    unit: TimeUnit,
    function: Described,
    setup: String,
    timestamp: DateTime<Utc>,
    function_args: Option<String>,
    function_kwargs: Option<KeywordArgs>,
    cache: StatsCache,
}

impl Stats {
    /// Create statistics for `times`, given in seconds.
    ///
    /// The first `warmups` samples are kept in [`raw_times`](Self::raw_times)
    /// but excluded from every statistic.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfiguration`] if `warmups >= times.len()`,
    /// since no timing data would remain.
    pub fn new(times: Vec<f64>, function: Described, warmups: usize) -> Result<Self> {
        if warmups >= times.len() {
            return Err(BenchError::InvalidConfiguration(format!(
                "warmups ({}) >= len(times) ({})! No timing data will be available.",
                warmups,
                times.len()
            )));
        }

        Ok(Self {
            seconds: times.clone(),
            raw_times: times,
            warmups,
            unit: TimeUnit::Seconds,
            function,
            setup: "pass".to_string(),
            timestamp: Utc::now(),
            function_args: None,
            function_kwargs: None,
            cache: StatsCache::default(),
        })
    }

    /// Describe the setup performed before each timed call.
    pub fn with_setup(mut self, setup: impl Into<String>) -> Self {
        self.setup = setup.into();
        self
    }

    /// Override the creation timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Record the positional arguments of the benchmarked call.
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.function_args = Some(args.into());
        self
    }

    /// Record the keyword arguments of the benchmarked call.
    pub fn with_kwargs(mut self, kwargs: KeywordArgs) -> Self {
        self.function_kwargs = Some(kwargs);
        self
    }

    /// Benchmarking times, including the warmup runs.
    pub fn raw_times(&self) -> &[f64] {
        &self.raw_times
    }

    /// Benchmarking times without the warmup runs. All statistics use this.
    pub fn times(&self) -> &[f64] {
        remove_warmup(&self.raw_times, self.warmups)
    }

    pub fn warmups(&self) -> usize {
        self.warmups
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn function(&self) -> &Described {
        &self.function
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function.name()
    }

    pub fn file(&self) -> Option<&str> {
        self.function.file()
    }

    pub fn line(&self) -> Option<u32> {
        self.function.line()
    }

    pub fn setup(&self) -> &str {
        &self.setup
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn function_args(&self) -> Option<&str> {
        self.function_args.as_deref()
    }

    pub fn function_kwargs(&self) -> Option<&KeywordArgs> {
        self.function_kwargs.as_ref()
    }

    fn sorted(&self) -> &[f64] {
        self.cache
            .sorted
            .get_or_init(|| percentiles::sorted(self.times()))
    }

    pub fn minimum(&self) -> f64 {
        *self.cache.minimum.get_or_init(|| {
            self.times()
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min)
        })
    }

    pub fn maximum(&self) -> f64 {
        *self.cache.maximum.get_or_init(|| {
            self.times()
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max)
        })
    }

    /// Arithmetic mean.
    pub fn mean(&self) -> f64 {
        *self
            .cache
            .mean
            .get_or_init(|| self.total() / self.repetitions() as f64)
    }

    /// Sample standard deviation, or exactly `0.0` with fewer than two samples.
    pub fn std(&self) -> f64 {
        *self.cache.std.get_or_init(|| {
            let n = self.repetitions();
            if n < 2 {
                return 0.0;
            }
            let mean = self.mean();
            let squared_diffs: f64 = self.times().iter().map(|&t| (t - mean).powi(2)).sum();
            (squared_diffs / (n - 1) as f64).sqrt()
        })
    }

    pub fn median(&self) -> f64 {
        *self.cache.median.get_or_init(|| {
            percentiles::median_of_sorted(self.sorted()).unwrap_or(f64::NAN)
        })
    }

    /// Number of samples strictly outside `[mean - std, mean + std]`.
    pub fn std_outliers(&self) -> usize {
        *self
            .cache
            .std_outliers
            .get_or_init(|| StdOutliers::detect(self.times(), self.mean(), self.std()).count())
    }

    /// Number of samples after warmup removal.
    pub fn repetitions(&self) -> usize {
        self.times().len()
    }

    pub fn total(&self) -> f64 {
        *self.cache.total.get_or_init(|| self.times().iter().sum())
    }

    /// Operations per unit of time: `repetitions / total`, NaN if `total == 0`.
    pub fn throughput(&self) -> f64 {
        *self.cache.throughput.get_or_init(|| {
            let total = self.total();
            if total == 0.0 {
                f64::NAN
            } else {
                self.repetitions() as f64 / total
            }
        })
    }

    /// Operations per unit of time from the fastest run: `1 / minimum`, NaN if
    /// `minimum == 0`.
    pub fn throughput_min(&self) -> f64 {
        *self.cache.throughput_min.get_or_init(|| {
            let minimum = self.minimum();
            if minimum == 0.0 {
                f64::NAN
            } else {
                1.0 / minimum
            }
        })
    }

    /// Coefficient of variation (std / mean).
    ///
    /// Returns `f64::INFINITY` if the mean is zero.
    pub fn coefficient_of_variation(&self) -> f64 {
        coefficient_of_variation(self.std(), self.mean())
    }

    /// The `p`-th percentile, `p` being a fraction in `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidArgument`] for `p` outside `[0.0, 1.0]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use benchit::{Described, Stats};
    ///
    /// let stats = Stats::new(vec![1.0, 2.0, 3.0, 4.0], Described::snippet("f()"), 0).unwrap();
    /// assert_eq!(stats.percentile(0.5).unwrap(), 2.5);
    /// assert!(stats.percentile(-0.1).is_err());
    /// ```
    pub fn percentile(&self, p: f64) -> Result<f64> {
        percentiles::percentile_of_sorted(self.sorted(), p)
    }

    /// Identical to [`minimum`](Self::minimum).
    pub fn percentile_0th(&self) -> f64 {
        self.minimum()
    }

    pub fn percentile_5th(&self) -> f64 {
        *self
            .cache
            .percentile_5th
            .get_or_init(|| percentiles::interpolate(self.sorted(), 0.05))
    }

    pub fn percentile_25th(&self) -> f64 {
        *self
            .cache
            .percentile_25th
            .get_or_init(|| percentiles::interpolate(self.sorted(), 0.25))
    }

    /// Identical to [`median`](Self::median).
    pub fn percentile_50th(&self) -> f64 {
        self.median()
    }

    pub fn percentile_75th(&self) -> f64 {
        *self
            .cache
            .percentile_75th
            .get_or_init(|| percentiles::interpolate(self.sorted(), 0.75))
    }

    pub fn percentile_95th(&self) -> f64 {
        *self
            .cache
            .percentile_95th
            .get_or_init(|| percentiles::interpolate(self.sorted(), 0.95))
    }

    /// Identical to [`maximum`](Self::maximum).
    pub fn percentile_100th(&self) -> f64 {
        self.maximum()
    }

    /// Heuristic stability warnings for this run.
    ///
    /// Warns when the standard deviation is at least 10% of the mean (with two
    /// or more samples), and when the fastest run took less than 1ms.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.repetitions() >= 2 {
            let std = self.std();
            let mean = self.mean();
            // A zero mean has no meaningful relative spread.
            if mean != 0.0 {
                let percent = std * 100.0 / mean;
                if percent >= MAX_RELATIVE_STD_PERCENT {
                    warnings.push(format!(
                        "the standard deviation ({std}) is {percent}% of the mean ({mean})"
                    ));
                }
            }
        }

        let min_in_ms = self.unit.convert(self.minimum(), TimeUnit::Milliseconds);
        if min_in_ms < MIN_TRUSTED_MILLISECONDS {
            warnings.push(format!(
                "the minimum timing ({min_in_ms}ms) was less than 1ms"
            ));
        }

        warnings
    }

    /// Validate the benchmark times, writing any warnings to `sink`.
    ///
    /// This is a diagnostic, not a correctness check. The returned list is
    /// empty if nothing looked suspicious.
    pub fn validate<W: Write + ?Sized>(&self, sink: &mut W) -> Result<Vec<String>> {
        let warnings = self.warnings();

        if !warnings.is_empty() {
            writeln!(sink, "WARNING: the benchmark result may be unstable")?;
            for warning in &warnings {
                warn!(function = %self.function, "{}", warning);
                writeln!(sink, "- {}", warning)?;
            }
        }

        Ok(warnings)
    }

    /// Convert every sample to `target`, invalidating all cached statistics.
    ///
    /// Samples are always rescaled from the recorded seconds, so converting
    /// back to seconds restores them bit for bit and chains of conversions do
    /// not accumulate rounding. No-op if the series is already in `target`.
    pub fn to_unit(&mut self, target: TimeUnit) {
        if self.unit == target {
            return;
        }
        self.invalidate();
        let conversion = TimeUnit::Seconds.conversion_to(target);
        self.raw_times = self.seconds.iter().map(|&t| conversion.apply(t)).collect();
        self.unit = target;
    }

    pub fn to_nanoseconds(&mut self) {
        self.to_unit(TimeUnit::Nanoseconds);
    }

    pub fn to_microseconds(&mut self) {
        self.to_unit(TimeUnit::Microseconds);
    }

    pub fn to_milliseconds(&mut self) {
        self.to_unit(TimeUnit::Milliseconds);
    }

    pub fn to_seconds(&mut self) {
        self.to_unit(TimeUnit::Seconds);
    }

    pub fn to_minutes(&mut self) {
        self.to_unit(TimeUnit::Minutes);
    }

    pub fn to_hours(&mut self) {
        self.to_unit(TimeUnit::Hours);
    }

    pub fn to_days(&mut self) {
        self.to_unit(TimeUnit::Days);
    }

    fn invalidate(&mut self) {
        self.cache = StatsCache::default();
    }
}
