//! Micro-benchmarking with cached descriptive statistics
//!
//! This crate times a piece of code repeatedly and summarizes the resulting
//! series: minimum, maximum, mean, standard deviation, median, interpolated
//! percentiles, throughput and a one-sigma outlier count.
//!
//! # Features
//!
//! - **Statistics**: Every statistic is computed lazily and memoized
//! - **Warmups**: Leading samples are kept but excluded from every statistic
//! - **Units**: In-place conversion between nanoseconds and days
//! - **Sampling**: Fixed repetitions, single shot, or throughput with a time floor
//! - **Output Formats**: CSV, Markdown, JSON and a console summary
//! - **Wrappers**: Benchmark a function on call, with a global off switch
//!
//! # Example
//!
//! ```no_run
//! use benchit::runner::{benchit, Target};
//! use benchit::reporter::{Reporter, OutputFormat};
//!
//! # fn example() -> benchit::Result<()> {
//! let values: Vec<u32> = (0..10_000).rev().collect();
//! let target = Target::function("sort", || {
//!     let mut v = values.clone();
//!     v.sort_unstable();
//!     v
//! });
//!
//! let mut stats = benchit(target, 30, 1)?;
//! stats.to_microseconds();
//! stats.validate(&mut std::io::stderr())?;
//!
//! Reporter::new(OutputFormat::Console).report(&stats)?;
//! Reporter::new(OutputFormat::Csv).save(&stats, "sort.csv", true)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Defaults for the wrappers and the output target can be read from TOML:
//!
//! ```toml
//! [benchmark]
//! enabled = true
//! repetitions = 30
//! warmups = 1
//! min_repetitions = 1
//! min_duration_ms = 1000
//!
//! [output]
//! format = "markdown"
//! file = "bench.md"
//! append = true
//! ```
//!
//! Setting `ENABLE_BENCHMARKING=0` in the environment turns every wrapper
//! into a plain call (see [`Config::with_env_overrides`]).

pub mod config;
pub mod decorators;
pub mod descriptor;
pub mod error;
pub mod reporter;
pub mod runner;
pub mod stats;
pub mod system;

// Re-export main types for convenience
pub use config::Config;
pub use decorators::{Benchmarked, Decorator, Outcome};
pub use descriptor::{Described, KeywordArgs};
pub use error::{BenchError, Result};
pub use reporter::{stats_as, FormattedStats, OutputFormat, Reporter};
pub use runner::{benchit, single_shot, throughput, BenchmarkRunner, Target};
pub use stats::{Stats, TimeUnit};
pub use system::SystemInfo;
