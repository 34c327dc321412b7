//! Function wrappers that benchmark on call
//!
//! [`Benchmarked`] wraps a function so that calling it runs a benchmark and
//! yields [`Stats`] instead of the function's value. Post-processing stages
//! ([`StatsAs`], [`Save`], [`Validate`]) implement [`Decorator`] and are
//! applied to the resulting [`Outcome`] one after another.
//!
//! Every wrapper and stage can be switched off, in which case it passes its
//! input through untouched: a disabled [`Benchmarked`] simply calls the
//! function once and returns [`Outcome::Value`].
//!
//! # Example
//!
//! ```no_run
//! use benchit::decorators::{Benchmarked, Save, StatsAs, Validate};
//! use benchit::{Config, OutputFormat};
//!
//! # fn example() -> benchit::Result<()> {
//! let config = Config::from_env();
//! let square = Benchmarked::new("square", |x: u64| x * x)
//!     .repeat(100)
//!     .configure(&config);
//!
//! let outcome = square
//!     .call(12)?
//!     .then(&mut Validate::new(std::io::stderr()))?
//!     .then(&mut StatsAs::new(OutputFormat::Csv))?
//!     .then(&mut Save::new("square.csv"))?;
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use crate::config::{Config, OutputConfig};
use crate::descriptor::{Described, KeywordArgs};
use crate::error::{BenchError, Result};
use crate::reporter::{stats_as, FormattedStats, OutputFormat};
use crate::runner::{BenchmarkRunner, Mode, Target};
use crate::stats::Stats;

/// What a wrapped call produced.
#[derive(Debug)]
pub enum Outcome<R> {
    /// Benchmark results
    Stats(Stats),
    /// Benchmark results rendered in an output format
    Formatted(FormattedStats),
    /// The function's own return value, when benchmarking is disabled
    Value(R),
}

impl<R> Outcome<R> {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Stats(_) => "stats",
            Outcome::Formatted(_) => "formatted stats",
            Outcome::Value(_) => "plain value",
        }
    }

    pub fn as_stats(&self) -> Option<&Stats> {
        match self {
            Outcome::Stats(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn as_formatted(&self) -> Option<&FormattedStats> {
        match self {
            Outcome::Formatted(formatted) => Some(formatted),
            _ => None,
        }
    }

    pub fn into_stats(self) -> Option<Stats> {
        match self {
            Outcome::Stats(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<R> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Apply `stage` to this outcome.
    pub fn then<D: Decorator>(self, stage: &mut D) -> Result<Outcome<R>> {
        stage.apply(self)
    }
}

/// A post-processing stage applied to an [`Outcome`].
pub trait Decorator {
    /// Stage name used in error messages
    fn name(&self) -> &'static str;

    fn is_enabled(&self) -> bool;

    /// Process an outcome. Only called when the stage is enabled.
    fn decorate<R>(&mut self, outcome: Outcome<R>) -> Result<Outcome<R>>;

    /// Process an outcome, or pass it through if the stage is disabled.
    fn apply<R>(&mut self, outcome: Outcome<R>) -> Result<Outcome<R>> {
        if self.is_enabled() {
            self.decorate(outcome)
        } else {
            Ok(outcome)
        }
    }
}

fn mismatch<R>(stage: &str, expected: &str, outcome: &Outcome<R>) -> BenchError {
    BenchError::TypeMismatch(format!(
        "{stage} can only be applied to {expected}, got {}",
        outcome.kind()
    ))
}

/// A function that is benchmarked whenever it is called.
pub struct Benchmarked<F> {
    function: F,
    described: Described,
    runner: BenchmarkRunner,
    // false until a sampling mode is chosen explicitly
    mode_chosen: bool,
    setup: Option<(String, Box<dyn Fn()>)>,
    enabled: bool,
}

impl<F> Benchmarked<F> {
    /// Wrap `function`, recorded under `name` at the caller's location.
    ///
    /// Starts out repeating 30 times after one warmup, or with the configured
    /// counts once [`configure`](Self::configure)d.
    #[track_caller]
    pub fn new(name: impl Into<String>, function: F) -> Self {
        Self {
            function,
            described: Described::function(name),
            runner: BenchmarkRunner::repeat(30),
            mode_chosen: false,
            setup: None,
            enabled: true,
        }
    }

    /// Benchmark `repetitions` measured calls.
    pub fn repeat(mut self, repetitions: usize) -> Self {
        self.runner = BenchmarkRunner::repeat(repetitions).with_warmups(self.runner.warmups());
        self.mode_chosen = true;
        self
    }

    /// Benchmark a single measured call after the usual warmups.
    pub fn single_shot(mut self) -> Self {
        self.runner = BenchmarkRunner::single_shot().with_warmups(self.runner.warmups());
        self.mode_chosen = true;
        self
    }

    /// Benchmark until at least `min_repetitions` calls and one second of
    /// measured time.
    pub fn throughput(mut self, min_repetitions: usize) -> Self {
        self.runner =
            BenchmarkRunner::throughput(min_repetitions).with_warmups(self.runner.warmups());
        self.mode_chosen = true;
        self
    }

    pub fn warmups(mut self, warmups: usize) -> Self {
        self.runner = self.runner.with_warmups(warmups);
        self
    }

    /// Run `setup` untimed before every timed call.
    pub fn setup(mut self, description: impl Into<String>, setup: impl Fn() + 'static) -> Self {
        self.setup = Some((description.into(), Box::new(setup)));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Apply the configured warmups, throughput floors and master switch.
    ///
    /// The configured repetition count is used unless a sampling mode was
    /// chosen before. A disabled configuration disables the wrapper; an
    /// enabled one never re-enables a wrapper switched off with
    /// [`enabled`](Self::enabled).
    pub fn configure(mut self, config: &Config) -> Self {
        let benchmark = &config.benchmark;
        if !self.mode_chosen {
            self.runner = BenchmarkRunner::from_config(benchmark);
        }
        self.runner = self
            .runner
            .with_warmups(benchmark.warmups)
            .with_min_duration(benchmark.min_duration)
            .with_min_repetitions(benchmark.min_repetitions);
        self.enabled = self.enabled && benchmark.enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mode(&self) -> Mode {
        self.runner.mode()
    }

    pub fn described(&self) -> &Described {
        &self.described
    }

    /// Call the function with `args`.
    ///
    /// When enabled the call is benchmarked and the positional arguments are
    /// recorded with their `Debug` rendering. When disabled the function runs
    /// once and its value is returned.
    pub fn call<A, R>(&self, args: A) -> Result<Outcome<R>>
    where
        F: Fn(A) -> R,
        A: Clone + Debug,
    {
        self.invoke(args, None)
    }

    /// Like [`call`](Self::call), also recording keyword arguments.
    pub fn call_with_kwargs<A, R>(&self, args: A, kwargs: KeywordArgs) -> Result<Outcome<R>>
    where
        F: Fn(A) -> R,
        A: Clone + Debug,
    {
        self.invoke(args, Some(kwargs))
    }

    fn invoke<A, R>(&self, args: A, kwargs: Option<KeywordArgs>) -> Result<Outcome<R>>
    where
        F: Fn(A) -> R,
        A: Clone + Debug,
    {
        if !self.enabled {
            debug!(function = %self.described, "Benchmarking disabled, calling through");
            return Ok(Outcome::Value((self.function)(args)));
        }

        let recorded = format!("{:?}", args);
        let function = &self.function;
        let mut target = Target::new(self.described.clone(), move || function(args.clone()))
            .with_args(recorded);
        if let Some(kwargs) = kwargs {
            target = target.with_kwargs(kwargs);
        }
        if let Some((description, setup)) = &self.setup {
            target = target.with_setup(description.clone(), move || setup());
        }

        self.runner.run(target).map(Outcome::Stats)
    }
}

/// Render [`Outcome::Stats`] in an output format.
#[derive(Debug, Clone)]
pub struct StatsAs {
    format: OutputFormat,
    enabled: bool,
}

impl StatsAs {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            enabled: true,
        }
    }

    pub fn from_config(output: &OutputConfig) -> Self {
        Self::new(output.format)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Decorator for StatsAs {
    fn name(&self) -> &'static str {
        "stats_as"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn decorate<R>(&mut self, outcome: Outcome<R>) -> Result<Outcome<R>> {
        match outcome {
            Outcome::Stats(stats) => Ok(Outcome::Formatted(stats_as(&stats, self.format))),
            other => Err(mismatch(self.name(), "stats", &other)),
        }
    }
}

/// Save [`Outcome::Formatted`] to a file and pass it on.
#[derive(Debug, Clone)]
pub struct Save {
    path: PathBuf,
    append: bool,
    enabled: bool,
}

impl Save {
    /// Save to `path`, appending if it exists.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append: true,
            enabled: true,
        }
    }

    /// The configured output file, if any.
    pub fn from_config(output: &OutputConfig) -> Option<Self> {
        output
            .file
            .as_ref()
            .map(|path| Self::new(path.clone()).append(output.append))
    }

    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Decorator for Save {
    fn name(&self) -> &'static str {
        "save"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn decorate<R>(&mut self, outcome: Outcome<R>) -> Result<Outcome<R>> {
        match outcome {
            Outcome::Formatted(formatted) => {
                formatted.save(&self.path, self.append)?;
                Ok(Outcome::Formatted(formatted))
            }
            other => Err(mismatch(
                self.name(),
                "formatted stats (apply stats_as first)",
                &other,
            )),
        }
    }
}

/// Write stability warnings for [`Outcome::Stats`] to a sink and pass the
/// stats on.
pub struct Validate<W> {
    sink: W,
    enabled: bool,
    warnings: Vec<String>,
}

impl<W: Write> Validate<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            enabled: true,
            warnings: Vec::new(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Warnings from the most recent validation.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}

impl<W: Write> Decorator for Validate<W> {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn decorate<R>(&mut self, outcome: Outcome<R>) -> Result<Outcome<R>> {
        match outcome {
            Outcome::Stats(stats) => {
                self.warnings = stats.validate(&mut self.sink)?;
                Ok(Outcome::Stats(stats))
            }
            other => Err(mismatch(
                self.name(),
                "stats (apply it before stats_as)",
                &other,
            )),
        }
    }
}
