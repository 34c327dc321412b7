//! Benchmark execution
//!
//! This module drives the code under test: it times repeated calls with a
//! monotonic clock, strictly one after another, and hands the raw series to
//! [`Stats`].
//!
//! Three sampling strategies are available:
//!
//! - [`benchit`]: a fixed number of repetitions after some warmups
//! - [`single_shot`]: one measured call, for cold-start timings
//! - [`throughput`]: keep sampling until both a minimum cumulative time and a
//!   minimum repetition count have been reached
//!
//! # Example
//!
//! ```
//! use benchit::runner::{benchit, Target};
//!
//! # fn example() -> benchit::Result<()> {
//! let data: Vec<u64> = (0..1_000).collect();
//! let target = Target::function("sum", || data.iter().sum::<u64>());
//!
//! let stats = benchit(target, 10, 1)?;
//! assert_eq!(stats.repetitions(), 10);
//! assert_eq!(stats.raw_times().len(), 11);
//! # Ok(())
//! # }
//! ```

use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use crate::config::BenchmarkConfig;
use crate::descriptor::{Described, KeywordArgs};
use crate::error::Result;
use crate::stats::Stats;

/// Code under test, plus what to record about it.
pub struct Target<'a> {
    described: Described,
    routine: Box<dyn FnMut() + 'a>,
    setup: Option<Box<dyn FnMut() + 'a>>,
    setup_description: String,
    args: Option<String>,
    kwargs: Option<KeywordArgs>,
}

impl<'a> Target<'a> {
    /// Wrap `routine`, described by `described`.
    ///
    /// The routine's return value is passed through [`black_box`].
    pub fn new<F, R>(described: Described, mut routine: F) -> Self
    where
        F: FnMut() -> R + 'a,
    {
        Self {
            described,
            routine: Box::new(move || {
                black_box(routine());
            }),
            setup: None,
            setup_description: "pass".to_string(),
            args: None,
            kwargs: None,
        }
    }

    /// A named function, recorded at the caller's file and line.
    #[track_caller]
    pub fn function<F, R>(name: impl Into<String>, routine: F) -> Self
    where
        F: FnMut() -> R + 'a,
    {
        Self::new(Described::function(name), routine)
    }

    /// A source snippet, with no name, file or line.
    pub fn snippet<F, R>(text: impl Into<String>, routine: F) -> Self
    where
        F: FnMut() -> R + 'a,
    {
        Self::new(Described::snippet(text), routine)
    }

    /// Run `setup` before every timed call. It is not timed.
    pub fn with_setup<S>(mut self, description: impl Into<String>, setup: S) -> Self
    where
        S: FnMut() + 'a,
    {
        self.setup = Some(Box::new(setup));
        self.setup_description = description.into();
        self
    }

    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    pub fn with_kwargs(mut self, kwargs: KeywordArgs) -> Self {
        self.kwargs = Some(kwargs);
        self
    }

    pub fn described(&self) -> &Described {
        &self.described
    }

    /// Time a single call, in seconds.
    fn time_once(&mut self) -> f64 {
        if let Some(setup) = self.setup.as_mut() {
            setup();
        }
        let start = Instant::now();
        (self.routine)();
        start.elapsed().as_secs_f64()
    }

    fn into_stats(self, times: Vec<f64>, warmups: usize) -> Result<Stats> {
        let mut stats = Stats::new(times, self.described, warmups)?.with_setup(self.setup_description);
        if let Some(args) = self.args {
            stats = stats.with_args(args);
        }
        if let Some(kwargs) = self.kwargs {
            stats = stats.with_kwargs(kwargs);
        }
        Ok(stats)
    }
}

/// Benchmark `target` `repetitions` times after `warmups` discarded runs.
///
/// # Errors
///
/// Returns [`BenchError::InvalidConfiguration`](crate::BenchError::InvalidConfiguration)
/// if `repetitions` is zero.
#[instrument(skip(target), fields(function = %target.described))]
pub fn benchit(mut target: Target<'_>, repetitions: usize, warmups: usize) -> Result<Stats> {
    let total = repetitions + warmups;
    let mut times = Vec::with_capacity(total);
    for _ in 0..total {
        times.push(target.time_once());
    }
    debug!(samples = times.len(), "Collected timing samples");

    let stats = target.into_stats(times, warmups)?;
    info!(
        repetitions = stats.repetitions(),
        total_s = stats.total(),
        "Benchmark finished"
    );
    Ok(stats)
}

/// Time a single call of `target`, after `warmups` discarded runs.
pub fn single_shot(target: Target<'_>, warmups: usize) -> Result<Stats> {
    benchit(target, 1, warmups)
}

/// Benchmark `target` until at least `min_duration` of measured time has
/// accumulated and at least `min_repetitions` measured calls were made.
///
/// At least one measured call is always made. Warmup calls are recorded in
/// the raw series but count toward neither floor.
#[instrument(skip(target), fields(function = %target.described))]
pub fn throughput(
    mut target: Target<'_>,
    min_repetitions: usize,
    warmups: usize,
    min_duration: Duration,
) -> Result<Stats> {
    let floor = min_duration.as_secs_f64();
    let mut times = Vec::with_capacity(warmups + min_repetitions.max(1));

    for _ in 0..warmups {
        times.push(target.time_once());
    }

    let mut total_time = 0.0;
    let mut repetitions = 0usize;
    while repetitions == 0 || total_time < floor || repetitions < min_repetitions {
        let time = target.time_once();
        times.push(time);
        total_time += time;
        repetitions += 1;
    }
    debug!(samples = times.len(), total_time, "Collected timing samples");

    let stats = target.into_stats(times, warmups)?;
    info!(
        repetitions = stats.repetitions(),
        throughput = stats.throughput(),
        "Throughput benchmark finished"
    );
    Ok(stats)
}

/// Sampling strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// A fixed number of measured repetitions
    Repeat { repetitions: usize },
    /// One measured call
    SingleShot,
    /// Sample until both floors are reached
    Throughput {
        min_repetitions: usize,
        min_duration: Duration,
    },
}

/// A sampling strategy plus its warmup count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkRunner {
    mode: Mode,
    warmups: usize,
}

impl BenchmarkRunner {
    /// Fixed repetitions, one warmup.
    pub fn repeat(repetitions: usize) -> Self {
        Self {
            mode: Mode::Repeat { repetitions },
            warmups: 1,
        }
    }

    /// One measured call, no warmup.
    pub fn single_shot() -> Self {
        Self {
            mode: Mode::SingleShot,
            warmups: 0,
        }
    }

    /// Throughput sampling for at least one second, one warmup.
    pub fn throughput(min_repetitions: usize) -> Self {
        Self {
            mode: Mode::Throughput {
                min_repetitions,
                min_duration: Duration::from_secs(1),
            },
            warmups: 1,
        }
    }

    /// Fixed repetitions with the configured counts.
    pub fn from_config(config: &BenchmarkConfig) -> Self {
        Self {
            mode: Mode::Repeat {
                repetitions: config.repetitions,
            },
            warmups: config.warmups,
        }
    }

    pub fn with_warmups(mut self, warmups: usize) -> Self {
        self.warmups = warmups;
        self
    }

    /// Change the time floor. Only affects throughput sampling.
    pub fn with_min_duration(mut self, duration: Duration) -> Self {
        if let Mode::Throughput { min_duration, .. } = &mut self.mode {
            *min_duration = duration;
        }
        self
    }

    /// Raise the repetition floor to at least `floor`. Only affects
    /// throughput sampling.
    pub fn with_min_repetitions(mut self, floor: usize) -> Self {
        if let Mode::Throughput { min_repetitions, .. } = &mut self.mode {
            *min_repetitions = (*min_repetitions).max(floor);
        }
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn warmups(&self) -> usize {
        self.warmups
    }

    /// Benchmark `target` with this strategy.
    pub fn run(&self, target: Target<'_>) -> Result<Stats> {
        match self.mode {
            Mode::Repeat { repetitions } => benchit(target, repetitions, self.warmups),
            Mode::SingleShot => single_shot(target, self.warmups),
            Mode::Throughput {
                min_repetitions,
                min_duration,
            } => throughput(target, min_repetitions, self.warmups, min_duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use std::cell::Cell;
    use std::thread;

    #[test]
    fn test_benchit_counts() {
        let calls = Cell::new(0);
        let target = Target::function("count", || calls.set(calls.get() + 1));

        let stats = benchit(target, 10, 2).unwrap();

        assert_eq!(calls.get(), 12);
        assert_eq!(stats.repetitions(), 10);
        assert_eq!(stats.raw_times().len(), 12);
        assert_eq!(stats.warmups(), 2);
        assert!(stats.minimum() >= 0.0);
    }

    #[test]
    fn test_benchit_zero_repetitions_fails() {
        let target = Target::snippet("noop", || ());
        let err = benchit(target, 0, 0).unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_benchit_measures_sleep() {
        let target = Target::function("sleep", || thread::sleep(Duration::from_millis(5)));
        let stats = benchit(target, 3, 0).unwrap();

        assert!(stats.minimum() >= 0.005);
        assert!(stats.total() >= 0.015);
    }

    #[test]
    fn test_setup_runs_before_every_call_untimed() {
        let setups = Cell::new(0);
        let target = Target::function("noop", || ()).with_setup("sleep 5ms", || {
            setups.set(setups.get() + 1);
            thread::sleep(Duration::from_millis(5));
        });

        let stats = benchit(target, 3, 1).unwrap();

        assert_eq!(setups.get(), 4);
        assert_eq!(stats.setup(), "sleep 5ms");
        assert!(stats.maximum() < 0.005);
    }

    #[test]
    fn test_metadata_is_recorded() {
        let mut kwargs = KeywordArgs::new();
        kwargs.insert("b".to_string(), "2".to_string());
        let target = Target::function("add", || 1 + 2)
            .with_args("(1,)")
            .with_kwargs(kwargs.clone());

        let stats = benchit(target, 1, 0).unwrap();

        assert_eq!(stats.function_name(), Some("add"));
        assert!(stats.file().unwrap().ends_with("runner.rs"));
        assert_eq!(stats.function_args(), Some("(1,)"));
        assert_eq!(stats.function_kwargs(), Some(&kwargs));
        assert_eq!(stats.setup(), "pass");
    }

    #[test]
    fn test_single_shot() {
        let target = Target::snippet("1 + 1", || 1 + 1);
        let stats = single_shot(target, 0).unwrap();

        assert_eq!(stats.repetitions(), 1);
        assert_eq!(stats.function_name(), None);
        assert_eq!(stats.std(), 0.0);
    }

    #[test]
    fn test_throughput_reaches_both_floors() {
        let target = Target::function("sleep", || thread::sleep(Duration::from_millis(2)));
        let stats = throughput(target, 5, 1, Duration::from_millis(20)).unwrap();

        assert!(stats.total() >= 0.020);
        assert!(stats.repetitions() >= 5);
        assert_eq!(stats.raw_times().len(), stats.times().len() + 1);
    }

    #[test]
    fn test_throughput_min_repetitions_dominates() {
        let target = Target::snippet("noop", || ());
        let stats = throughput(target, 50, 0, Duration::ZERO).unwrap();

        assert_eq!(stats.repetitions(), 50);
    }

    #[test]
    fn test_throughput_always_measures_once() {
        let target = Target::snippet("noop", || ());
        let stats = throughput(target, 0, 2, Duration::ZERO).unwrap();

        assert_eq!(stats.repetitions(), 1);
        assert_eq!(stats.raw_times().len(), 3);
    }

    #[test]
    fn test_runner_modes() {
        let runner = BenchmarkRunner::repeat(4).with_warmups(0);
        let stats = runner.run(Target::snippet("noop", || ())).unwrap();
        assert_eq!(stats.repetitions(), 4);

        let runner = BenchmarkRunner::single_shot();
        assert_eq!(runner.warmups(), 0);
        let stats = runner.run(Target::snippet("noop", || ())).unwrap();
        assert_eq!(stats.repetitions(), 1);

        let runner = BenchmarkRunner::throughput(3).with_min_duration(Duration::ZERO);
        assert_eq!(
            runner.mode(),
            Mode::Throughput {
                min_repetitions: 3,
                min_duration: Duration::ZERO
            }
        );
        let stats = runner.run(Target::snippet("noop", || ())).unwrap();
        assert_eq!(stats.repetitions(), 3);
    }

    #[test]
    fn test_runner_from_config() {
        let config = BenchmarkConfig {
            repetitions: 7,
            warmups: 2,
            ..BenchmarkConfig::default()
        };
        let runner = BenchmarkRunner::from_config(&config);

        assert_eq!(runner.mode(), Mode::Repeat { repetitions: 7 });
        assert_eq!(runner.warmups(), 2);
    }

    #[test]
    fn test_min_repetitions_only_raises_the_floor() {
        let runner = BenchmarkRunner::throughput(1)
            .with_min_duration(Duration::ZERO)
            .with_min_repetitions(50);
        assert_eq!(
            runner.mode(),
            Mode::Throughput {
                min_repetitions: 50,
                min_duration: Duration::ZERO
            }
        );
        let stats = runner.run(Target::snippet("noop", || ())).unwrap();
        assert_eq!(stats.repetitions(), 50);

        let runner = BenchmarkRunner::throughput(80).with_min_repetitions(50);
        assert!(matches!(
            runner.mode(),
            Mode::Throughput { min_repetitions: 80, .. }
        ));

        let runner = BenchmarkRunner::repeat(2).with_min_repetitions(50);
        assert_eq!(runner.mode(), Mode::Repeat { repetitions: 2 });
    }

    #[test]
    fn test_min_duration_ignored_outside_throughput() {
        let runner = BenchmarkRunner::repeat(2).with_min_duration(Duration::from_secs(9));
        assert_eq!(runner.mode(), Mode::Repeat { repetitions: 2 });
    }
}
