//! Wrap a function and chain the post-processing stages
//!
//! Usage: ENABLE_BENCHMARKING=0 cargo run -p benchit --example decorated

use anyhow::Result;
use benchit::decorators::{Benchmarked, Outcome, StatsAs, Validate};
use benchit::{Config, OutputFormat};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let enabled = config.benchmark.enabled;

    let nap = Benchmarked::new("nap", |ms: u64| {
        thread::sleep(Duration::from_millis(ms));
        ms
    })
    .throughput(5)
    .configure(&config);

    let outcome = nap
        .call(2)?
        .then(&mut Validate::new(std::io::stderr()).enabled(enabled))?
        .then(&mut StatsAs::new(OutputFormat::Markdown).enabled(enabled))?;

    match outcome {
        Outcome::Formatted(formatted) => print!("{}", formatted.resource(false)?),
        Outcome::Value(ms) => println!("Benchmarking disabled, slept {}ms", ms),
        Outcome::Stats(stats) => println!("{} repetitions", stats.repetitions()),
    }

    Ok(())
}
