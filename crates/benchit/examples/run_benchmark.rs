//! Benchmark a sort with settings from an optional TOML config file
//!
//! Usage: cargo run -p benchit --example run_benchmark -- [config.toml]

use anyhow::Result;
use benchit::config::Config;
use benchit::reporter::{OutputFormat, Reporter};
use benchit::runner::{BenchmarkRunner, Target};
use benchit::SystemInfo;
use std::env;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            println!("Loading config from: {}", path);
            Config::from_file(&path)?.with_env_overrides()
        }
        None => Config::from_env(),
    };

    let system = SystemInfo::collect();
    println!(
        "Running on {} {} ({} CPUs, timer resolution {:?}ns)",
        system.os,
        system.arch,
        system.cpus.unwrap_or(0),
        system.timer_resolution_ns
    );
    println!("  Repetitions: {}", config.benchmark.repetitions);
    println!("  Warmups: {}", config.benchmark.warmups);
    println!();

    let values: Vec<u32> = (0..100_000).rev().collect();
    let target = Target::function("sort_unstable", || {
        let mut v = values.clone();
        v.sort_unstable();
        v
    })
    .with_args("(100_000 descending u32)");

    let mut stats = BenchmarkRunner::from_config(&config.benchmark).run(target)?;
    stats.to_milliseconds();
    stats.validate(&mut std::io::stderr())?;

    Reporter::new(OutputFormat::Console).report(&stats)?;
    if config.output.file.is_some() {
        Reporter::emit(&stats, &config.output)?;
    }

    Ok(())
}
