//! Wrapping a function and chaining post-processing stages
//!
//! Run with: cargo test -p benchit --test decorator_chain

use benchit::decorators::{Benchmarked, Save, StatsAs, Validate};
use benchit::{BenchError, Config, OutputFormat};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn config_for(dir: &TempDir, extra: &str) -> Config {
    let file = dir.path().join("bench.md");
    let toml = format!(
        "[benchmark]\nrepetitions = 5\nwarmups = 0\n{extra}\n[output]\nformat = \"markdown\"\nfile = {:?}\n",
        file.display().to_string()
    );
    Config::from_str(&toml).unwrap()
}

#[test]
fn test_full_chain_saves_markdown() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "");

    let wrapped = Benchmarked::new("square", |x: u64| x * x)
        .repeat(config.benchmark.repetitions)
        .configure(&config);

    let mut validate = Validate::new(Vec::<u8>::new());
    let mut save = Save::from_config(&config.output).unwrap();
    let outcome = wrapped
        .call(12)
        .unwrap()
        .then(&mut validate)
        .unwrap()
        .then(&mut StatsAs::from_config(&config.output))
        .unwrap()
        .then(&mut save)
        .unwrap();

    let formatted = outcome.as_formatted().unwrap();
    assert_eq!(formatted.format(), OutputFormat::Markdown);
    assert_eq!(formatted.record().data.repetitions, 5);
    assert_eq!(formatted.record().metadata.args.as_deref(), Some("12"));

    let content = fs::read_to_string(dir.path().join("bench.md")).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("| square |"));
    // a noop this fast is always flagged
    assert!(!validate.warnings().is_empty());
}

#[test]
fn test_disabled_config_short_circuits_chain() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "enabled = false");

    let wrapped = Benchmarked::new("square", |x: u64| x * x).configure(&config);
    let stages_enabled = config.benchmark.enabled;

    let outcome = wrapped
        .call(12)
        .unwrap()
        .then(&mut Validate::new(Vec::<u8>::new()).enabled(stages_enabled))
        .unwrap()
        .then(&mut StatsAs::from_config(&config.output).enabled(stages_enabled))
        .unwrap()
        .then(&mut Save::from_config(&config.output).unwrap().enabled(stages_enabled))
        .unwrap();

    assert_eq!(outcome.into_value(), Some(144));
    assert!(!dir.path().join("bench.md").exists());
}

#[test]
fn test_stages_in_wrong_order_fail() {
    let wrapped = Benchmarked::new("square", |x: u64| x * x).repeat(2);

    let formatted = wrapped
        .call(3)
        .unwrap()
        .then(&mut StatsAs::new(OutputFormat::Csv))
        .unwrap();
    let err = formatted
        .then(&mut Validate::new(Vec::<u8>::new()))
        .unwrap_err();

    assert!(matches!(err, BenchError::TypeMismatch(_)));
}
