//! File save semantics for every output format
//!
//! Run with: cargo test -p benchit --test save_semantics

use benchit::reporter::{stats_as, OutputFormat, DATA_COLUMNS, METADATA_COLUMNS};
use benchit::{BenchError, Described, Stats};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const COLUMN_COUNT: usize = METADATA_COLUMNS.len() + DATA_COLUMNS.len();

fn create_test_stats() -> Stats {
    Stats::new(
        (0..20).map(|i| i as f64).collect(),
        Described::anonymous("lambda"),
        0,
    )
    .unwrap()
}

#[test]
fn test_append_to_missing_file_writes_header() {
    let dir = TempDir::new().unwrap();
    let stats = create_test_stats();

    for format in [OutputFormat::Csv, OutputFormat::Markdown, OutputFormat::Json] {
        let path = dir.path().join(format.as_str());
        let formatted = stats_as(&stats, format);

        formatted.save(&path, true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, formatted.resource(false).unwrap(), "{format}");
    }
}

#[test]
fn test_csv_append_adds_rows_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.csv");
    let formatted = stats_as(&create_test_stats(), OutputFormat::Csv);

    formatted.save(&path, true).unwrap();
    formatted.save(&path, true).unwrap();
    formatted.save(&path, true).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Timestamp,"));
    assert_eq!(lines[1], lines[2]);
    assert_eq!(lines[2], lines[3]);
    assert_eq!(lines[3].split(',').count(), COLUMN_COUNT);
}

#[test]
fn test_markdown_append_keeps_single_separator() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.md");
    let formatted = stats_as(&create_test_stats(), OutputFormat::Markdown);

    formatted.save(&path, true).unwrap();
    formatted.save(&path, true).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines.iter().filter(|line| line.contains("---")).count(), 1);
}

#[test]
fn test_json_append_pushes_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.json");
    let mut stats = create_test_stats();

    stats_as(&stats, OutputFormat::Json).save(&path, true).unwrap();
    stats.to_milliseconds();
    stats_as(&stats, OutputFormat::Json).save(&path, true).unwrap();

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let runs = parsed["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["metadata"]["Unit"], "seconds");
    assert_eq!(runs[1]["metadata"]["Unit"], "milliseconds");
    assert_eq!(runs[0]["data"]["Max"], 19.0);
    assert_eq!(runs[1]["data"]["Max"], 19000.0);
}

#[test]
fn test_json_append_to_foreign_document_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("other.json");
    fs::write(&path, "{\"something\": []}").unwrap();

    let err = stats_as(&create_test_stats(), OutputFormat::Json)
        .save(&path, true)
        .unwrap_err();
    assert!(matches!(err, BenchError::InvalidArgument(_)));
}

#[test]
fn test_no_append_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    let stats = create_test_stats();

    for format in [OutputFormat::Csv, OutputFormat::Markdown, OutputFormat::Json] {
        let path = dir.path().join(format!("existing.{format}"));
        fs::write(&path, "keep me").unwrap();

        let err = stats_as(&stats, format).save(&path, false).unwrap_err();

        assert!(matches!(err, BenchError::FileAlreadyExists(ref p) if *p == path));
        assert!(err.to_string().contains("already exists but 'append' is set to false"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }
}

#[test]
fn test_no_append_creates_new_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.csv");
    let formatted = stats_as(&create_test_stats(), OutputFormat::Csv);

    formatted.save(&path, false).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        formatted.resource(false).unwrap()
    );
}
