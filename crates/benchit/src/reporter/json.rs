//! JSON reporter for benchmark results
//!
//! A results file holds `{"runs": [...]}`; appending reads it back, pushes
//! the new run and rewrites the whole document. Non-finite statistics are
//! written as `null`.

use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use super::StatsRecord;
use crate::error::{BenchError, Result};

/// Format a run as JSON
///
/// # Arguments
///
/// * `record` - The run to format
/// * `append` - Return the bare run object instead of a full document
pub(crate) fn render(record: &StatsRecord, append: bool) -> Result<String> {
    let output = if append {
        serde_json::to_string(record)?
    } else {
        serde_json::to_string(&document(record)?)?
    };
    Ok(output)
}

/// Write a run to `path`, adding it to the existing document if `append` is set
pub(crate) fn save(record: &StatsRecord, path: &Path, append: bool) -> Result<()> {
    let document = if append {
        let content = fs::read_to_string(path)?;
        let mut existing: Value = serde_json::from_str(&content)?;
        let runs = existing
            .get_mut("runs")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| {
                BenchError::InvalidArgument(format!(
                    "{} has no \"runs\" array to append to",
                    path.display()
                ))
            })?;
        runs.push(serde_json::to_value(record)?);
        existing
    } else {
        document(record)?
    };

    fs::write(path, serde_json::to_string(&document)?)?;
    Ok(())
}

fn document(record: &StatsRecord) -> Result<Value> {
    Ok(json!({ "runs": [serde_json::to_value(record)?] }))
}
