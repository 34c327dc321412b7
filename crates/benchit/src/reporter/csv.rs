//! CSV reporter for benchmark results
//!
//! Fields containing a comma, a double quote or a line break are quoted, with
//! embedded quotes doubled.

use std::borrow::Cow;

use super::StatsRecord;

/// Format a run as CSV, with a header row unless `append` is set
pub(crate) fn render(record: &StatsRecord, append: bool) -> String {
    let mut output = String::new();
    if !append {
        write_row(&mut output, StatsRecord::header());
    }
    write_row(&mut output, record.cells().iter().map(String::as_str));
    output
}

fn write_row<'a>(output: &mut String, fields: impl Iterator<Item = &'a str>) {
    let row: Vec<Cow<'a, str>> = fields.map(escape).collect();
    output.push_str(&row.join(","));
    output.push('\n');
}

fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
