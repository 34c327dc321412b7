//! Markdown reporter for benchmark results

use super::StatsRecord;

/// Format a run as a Markdown table row, preceded by the header and the
/// separator row unless `append` is set
pub(crate) fn render(record: &StatsRecord, append: bool) -> String {
    let mut output = String::new();

    if !append {
        let header: Vec<&str> = StatsRecord::header().collect();
        write_row(&mut output, header.iter().copied());
        write_row(&mut output, header.iter().map(|_| "---"));
    }

    let cells = record.cells();
    let escaped: Vec<String> = cells.iter().map(|cell| escape(cell)).collect();
    write_row(&mut output, escaped.iter().map(String::as_str));

    output
}

fn write_row<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>) {
    for cell in cells {
        output.push_str("| ");
        output.push_str(cell);
        output.push(' ');
    }
    output.push_str("|\n");
}

// Pipes would split the cell and newlines would end the row.
fn escape(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}
