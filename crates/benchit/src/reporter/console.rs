//! Console reporter for benchmark results
//!
//! Provides human-readable output with an ASCII percentile table.

use std::fmt::Write;

use super::StatsRecord;
use crate::error::{BenchError, Result};
use crate::stats::coefficient_of_variation;

/// Format a run for console output
pub(crate) fn render(record: &StatsRecord) -> Result<String> {
    format_record(record).map_err(|_| {
        BenchError::InvalidArgument("failed to format console report".to_string())
    })
}

fn format_record(record: &StatsRecord) -> std::result::Result<String, std::fmt::Error> {
    let m = &record.metadata;
    let d = &record.data;
    let unit = m.unit.symbol();
    let mut output = String::new();

    writeln!(output)?;
    writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
    writeln!(output, "║                      BENCHMARK RESULTS                       ║")?;
    writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
    writeln!(output)?;

    writeln!(output, "Function:  {}", m.function)?;
    if let (Some(file), Some(line)) = (&m.file, m.line) {
        writeln!(output, "Location:  {}:{}", file, line)?;
    }
    if m.setup != "pass" {
        writeln!(output, "Setup:     {}", m.setup)?;
    }
    if let Some(args) = &m.args {
        writeln!(output, "Args:      {}", args)?;
    }
    if let Some(kwargs) = &m.kwargs {
        writeln!(output, "Kwargs:    {}", super::kwargs_text(kwargs))?;
    }
    writeln!(output, "Started:   {}", m.timestamp.to_rfc3339())?;
    writeln!(output)?;

    writeln!(
        output,
        "  Repetitions: {} measured, {} warmup",
        d.repetitions, m.warmups
    )?;
    writeln!(output, "  Total:       {}{}", format_value(d.total), unit)?;
    writeln!(output)?;

    writeln!(output, "  ┌─────────┬─────────┬─────────┬─────────┬─────────┬─────────┬─────────┐")?;
    writeln!(output, "  │   Min   │   P5    │   P25   │   P50   │   P75   │   P95   │   Max   │")?;
    writeln!(output, "  ├─────────┼─────────┼─────────┼─────────┼─────────┼─────────┼─────────┤")?;
    writeln!(
        output,
        "  │ {:>7} │ {:>7} │ {:>7} │ {:>7} │ {:>7} │ {:>7} │ {:>7} │",
        format_value(d.minimum),
        format_value(d.percentile_5th),
        format_value(d.percentile_25th),
        format_value(d.median),
        format_value(d.percentile_75th),
        format_value(d.percentile_95th),
        format_value(d.maximum)
    )?;
    writeln!(output, "  └─────────┴─────────┴─────────┴─────────┴─────────┴─────────┴─────────┘")?;
    writeln!(output, "  (all times in {})", unit)?;
    writeln!(output)?;

    let cv = coefficient_of_variation(d.std, d.mean);
    writeln!(
        output,
        "  Mean: {}{}, StdDev: {}{}, CV: {:.2}%, Std Outliers: {}",
        format_value(d.mean),
        unit,
        format_value(d.std),
        unit,
        cv * 100.0,
        d.std_outliers
    )?;
    writeln!(
        output,
        "  Throughput: {}/{}, Throughput (Min): {}/{}",
        format_value(d.throughput),
        unit,
        format_value(d.throughput_min),
        unit
    )?;
    writeln!(output)?;

    Ok(output)
}

fn format_value(v: f64) -> String {
    if !v.is_finite() {
        format!("{}", v)
    } else if v == 0.0 || v.abs() >= 1.0 {
        format!("{:.2}", v)
    } else if v.abs() >= 0.001 {
        format!("{:.4}", v)
    } else {
        format!("{:.2e}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Described;
    use crate::stats::Stats;

    fn create_test_record() -> StatsRecord {
        let stats = Stats::new(
            vec![0.9, 0.1, 0.2, 0.3, 0.4, 0.5],
            Described::function("work"),
            1,
        )
        .unwrap()
        .with_args("(1,)");
        StatsRecord::from_stats(&stats)
    }

    #[test]
    fn test_console_format_contains_function() {
        let output = render(&create_test_record()).unwrap();

        assert!(output.contains("BENCHMARK RESULTS"));
        assert!(output.contains("<function work>"));
        assert!(output.contains("Location:"));
        assert!(output.contains("console.rs"));
        assert!(output.contains("Args:      (1,)"));
    }

    #[test]
    fn test_console_format_contains_percentile_table() {
        let output = render(&create_test_record()).unwrap();

        assert!(output.contains("P5"));
        assert!(output.contains("P95"));
        assert!(output.contains("0.1000"));
        assert!(output.contains("0.5000"));
        assert!(output.contains("(all times in s)"));
    }

    #[test]
    fn test_console_format_shows_counts() {
        let output = render(&create_test_record()).unwrap();

        assert!(output.contains("5 measured, 1 warmup"));
        assert!(output.contains("Std Outliers: 2"));
    }

    #[test]
    fn test_console_cv_matches_stats() {
        let stats = Stats::new(
            vec![0.9, 0.1, 0.2, 0.3, 0.4, 0.5],
            Described::function("work"),
            1,
        )
        .unwrap();
        let output = render(&StatsRecord::from_stats(&stats)).unwrap();

        let expected = format!("CV: {:.2}%", stats.coefficient_of_variation() * 100.0);
        assert!(output.contains(&expected), "missing {expected} in {output}");
    }

    #[test]
    fn test_console_cv_zero_mean() {
        let stats = Stats::new(vec![0.0, 0.0], Described::snippet("noop"), 0).unwrap();
        let output = render(&StatsRecord::from_stats(&stats)).unwrap();

        assert!(output.contains("CV: inf%"));
    }

    #[test]
    fn test_console_format_snippet_has_no_location() {
        let stats = Stats::new(vec![0.0], Described::snippet("noop"), 0).unwrap();
        let output = render(&StatsRecord::from_stats(&stats)).unwrap();

        assert!(output.contains("Function:  noop"));
        assert!(!output.contains("Location:"));
        assert!(output.contains("Throughput: NaN/s"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0.00");
        assert_eq!(format_value(12.5), "12.50");
        assert_eq!(format_value(0.0123), "0.0123");
        assert_eq!(format_value(0.00005), "5.00e-5");
        assert_eq!(format_value(f64::NAN), "NaN");
    }
}
