//! Time units and the canonical conversion-factor table.
//!
//! Every unit is described once, by its length in nanoseconds. A conversion
//! between two units multiplies by the (integral) ratio when going to a finer
//! unit and divides by it when going to a coarser one, so each of the 42
//! ordered pairs reduces to a single exact factor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BenchError;

/// Unit of time a [`Stats`](super::Stats) series is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// All units, finest first.
    pub const ALL: [TimeUnit; 7] = [
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
    ];

    /// Length of one unit in nanoseconds.
    ///
    /// All values are integers below 2^53 and therefore exact in `f64`.
    pub fn in_nanoseconds(self) -> f64 {
        match self {
            TimeUnit::Nanoseconds => 1.0,
            TimeUnit::Microseconds => 1_000.0,
            TimeUnit::Milliseconds => 1_000_000.0,
            TimeUnit::Seconds => 1_000_000_000.0,
            TimeUnit::Minutes => 60_000_000_000.0,
            TimeUnit::Hours => 3_600_000_000_000.0,
            TimeUnit::Days => 86_400_000_000_000.0,
        }
    }

    /// Short symbol used in reports.
    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }

    /// The conversion taking a value in `self` to a value in `target`.
    pub fn conversion_to(self, target: TimeUnit) -> Conversion {
        let from = self.in_nanoseconds();
        let to = target.in_nanoseconds();
        if from == to {
            Conversion::Identity
        } else if from > to {
            Conversion::Multiply(from / to)
        } else {
            Conversion::Divide(to / from)
        }
    }

    /// Convert a single value from `self` to `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use benchit::stats::TimeUnit;
    ///
    /// assert_eq!(TimeUnit::Seconds.convert(1.5, TimeUnit::Milliseconds), 1500.0);
    /// assert_eq!(TimeUnit::Hours.convert(48.0, TimeUnit::Days), 2.0);
    /// ```
    pub fn convert(self, value: f64, target: TimeUnit) -> f64 {
        self.conversion_to(target).apply(value)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TimeUnit {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ns" | "nanoseconds" => Ok(TimeUnit::Nanoseconds),
            "us" | "microseconds" => Ok(TimeUnit::Microseconds),
            "ms" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "seconds" => Ok(TimeUnit::Seconds),
            "m" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hours" => Ok(TimeUnit::Hours),
            "d" | "days" => Ok(TimeUnit::Days),
            other => Err(BenchError::InvalidArgument(format!(
                "unknown time unit: {other}"
            ))),
        }
    }
}

/// A scalar conversion between two units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    Identity,
    Multiply(f64),
    Divide(f64),
}

impl Conversion {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Conversion::Identity => value,
            Conversion::Multiply(factor) => value * factor,
            Conversion::Divide(factor) => value / factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_factors() {
        use TimeUnit::*;

        assert_eq!(Nanoseconds.conversion_to(Microseconds), Conversion::Divide(1e3));
        assert_eq!(Nanoseconds.conversion_to(Milliseconds), Conversion::Divide(1e6));
        assert_eq!(Nanoseconds.conversion_to(Seconds), Conversion::Divide(1e9));
        assert_eq!(Seconds.conversion_to(Nanoseconds), Conversion::Multiply(1e9));
        assert_eq!(Seconds.conversion_to(Minutes), Conversion::Divide(60.0));
        assert_eq!(Seconds.conversion_to(Hours), Conversion::Divide(3600.0));
        assert_eq!(Seconds.conversion_to(Days), Conversion::Divide(86400.0));
        assert_eq!(Days.conversion_to(Seconds), Conversion::Multiply(86400.0));
    }

    #[test]
    fn test_cross_factors_compose() {
        use TimeUnit::*;

        assert_eq!(
            Nanoseconds.conversion_to(Hours),
            Conversion::Divide(3600.0 * 1e9)
        );
        assert_eq!(Minutes.conversion_to(Milliseconds), Conversion::Multiply(60e3));
        assert_eq!(Hours.conversion_to(Days), Conversion::Divide(24.0));
        assert_eq!(Days.conversion_to(Minutes), Conversion::Multiply(1440.0));
    }

    #[test]
    fn test_identity_for_every_unit() {
        for unit in TimeUnit::ALL {
            assert_eq!(unit.conversion_to(unit), Conversion::Identity);
            assert_eq!(unit.convert(42.5, unit), 42.5);
        }
    }

    #[test]
    fn test_all_pairs_are_reciprocal() {
        for from in TimeUnit::ALL {
            for to in TimeUnit::ALL {
                let there = from.convert(1.0, to);
                let back = to.convert(there, from);
                assert!((back - 1.0).abs() < 1e-12, "{from} -> {to} -> {from}");
            }
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("ms".parse::<TimeUnit>().unwrap(), TimeUnit::Milliseconds);
        assert_eq!("Hours".parse::<TimeUnit>().unwrap(), TimeUnit::Hours);
        assert_eq!(TimeUnit::Microseconds.to_string(), "us");
        assert!(matches!(
            "fortnights".parse::<TimeUnit>(),
            Err(BenchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_default_is_seconds() {
        assert_eq!(TimeUnit::default(), TimeUnit::Seconds);
    }
}
