//! Snapshot of the machine a benchmark ran on
//!
//! Collection is best effort: anything that cannot be determined is `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Instant;
use tracing::debug;

/// Name of the clock used for timing.
pub const TIMER: &str = "std::time::Instant";

const RESOLUTION_SAMPLES: usize = 100;
const MAX_SPINS: usize = 100_000;

/// Hardware, OS and timer details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Logical CPUs available to this process
    pub cpus: Option<usize>,
    pub os: String,
    pub family: String,
    pub arch: String,
    /// Pointer width in bits
    pub bits: u32,
    pub timer: String,
    /// Smallest observed non-zero tick of [`TIMER`], in nanoseconds
    pub timer_resolution_ns: Option<f64>,
    /// Version of this crate
    pub version: String,
    pub collected_at: DateTime<Utc>,
}

impl SystemInfo {
    pub fn collect() -> Self {
        let info = Self {
            cpus: thread::available_parallelism().ok().map(|n| n.get()),
            os: std::env::consts::OS.to_string(),
            family: std::env::consts::FAMILY.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            bits: usize::BITS,
            timer: TIMER.to_string(),
            timer_resolution_ns: timer_resolution_ns(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            collected_at: Utc::now(),
        };
        debug!(?info, "Collected system information");
        info
    }
}

/// Smallest non-zero difference between consecutive clock reads.
fn timer_resolution_ns() -> Option<f64> {
    let mut best: Option<u128> = None;

    for _ in 0..RESOLUTION_SAMPLES {
        let start = Instant::now();
        for _ in 0..MAX_SPINS {
            let elapsed = start.elapsed().as_nanos();
            if elapsed > 0 {
                best = Some(best.map_or(elapsed, |b| b.min(elapsed)));
                break;
            }
        }
    }

    best.map(|ns| ns as f64)
}
