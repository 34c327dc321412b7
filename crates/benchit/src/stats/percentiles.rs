//! Percentile calculations for benchmark results.
//!
//! Percentiles use linear interpolation between the two order statistics that
//! bracket the real-valued rank `k = (n - 1) * p`.

use crate::error::{BenchError, Result};

/// Sort samples ascending into a new vector.
pub fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Calculate the `p`-th percentile of a slice of samples.
///
/// # Arguments
///
/// * `samples` - Slice of samples (will be sorted internally)
/// * `p` - Percentile to calculate, as a fraction in `[0.0, 1.0]`
///
/// # Errors
///
/// Returns [`BenchError::InvalidArgument`] if `p` is outside `[0.0, 1.0]`
/// (including NaN) or `samples` is empty.
///
/// # Examples
///
/// ```
/// use benchit::stats::percentiles::percentile;
///
/// let data = vec![5.0, 1.0, 3.0, 2.0, 4.0];
/// assert_eq!(percentile(&data, 0.5).unwrap(), 3.0);
/// assert!(percentile(&data, 1.5).is_err());
/// ```
pub fn percentile(samples: &[f64], p: f64) -> Result<f64> {
    check_fraction(p)?;
    percentile_of_sorted(&sorted(samples), p)
}

/// Same as [`percentile`], for samples that are already sorted ascending.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> Result<f64> {
    check_fraction(p)?;
    if sorted.is_empty() {
        return Err(BenchError::InvalidArgument(
            "cannot take a percentile of an empty time series".to_string(),
        ));
    }

    Ok(interpolate(sorted, p))
}

/// Interpolating percentile over a non-empty sorted slice with `p` already
/// known to be in `[0.0, 1.0]`.
pub(crate) fn interpolate(sorted: &[f64], p: f64) -> f64 {
    let k = (sorted.len() - 1) as f64 * p;
    let floor_idx = k.floor();
    let ceil_idx = k.ceil();

    if floor_idx == ceil_idx {
        sorted[floor_idx as usize]
    } else {
        // weighted interpolation between the bracketing order statistics
        let lower = sorted[floor_idx as usize] * (ceil_idx - k);
        let upper = sorted[ceil_idx as usize] * (k - floor_idx);
        lower + upper
    }
}

/// Median of sorted samples (mean of the two middle values for even counts).
///
/// Returns `None` for an empty slice.
pub fn median_of_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

pub(crate) fn check_fraction(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(BenchError::InvalidArgument(format!(
            "p must be a float in the range [0.0; 1.0], got {p}"
        )))
    }
}
