//! Warmup removal and standard-deviation outlier detection.
//!
//! Outliers here are samples outside the one-sigma band
//! `[mean - std, mean + std]`. They are only counted, never discarded.

/// Samples strictly outside `[mean - std, mean + std]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StdOutliers {
    /// Indices of detected outliers in the analysed slice
    pub outlier_indices: Vec<usize>,
}

impl StdOutliers {
    /// Detect samples outside the one-sigma band around `mean`.
    ///
    /// Values exactly on a bound are not outliers.
    ///
    /// # Examples
    ///
    /// ```
    /// use benchit::stats::outliers::StdOutliers;
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    /// let result = StdOutliers::detect(&data, 3.0, 1.5);
    /// assert_eq!(result.outlier_indices, vec![0, 4]);
    /// assert_eq!(result.count(), 2);
    /// ```
    pub fn detect(samples: &[f64], mean: f64, std: f64) -> Self {
        let lower_bound = mean - std;
        let upper_bound = mean + std;

        let outlier_indices = samples
            .iter()
            .enumerate()
            .filter_map(|(i, &value)| {
                if value < lower_bound || value > upper_bound {
                    Some(i)
                } else {
                    None
                }
            })
            .collect();

        StdOutliers { outlier_indices }
    }

    /// Number of outliers found.
    pub fn count(&self) -> usize {
        self.outlier_indices.len()
    }
}

/// Remove warmup iterations from the beginning.
///
/// Returns an empty slice if `warmup_count` consumes every sample.
///
/// # Examples
///
/// ```
/// use benchit::stats::outliers::remove_warmup;
///
/// let data = vec![100.0, 95.0, 10.0, 11.0, 10.5, 11.5]; // First 2 are warmup
/// let clean = remove_warmup(&data, 2);
/// assert_eq!(clean, &[10.0, 11.0, 10.5, 11.5]);
/// ```
pub fn remove_warmup(samples: &[f64], warmup_count: usize) -> &[f64] {
    if warmup_count >= samples.len() {
        &[]
    } else {
        &samples[warmup_count..]
    }
}
