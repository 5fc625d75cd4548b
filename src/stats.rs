//! Statistical helpers shared by the significance and decomposition engines.
//!
//! Provides:
//! - Arithmetic mean and population variance
//! - Count-weighted variance of per-bin averages
//! - Median and sample standard deviation of raw scenario samples

/// Arithmetic mean. `NaN` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (denominator `n`). `NaN` for an empty slice.
#[must_use]
pub fn variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Weighted variance of `values`.
///
/// Second moment about the weighted mean, normalized by the total weight:
///
/// ```text
/// avg = Σ wᵢ xᵢ / Σ wᵢ
/// var = Σ wᵢ (xᵢ - avg)² / Σ wᵢ
/// ```
///
/// Used with per-bin averages as `values` and bin occupancy counts as
/// `weights`, so a bin holding one sample weighs less than a bin holding a
/// thousand. The result is `NaN` when the total weight is zero; callers must
/// pass at least one non-empty bin.
///
/// # Panics
///
/// Panics in debug builds if `values` and `weights` have different lengths.
///
/// # Example
///
/// ```
/// use simdec::stats::weighted_variance;
///
/// // equal weights reduce to the population variance
/// let var = weighted_variance(&[1.0, 3.0], &[1.0, 1.0]);
/// assert!((var - 1.0).abs() < 1e-12);
///
/// // a heavy bin pulls the mean towards itself
/// let var = weighted_variance(&[1.0, 3.0], &[3.0, 1.0]);
/// assert!((var - 0.75).abs() < 1e-12);
/// ```
#[must_use]
pub fn weighted_variance(values: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), weights.len());

    let total: f64 = weights.iter().sum();
    let avg = values
        .iter()
        .zip(weights)
        .map(|(x, w)| x * w)
        .sum::<f64>()
        / total;

    values
        .iter()
        .zip(weights)
        .map(|(x, w)| w * (x - avg).powi(2))
        .sum::<f64>()
        / total
}

/// Median of `values`. `None` for an empty slice.
///
/// Even-length inputs average the two middle values.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (denominator `n - 1`). `None` below two values.
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        assert!((variance(&values) - 4.0).abs() < 1e-12);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_weighted_variance_matches_expanded_samples() {
        // averages weighted by counts equal the variance of the repeated values
        let avgs = [1.0, 2.0, 6.0];
        let counts = [2.0, 1.0, 3.0];
        let expanded = [1.0, 1.0, 2.0, 6.0, 6.0, 6.0];

        let weighted = weighted_variance(&avgs, &counts);
        assert!((weighted - variance(&expanded)).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_variance_single_bin() {
        assert_eq!(weighted_variance(&[3.5], &[10.0]), 0.0);
    }

    #[test]
    fn test_weighted_variance_zero_weights() {
        assert!(weighted_variance(&[1.0, 2.0], &[0.0, 0.0]).is_nan());
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0]), Some(3.0));
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_sample_std() {
        assert_eq!(sample_std(&[1.0]), None);
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }
}
