//! Number of bins used by the binned significance estimator.

/// Below this value the linear calibration is not trusted.
const CALIBRATED_MIN: f64 = 30.0;

/// First-order bin count used outside the calibrated regime.
const FALLBACK_BINS: usize = 10;

/// Smallest per-axis bin count of the second-order grid.
const MIN_SECOND_ORDER_BINS: usize = 4;

/// Number of bins for the first-order and second-order indices.
///
/// The first-order count is a linear fit of calibration experiments on run
/// and factor counts:
///
/// ```text
/// n_foe = ceil(36 - 2.7 k + (0.0017 - 0.00008 k) n)
/// ```
///
/// The fit only holds above 30 bins; anything at or below that uses a fixed
/// 10 bins instead. The second-order grid uses `max(4, round(sqrt(n_foe)))`
/// bins along each axis.
///
/// # Example
///
/// ```
/// use simdec::significance::number_of_bins;
///
/// assert_eq!(number_of_bins(1_000, 4), (10, 4));
/// assert_eq!(number_of_bins(1 << 18, 3), (411, 20));
/// ```
#[must_use]
pub fn number_of_bins(n_runs: usize, n_factors: usize) -> (usize, usize) {
    let n = n_runs as f64;
    let k = n_factors as f64;

    let fitted = (36.0 - 2.7 * k + (0.0017 - 0.00008 * k) * n).ceil();
    let n_bins_foe = if fitted <= CALIBRATED_MIN {
        FALLBACK_BINS
    } else {
        fitted as usize
    };

    let n_bins_soe = ((n_bins_foe as f64).sqrt().round() as usize).max(MIN_SECOND_ORDER_BINS);

    (n_bins_foe, n_bins_soe)
}
