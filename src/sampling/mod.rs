//! Space-filling samples of the unit hypercube.
//!
//! Simulation inputs for a decomposition are usually drawn with a
//! low-discrepancy design rather than plain random numbers, so that every
//! region of the input space is represented in the bins.
//!
//! ## Available Samplers
//!
//! | Sampler | Kind | Notes |
//! |---------|------|-------|
//! | [`Halton`] | Quasi-random | Radical inverse in the first `d` prime bases |
//! | [`LatinHypercube`] | Stratified random | One point per stratum and dimension, seeded |
//!
//! ## Usage
//!
//! ```
//! use simdec::sampling::{discrepancy, scale, Halton, Sampler};
//!
//! let mut halton = Halton::new(2)?;
//! let unit = halton.sample(256);
//! assert!(discrepancy(&unit)? < 1e-3);
//!
//! let points = scale(&unit, &[-1.0, 0.0], &[1.0, 10.0])?;
//! assert!(points.column(1).iter().all(|&v| (0.0..10.0).contains(&v)));
//! # Ok::<(), simdec::Error>(())
//! ```

mod halton;
mod lhs;

pub use halton::Halton;
pub use lhs::LatinHypercube;

use ndarray::{Array2, Axis};

use crate::error::{Error, Result};

/// A generator of points in `[0, 1)^d`.
pub trait Sampler {
    /// Number of dimensions of every point.
    fn dimensions(&self) -> usize;

    /// Draw the next `n` points as an (n × d) matrix.
    fn sample(&mut self, n: usize) -> Array2<f64>;
}

/// Map a unit-hypercube sample onto `[lower, upper)` per dimension.
///
/// # Errors
///
/// Returns an error if the bounds do not have one entry per column or if a
/// lower bound is not strictly below its upper bound.
pub fn scale(sample: &Array2<f64>, lower: &[f64], upper: &[f64]) -> Result<Array2<f64>> {
    let d = sample.ncols();
    if lower.len() != d || upper.len() != d {
        return Err(Error::dimension_mismatch(
            format!("{d} bounds"),
            format!("{} lower and {} upper bounds", lower.len(), upper.len()),
        ));
    }
    if let Some(k) = (0..d).find(|&k| !(lower[k] < upper[k])) {
        return Err(Error::invalid_params(format!(
            "lower bound {} is not below upper bound {} in dimension {k}",
            lower[k], upper[k]
        )));
    }

    let mut scaled = sample.clone();
    for (k, mut column) in scaled.axis_iter_mut(Axis(1)).enumerate() {
        let width = upper[k] - lower[k];
        column.mapv_inplace(|u| lower[k] + u * width);
    }
    Ok(scaled)
}

/// Centered L2 discrepancy (squared) of a sample of the unit hypercube.
///
/// Lower is more uniform.
///
/// # Errors
///
/// Returns an error if the sample is empty or has a point outside `[0, 1]^d`.
pub fn discrepancy(sample: &Array2<f64>) -> Result<f64> {
    let (n, d) = sample.dim();
    if n == 0 || d == 0 {
        return Err(Error::EmptyTable);
    }
    if sample.iter().any(|&u| !(0.0..=1.0).contains(&u)) {
        return Err(Error::invalid_params("sample is not within the unit hypercube"));
    }

    let centered = sample.mapv(|u| (u - 0.5).abs());

    let single: f64 = centered
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|&c| 1.0 + 0.5 * c - 0.5 * c * c).product::<f64>())
        .sum();

    let mut pairs = 0.0;
    for (i, ci) in centered.rows().into_iter().enumerate() {
        for (j, cj) in centered.rows().into_iter().enumerate() {
            let xi = sample.row(i);
            let xj = sample.row(j);
            pairs += (0..d)
                .map(|k| 1.0 + 0.5 * ci[k] + 0.5 * cj[k] - 0.5 * (xi[k] - xj[k]).abs())
                .product::<f64>();
        }
    }

    let n = n as f64;
    Ok((13.0f64 / 12.0).powi(d as i32) - 2.0 / n * single + pairs / (n * n))
}
