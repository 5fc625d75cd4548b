//! Significance engine: binned first- and second-order variance indices.
//!
//! The significance of a factor is the share of output variance explained
//! by binned conditional averages of the output:
//!
//! - **First order**: variance of the output averaged over equal-width bins
//!   of one factor, weighted by bin occupancy, divided by `Var(Y)`.
//! - **Second order**: the same on a square grid of two factors, minus both
//!   marginal contributions. Negative values are sampling artifacts and are
//!   clipped to zero.
//! - **Significance index**: `si[i] = first_order[i] + Σⱼ second_order[i, j] / 2`,
//!   each interaction being split evenly between its two factors.
//!
//! ## Quick Start
//!
//! ```rust
//! use simdec::{significance, FactorTable};
//!
//! // y depends on `a` only
//! let a: Vec<f64> = (0..2000).map(|i| f64::from(i) / 2000.0).collect();
//! let b: Vec<f64> = (0..2000).map(|i| f64::from((i * 37) % 2000) / 2000.0).collect();
//! let y: Vec<f64> = a.iter().map(|v| 3.0 * v).collect();
//!
//! let table = FactorTable::builder().numeric("a", a).numeric("b", b).build()?;
//! let res = significance(&table, &y)?;
//!
//! assert!(res.first_order[0] > 0.9);
//! assert!(res.first_order[1] < 0.1);
//! # Ok::<(), simdec::Error>(())
//! ```

mod binned;
mod bins;
mod ranking;

pub use bins::number_of_bins;
pub use ranking::{
    explained_variance, rank_factors, select_by_explained_variance, RankedFactor,
    DEFAULT_EXPLAINED_VARIANCE,
};

use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stats::variance;
use crate::table::FactorTable;
use crate::utils::factor_pairs;
use binned::{BinnedMeans, BinnedMeans2d};

/// Sum of `si` outside of which the UI ranks by first order instead.
const SI_PLAUSIBLE_RANGE: (f64, f64) = (0.01, 2.0);

/// Significance indices of every factor of a table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignificanceResult {
    /// Combined index: first order plus half of each interaction.
    pub si: Array1<f64>,
    /// First-order (main) effects. Not clipped, may exceed 1 from binning noise.
    pub first_order: Array1<f64>,
    /// Symmetric matrix of second-order (interaction) effects, zero diagonal,
    /// all entries ≥ 0.
    pub second_order: Array2<f64>,
}

impl SignificanceResult {
    /// Assemble the result from first-order effects and the raw upper
    /// triangle of second-order effects.
    pub(crate) fn assemble(
        first_order: Array1<f64>,
        upper: impl IntoIterator<Item = ((usize, usize), f64)>,
    ) -> Self {
        let k = first_order.len();
        let mut second_order = Array2::zeros((k, k));
        for ((i, j), value) in upper {
            let clipped = value.max(0.0);
            second_order[[i, j]] = clipped;
            second_order[[j, i]] = clipped;
        }

        let si = &first_order + &(second_order.sum_axis(Axis(1)) / 2.0);

        Self {
            si,
            first_order,
            second_order,
        }
    }

    /// Number of factors.
    #[must_use]
    pub fn n_factors(&self) -> usize {
        self.si.len()
    }

    /// Indices to rank factors by.
    ///
    /// `si` when its sum is plausible (strictly between 0.01 and 2), the
    /// first-order effects otherwise, e.g. when strong binning noise
    /// inflates the interaction terms.
    #[must_use]
    pub fn ranking_indices(&self) -> Array1<f64> {
        let total = self.si.sum();
        if total > SI_PLAUSIBLE_RANGE.0 && total < SI_PLAUSIBLE_RANGE.1 {
            self.si.clone()
        } else {
            self.first_order.clone()
        }
    }
}

/// Compute significance indices of every factor of `inputs` on `output`.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if `output` does not have one value per run
/// - [`Error::NonFiniteValue`] if `output` holds NaN or infinity
/// - [`Error::ConstantOutput`] if every output value is the same
///
/// A constant factor is not an error: all its samples fall in one bin and
/// its indices are zero.
pub fn significance(inputs: &FactorTable, output: &[f64]) -> Result<SignificanceResult> {
    let plan = SignificancePlan::new(inputs, output)?;

    let first_order: Array1<f64> = (0..plan.n_factors)
        .map(|i| plan.first_order(inputs.column(i), output))
        .collect();

    let upper: Vec<((usize, usize), f64)> = factor_pairs(plan.n_factors)
        .map(|(i, j)| {
            let value = plan.second_order(inputs.column(i), inputs.column(j), output);
            ((i, j), value)
        })
        .collect();

    Ok(SignificanceResult::assemble(first_order, upper))
}

/// Validated parameters shared by every index of one significance run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SignificancePlan {
    pub(crate) n_factors: usize,
    n_bins_foe: usize,
    n_bins_soe: usize,
    var_y: f64,
}

impl SignificancePlan {
    pub(crate) fn new(inputs: &FactorTable, output: &[f64]) -> Result<Self> {
        inputs.check_output(output)?;

        // a repeated inexact value still leaves a rounding-level variance
        let var_y = variance(output);
        if var_y <= 0.0 || output.iter().all(|&v| v == output[0]) {
            return Err(Error::ConstantOutput);
        }

        let n_factors = inputs.n_factors();
        let (n_bins_foe, n_bins_soe) = number_of_bins(inputs.runs(), n_factors);
        debug!(
            n_runs = inputs.runs(),
            n_factors, n_bins_foe, n_bins_soe, var_y, "significance bin counts"
        );

        Ok(Self {
            n_factors,
            n_bins_foe,
            n_bins_soe,
            var_y,
        })
    }

    pub(crate) fn first_order(&self, x: ArrayView1<'_, f64>, y: &[f64]) -> f64 {
        BinnedMeans::new(x, y, self.n_bins_foe).variance() / self.var_y
    }

    /// Raw (unclipped) second-order effect of a factor pair.
    pub(crate) fn second_order(
        &self,
        xi: ArrayView1<'_, f64>,
        xj: ArrayView1<'_, f64>,
        y: &[f64],
    ) -> f64 {
        let grid = BinnedMeans2d::new(xi, xj, y, self.n_bins_soe);
        (grid.joint_variance() - grid.row_variance() - grid.col_variance()) / self.var_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn grid_table(n: usize) -> (Vec<f64>, Vec<f64>) {
        let mut a = Vec::with_capacity(n * n);
        let mut b = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                a.push(i as f64 / (n - 1) as f64);
                b.push(j as f64 / (n - 1) as f64);
            }
        }
        (a, b)
    }

    #[test]
    fn test_assemble_clips_and_mirrors() {
        let res = SignificanceResult::assemble(
            array![0.2, 0.3, 0.1],
            vec![((0, 1), 0.1), ((0, 2), -0.05), ((1, 2), 0.3)],
        );

        assert_eq!(res.second_order[[0, 1]], 0.1);
        assert_eq!(res.second_order[[1, 0]], 0.1);
        assert_eq!(res.second_order[[0, 2]], 0.0);
        assert_eq!(res.second_order[[2, 0]], 0.0);
        assert_eq!(res.second_order[[2, 1]], 0.3);

        assert!((res.si[0] - 0.25).abs() < 1e-12);
        assert!((res.si[1] - 0.5).abs() < 1e-12);
        assert!((res.si[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_additive_output() {
        let (a, b) = grid_table(40);
        let y: Vec<f64> = a.iter().zip(&b).map(|(x, z)| x + 2.0 * z).collect();
        let table = FactorTable::builder()
            .numeric("a", a)
            .numeric("b", b)
            .build()
            .unwrap();

        let res = significance(&table, &y).unwrap();
        // var(a) : var(2b) = 1 : 4
        assert!((res.first_order[0] - 0.2).abs() < 0.02);
        assert!((res.first_order[1] - 0.8).abs() < 0.02);
        assert!(res.second_order[[0, 1]] < 0.01);
        assert!((res.si[0] - res.first_order[0]).abs() < 0.01);
    }

    #[test]
    fn test_interaction_is_shared() {
        let (a, b) = grid_table(40);
        // centered product: no main effects, pure interaction
        let y: Vec<f64> = a.iter().zip(&b).map(|(x, z)| (x - 0.5) * (z - 0.5)).collect();
        let table = FactorTable::builder()
            .numeric("a", a)
            .numeric("b", b)
            .build()
            .unwrap();

        let res = significance(&table, &y).unwrap();
        assert!(res.first_order[0] < 0.05);
        assert!(res.first_order[1] < 0.05);
        assert!(res.second_order[[0, 1]] > 0.5);
        assert_eq!(res.second_order[[0, 1]], res.second_order[[1, 0]]);
        assert!((res.si[0] - res.si[1]).abs() < 1e-12);
    }

    #[test]
    fn test_constant_factor_scores_zero() {
        let table = FactorTable::builder()
            .numeric("x", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
            .numeric("fixed", vec![7.0; 6])
            .build()
            .unwrap();
        let y = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

        let res = significance(&table, &y).unwrap();
        assert_eq!(res.first_order[1], 0.0);
        assert!(res.second_order[[0, 1]] >= 0.0);
    }

    #[test]
    fn test_constant_output_is_an_error() {
        let table = FactorTable::builder()
            .numeric("x", vec![0.0, 1.0, 2.0])
            .build()
            .unwrap();
        assert_eq!(
            significance(&table, &[4.0, 4.0, 4.0]),
            Err(Error::ConstantOutput)
        );
        assert_eq!(
            significance(&table, &[0.1, 0.1, 0.1]),
            Err(Error::ConstantOutput)
        );
    }

    #[test]
    fn test_output_length_mismatch() {
        let table = FactorTable::builder()
            .numeric("x", vec![0.0, 1.0, 2.0])
            .build()
            .unwrap();
        assert!(matches!(
            significance(&table, &[1.0, 2.0]),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_ranking_indices_fallback() {
        let plausible = SignificanceResult::assemble(array![0.3, 0.4], vec![((0, 1), 0.2)]);
        assert_eq!(plausible.ranking_indices(), plausible.si);

        let inflated = SignificanceResult::assemble(array![0.9, 0.8], vec![((0, 1), 0.6)]);
        assert_eq!(inflated.ranking_indices(), inflated.first_order);
    }
}
