//! Parallel significance computation.
//!
//! This module provides a parallel version of [`significance`](crate::significance)
//! using Rayon. Enable with the `parallel` feature flag.
//!
//! Every first-order index and every factor pair of the second-order loop
//! is computed independently and written to its own cell, so the result is
//! bit-identical to the sequential version.
//!
//! # Usage
//!
//! ```ignore
//! use simdec::{par_significance, FactorTable};
//!
//! let res = par_significance(&table, &output)?;
//! assert_eq!(res.si.len(), table.n_factors());
//! ```
//!
//! # Performance
//!
//! Parallel computation pays off when there are many factor pairs or many
//! runs. For a handful of factors on a few thousand runs the sequential
//! version is usually faster.

use ndarray::Array1;
use rayon::prelude::*;

use crate::error::Result;
use crate::significance::{SignificancePlan, SignificanceResult};
use crate::table::FactorTable;
use crate::utils::factor_pairs;

/// Compute significance indices with the factor loops spread over threads.
///
/// # Errors
///
/// Same as [`significance`](crate::significance).
pub fn par_significance(inputs: &FactorTable, output: &[f64]) -> Result<SignificanceResult> {
    let plan = SignificancePlan::new(inputs, output)?;

    let first_order: Vec<f64> = (0..plan.n_factors)
        .into_par_iter()
        .map(|i| plan.first_order(inputs.column(i), output))
        .collect();

    let pairs: Vec<(usize, usize)> = factor_pairs(plan.n_factors).collect();
    let upper: Vec<((usize, usize), f64)> = pairs
        .into_par_iter()
        .map(|(i, j)| {
            let value = plan.second_order(inputs.column(i), inputs.column(j), output);
            ((i, j), value)
        })
        .collect();

    Ok(SignificanceResult::assemble(Array1::from(first_order), upper))
}
