//! Halton low-discrepancy sequence.

use ndarray::Array2;

use super::Sampler;
use crate::error::{Error, Result};
use crate::utils::first_primes;

/// Halton sequence: dimension `k` is the radical inverse of the point index
/// in the `k`-th prime base.
///
/// The sequence is deterministic and starts at the origin. Successive calls
/// to [`Sampler::sample`] continue where the previous call stopped.
///
/// # Example
///
/// ```
/// use simdec::sampling::{Halton, Sampler};
///
/// let mut halton = Halton::new(2)?;
/// let points = halton.sample(4);
///
/// assert_eq!(points[[1, 0]], 0.5);
/// assert_eq!(points[[3, 0]], 0.75);
/// assert!((points[[3, 1]] - 1.0 / 9.0).abs() < 1e-15);
/// # Ok::<(), simdec::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Halton {
    bases: Vec<u32>,
    index: u64,
}

impl Halton {
    /// Create a sequence over `dimensions` dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if `dimensions` is zero.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::invalid_params("Halton sequence needs at least one dimension"));
        }
        Ok(Self {
            bases: first_primes(dimensions),
            index: 0,
        })
    }

    /// Skip the first `n` points of the sequence.
    #[must_use]
    pub fn skip(mut self, n: u64) -> Self {
        self.index += n;
        self
    }

    /// Prime base of every dimension.
    #[must_use]
    pub fn bases(&self) -> &[u32] {
        &self.bases
    }
}

impl Sampler for Halton {
    fn dimensions(&self) -> usize {
        self.bases.len()
    }

    fn sample(&mut self, n: usize) -> Array2<f64> {
        let start = self.index;
        self.index += n as u64;

        Array2::from_shape_fn((n, self.bases.len()), |(i, k)| {
            radical_inverse(start + i as u64, self.bases[k])
        })
    }
}

/// Mirror the base-`base` digits of `i` around the radix point.
fn radical_inverse(mut i: u64, base: u32) -> f64 {
    let b = u64::from(base);
    let inv = 1.0 / f64::from(base);
    let mut factor = inv;
    let mut value = 0.0;
    while i > 0 {
        value += (i % b) as f64 * factor;
        i /= b;
        factor *= inv;
    }
    value
}
