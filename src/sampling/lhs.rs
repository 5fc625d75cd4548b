//! Latin hypercube sampling.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::Sampler;
use crate::error::{Error, Result};

/// Latin hypercube: each dimension of an `n`-point sample holds exactly one
/// point in each of the `n` equal-width strata of `[0, 1)`.
///
/// Seeded, so the same seed always yields the same samples.
#[derive(Debug, Clone)]
pub struct LatinHypercube {
    dimensions: usize,
    rng: StdRng,
}

impl LatinHypercube {
    /// Create a sampler over `dimensions` dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if `dimensions` is zero.
    pub fn new(dimensions: usize, seed: u64) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::invalid_params("Latin hypercube needs at least one dimension"));
        }
        Ok(Self {
            dimensions,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl Sampler for LatinHypercube {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn sample(&mut self, n: usize) -> Array2<f64> {
        let mut points = Array2::zeros((n, self.dimensions));
        let width = 1.0 / n as f64;
        let mut strata: Vec<usize> = (0..n).collect();

        for mut column in points.columns_mut() {
            strata.shuffle(&mut self.rng);
            for (value, &stratum) in column.iter_mut().zip(&strata) {
                let jitter: f64 = self.rng.gen();
                *value = ((stratum as f64 + jitter) * width).min(1.0 - f64::EPSILON);
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_point_per_stratum() {
        let n = 50;
        let points = LatinHypercube::new(3, 7).unwrap().sample(n);
        assert_eq!(points.dim(), (n, 3));

        for column in points.columns() {
            let mut strata: Vec<usize> = column.iter().map(|&u| (u * n as f64) as usize).collect();
            strata.sort_unstable();
            assert_eq!(strata, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_seeded() {
        let a = LatinHypercube::new(2, 42).unwrap().sample(20);
        let b = LatinHypercube::new(2, 42).unwrap().sample(20);
        let c = LatinHypercube::new(2, 43).unwrap().sample(20);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(LatinHypercube::new(0, 1).is_err());
    }
}
