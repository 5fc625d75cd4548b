//! Equal-width binned conditional averages of the output.

use ndarray::{Array2, ArrayView1};

use crate::stats::{mean, weighted_variance};

/// Equal-width partition of the observed range of one factor.
#[derive(Debug, Clone, Copy)]
struct EqualWidth {
    min: f64,
    scale: f64,
    n_bins: usize,
}

impl EqualWidth {
    fn new(values: ArrayView1<'_, f64>, n_bins: usize) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        // constant factor: every value lands in the first bin
        let scale = if span > 0.0 { n_bins as f64 / span } else { 0.0 };
        Self { min, scale, n_bins }
    }

    /// Bin of `x`; the maximum belongs to the last bin.
    fn index(&self, x: f64) -> usize {
        let pos = ((x - self.min) * self.scale).floor();
        if pos <= 0.0 {
            0
        } else {
            (pos as usize).min(self.n_bins - 1)
        }
    }
}

/// Output averages over equal-width bins of a single factor.
#[derive(Debug, Clone)]
pub(crate) struct BinnedMeans {
    sums: Vec<f64>,
    counts: Vec<f64>,
}

impl BinnedMeans {
    pub(crate) fn new(x: ArrayView1<'_, f64>, y: &[f64], n_bins: usize) -> Self {
        let binning = EqualWidth::new(x, n_bins);
        let mut sums = vec![0.0; n_bins];
        let mut counts = vec![0.0; n_bins];

        for (&xv, &yv) in x.iter().zip(y) {
            let b = binning.index(xv);
            sums[b] += yv;
            counts[b] += 1.0;
        }

        Self { sums, counts }
    }

    /// Count-weighted variance of the averages of the non-empty bins.
    pub(crate) fn variance(&self) -> f64 {
        let (avgs, weights): (Vec<f64>, Vec<f64>) = self
            .sums
            .iter()
            .zip(&self.counts)
            .filter(|(_, &c)| c > 0.0)
            .map(|(&s, &c)| (s / c, c))
            .unzip();
        weighted_variance(&avgs, &weights)
    }
}

/// Output averages over a square grid of equal-width bins of two factors.
#[derive(Debug, Clone)]
pub(crate) struct BinnedMeans2d {
    sums: Array2<f64>,
    counts: Array2<f64>,
}

impl BinnedMeans2d {
    pub(crate) fn new(
        xi: ArrayView1<'_, f64>,
        xj: ArrayView1<'_, f64>,
        y: &[f64],
        n_bins: usize,
    ) -> Self {
        let bin_i = EqualWidth::new(xi, n_bins);
        let bin_j = EqualWidth::new(xj, n_bins);
        let mut sums = Array2::zeros((n_bins, n_bins));
        let mut counts = Array2::zeros((n_bins, n_bins));

        for ((&a, &b), &yv) in xi.iter().zip(xj.iter()).zip(y) {
            let cell = [bin_i.index(a), bin_j.index(b)];
            sums[cell] += yv;
            counts[cell] += 1.0;
        }

        Self { sums, counts }
    }

    fn cell_mean(&self, r: usize, c: usize) -> Option<f64> {
        let n = self.counts[[r, c]];
        (n > 0.0).then(|| self.sums[[r, c]] / n)
    }

    /// Count-weighted variance of the averages of the non-empty cells.
    pub(crate) fn joint_variance(&self) -> f64 {
        let (avgs, weights): (Vec<f64>, Vec<f64>) = self
            .sums
            .iter()
            .zip(self.counts.iter())
            .filter(|(_, &c)| c > 0.0)
            .map(|(&s, &c)| (s / c, c))
            .unzip();
        weighted_variance(&avgs, &weights)
    }

    /// Weighted variance of the per-row mean of cell averages.
    ///
    /// Each row is summarized by the plain mean of its non-empty cell
    /// averages and weighted by the number of samples in that row.
    pub(crate) fn row_variance(&self) -> f64 {
        self.marginal_variance(false)
    }

    /// Same as [`row_variance`](Self::row_variance) along columns.
    pub(crate) fn col_variance(&self) -> f64 {
        self.marginal_variance(true)
    }

    fn marginal_variance(&self, by_column: bool) -> f64 {
        let n = self.counts.nrows();
        let mut avgs = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);

        for outer in 0..n {
            let mut cell_means = Vec::with_capacity(n);
            let mut occupancy = 0.0;
            for inner in 0..n {
                let (r, c) = if by_column { (inner, outer) } else { (outer, inner) };
                if let Some(m) = self.cell_mean(r, c) {
                    cell_means.push(m);
                    occupancy += self.counts[[r, c]];
                }
            }
            if !cell_means.is_empty() {
                avgs.push(mean(&cell_means));
                weights.push(occupancy);
            }
        }

        weighted_variance(&avgs, &weights)
    }
}
