//! Equal-frequency bin edges of the decomposed factors.

use ndarray::ArrayView1;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::table::FactorTable;
use crate::utils::scenario_count;

/// Relative offset separating edges that would otherwise coincide.
pub const EDGE_JITTER: f64 = 1e-10;

/// Realized bin edges of every decomposed factor.
///
/// Factor `d` with `s` states has `s + 1` strictly increasing edges. Bin `k`
/// is `[edges[k], edges[k + 1])`, the last bin also holds its upper edge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinSpec {
    edges: Vec<Vec<f64>>,
}

impl BinSpec {
    /// Equal-frequency edges for each column of `selected`.
    ///
    /// # Errors
    ///
    /// Returns an error if `state_counts` does not match the number of
    /// columns, if a count is zero or larger than the number of runs, or if
    /// the scenario count overflows.
    pub fn equal_frequency(selected: &FactorTable, state_counts: &[usize]) -> Result<Self> {
        if state_counts.len() != selected.n_factors() {
            return Err(Error::StatesMismatch {
                expected: selected.n_factors(),
                actual: state_counts.len(),
            });
        }
        for (factor, &count) in selected.factors().iter().zip(state_counts) {
            if count == 0 || count > selected.runs() {
                return Err(Error::invalid_params(format!(
                    "factor '{}' needs between 1 and {} states, got {count}",
                    factor.name,
                    selected.runs()
                )));
            }
        }
        if scenario_count(state_counts).is_none() {
            return Err(Error::invalid_params("number of scenarios overflows"));
        }

        let edges = state_counts
            .iter()
            .enumerate()
            .map(|(d, &count)| equal_frequency_edges(selected.column(d), count))
            .collect();

        Ok(Self { edges })
    }

    /// Number of decomposed factors.
    #[must_use]
    pub fn n_factors(&self) -> usize {
        self.edges.len()
    }

    /// Edges of factor `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d >= n_factors()`.
    #[must_use]
    pub fn edges(&self, d: usize) -> &[f64] {
        &self.edges[d]
    }

    /// Iterate over the edges of every factor.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.edges.iter().map(Vec::as_slice)
    }

    /// Number of states of every factor.
    #[must_use]
    pub fn state_counts(&self) -> Vec<usize> {
        self.edges.iter().map(|e| e.len() - 1).collect()
    }

    /// Number of theoretically possible scenarios.
    #[must_use]
    pub fn n_scenarios(&self) -> usize {
        self.edges.iter().map(|e| e.len() - 1).product()
    }

    /// Flattened scenario index of one run, last factor varying fastest.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `row` does not have one value per factor.
    #[must_use]
    pub fn locate(&self, row: ArrayView1<'_, f64>) -> usize {
        debug_assert_eq!(row.len(), self.edges.len());
        self.edges
            .iter()
            .zip(row.iter())
            .fold(0, |flat, (edges, &x)| {
                flat * (edges.len() - 1) + bin_index(edges, x)
            })
    }
}

/// Bin of `x` among half-open `edges`; the top edge closes the last bin.
fn bin_index(edges: &[f64], x: f64) -> usize {
    let n_bins = edges.len() - 1;
    if x >= edges[n_bins] {
        return n_bins - 1;
    }
    edges.partition_point(|&e| e <= x).saturating_sub(1)
}

/// Edges splitting the sorted values into `count` groups of near-equal size.
///
/// The first value of each group is a lower edge and the maximum is the last
/// edge. A lower edge that would repeat the previous one moves up to the next
/// distinct value, so a repeated value never straddles two states. When there
/// are no more distinct values than states, every distinct value is a lower
/// edge and level `k` is state `k`. Each lower edge is then lowered by a
/// vanishing, strictly increasing offset, which keeps the edges strictly
/// increasing once the distinct values run out.
fn equal_frequency_edges(values: ArrayView1<'_, f64>, count: usize) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let max = sorted[n - 1];

    let mut distinct = sorted.clone();
    distinct.dedup();

    let mut edges: Vec<f64> = if distinct.len() <= count {
        distinct.resize(count, max);
        distinct
    } else {
        let (base, extra) = (n / count, n % count);
        let mut edges: Vec<f64> = Vec::with_capacity(count + 1);
        for k in 0..count {
            // groups before `extra` hold one value more
            let start = sorted[k * base + k.min(extra)];
            let edge = match edges.last() {
                Some(&prev) if start <= prev => {
                    let next = sorted.partition_point(|&v| v <= prev);
                    sorted.get(next).copied().unwrap_or(max)
                }
                _ => start,
            };
            edges.push(edge);
        }
        edges
    };
    edges.push(max);

    let scale = sorted[0].abs().max(max.abs()).max(1.0);
    for (k, edge) in edges.iter_mut().enumerate() {
        *edge += (k as f64 - count as f64) * EDGE_JITTER * scale;
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn table(columns: &[(&str, Vec<f64>)]) -> FactorTable {
        columns
            .iter()
            .fold(FactorTable::builder(), |b, (name, values)| {
                b.numeric(*name, values.clone())
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_equal_frequency_groups() {
        let values = array![5.0, 1.0, 4.0, 2.0, 3.0, 6.0, 7.0];
        let edges = equal_frequency_edges(values.view(), 3);

        // groups [1 2 3] [4 5] [6 7]
        assert_eq!(edges.len(), 4);
        assert!((edges[0] - 1.0).abs() < 1e-8);
        assert!((edges[1] - 4.0).abs() < 1e-8);
        assert!((edges[2] - 6.0).abs() < 1e-8);
        assert_eq!(edges[3], 7.0);
        assert!(edges[0] < 1.0);
    }

    #[test]
    fn test_edges_strictly_increasing_with_ties() {
        let values = array![1.0, 1.0, 1.0, 1.0, 2.0, 2.0];
        let edges = equal_frequency_edges(values.view(), 3);

        assert!(edges.windows(2).all(|w| w[0] < w[1]), "{edges:?}");
        // two levels for three states leave the middle bin empty
        assert_eq!(bin_index(&edges, 1.0), 0);
        assert_eq!(bin_index(&edges, 2.0), 2);
    }

    #[test]
    fn test_tied_boundary_stays_in_lower_group() {
        let values = array![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let edges = equal_frequency_edges(values.view(), 2);

        assert!((edges[1] - 1.0).abs() < 1e-8, "{edges:?}");
        assert_eq!(bin_index(&edges, 0.0), 0);
        assert_eq!(bin_index(&edges, 1.0), 1);
    }

    #[test]
    fn test_one_state_per_level() {
        // levels 0, 1 and 2 seen 8, 1 and 1 times
        let values = array![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0];
        let edges = equal_frequency_edges(values.view(), 3);

        assert!(edges.windows(2).all(|w| w[0] < w[1]), "{edges:?}");
        assert_eq!(bin_index(&edges, 0.0), 0);
        assert_eq!(bin_index(&edges, 1.0), 1);
        assert_eq!(bin_index(&edges, 2.0), 2);

        let values = array![0.0, 1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0];
        let edges = equal_frequency_edges(values.view(), 3);
        assert_eq!(bin_index(&edges, 0.0), 0);
        assert_eq!(bin_index(&edges, 1.0), 1);
        assert_eq!(bin_index(&edges, 2.0), 2);
    }

    #[test]
    fn test_ties_on_large_magnitudes() {
        let values = array![1e9, 1e9, 1e9, 2e9];
        let edges = equal_frequency_edges(values.view(), 2);
        assert!(edges.windows(2).all(|w| w[0] < w[1]), "{edges:?}");
    }

    #[test]
    fn test_bin_index_bounds() {
        let edges = [0.0, 1.0, 2.0];
        assert_eq!(bin_index(&edges, 0.0), 0);
        assert_eq!(bin_index(&edges, 0.999), 0);
        assert_eq!(bin_index(&edges, 1.0), 1);
        assert_eq!(bin_index(&edges, 2.0), 1);
    }

    #[test]
    fn test_locate_row_major() {
        let t = table(&[
            ("a", vec![0.0, 0.0, 1.0, 1.0]),
            ("b", vec![0.0, 1.0, 0.0, 1.0]),
        ]);
        let spec = BinSpec::equal_frequency(&t, &[2, 2]).unwrap();

        assert_eq!(spec.state_counts(), vec![2, 2]);
        assert_eq!(spec.n_scenarios(), 4);
        let flat: Vec<usize> = t.data().rows().into_iter().map(|r| spec.locate(r)).collect();
        assert_eq!(flat, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_coverage() {
        let values: Vec<f64> = (0..37).map(|i| f64::from(i).sin() * 10.0).collect();
        let t = table(&[("x", values.clone())]);
        let spec = BinSpec::equal_frequency(&t, &[4]).unwrap();
        let edges = spec.edges(0);

        for v in values {
            assert!(edges[0] <= v && v <= edges[edges.len() - 1]);
        }
    }

    #[test]
    fn test_invalid_counts() {
        let t = table(&[("x", vec![1.0, 2.0, 3.0])]);
        assert!(matches!(
            BinSpec::equal_frequency(&t, &[0]),
            Err(Error::InvalidParams { .. })
        ));
        assert!(matches!(
            BinSpec::equal_frequency(&t, &[4]),
            Err(Error::InvalidParams { .. })
        ));
        assert!(matches!(
            BinSpec::equal_frequency(&t, &[2, 2]),
            Err(Error::StatesMismatch { .. })
        ));
    }
}
