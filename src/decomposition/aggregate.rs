//! Multi-dimensional binned aggregation of the output per scenario.

use std::collections::BTreeMap;

use ndarray::Array2;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::edges::BinSpec;
use super::types::Statistic;
use crate::table::FactorTable;

/// Raw output samples of every scenario, in flattened scenario order.
///
/// Holds exactly one (possibly empty) column per theoretically possible
/// scenario, so column `k` always lines up with statistic entry `k`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScenarioBins {
    columns: Vec<Vec<f64>>,
}

impl ScenarioBins {
    /// Lay out the non-empty groups on `n_scenarios` columns, leaving an
    /// empty column at the flattened position of every missing scenario.
    pub(crate) fn reconcile(groups: BTreeMap<usize, Vec<f64>>, n_scenarios: usize) -> Self {
        let mut columns = vec![Vec::new(); n_scenarios];
        let realized = groups.len();
        for (flat, samples) in groups {
            columns[flat] = samples;
        }

        if realized < n_scenarios {
            let missing: Vec<usize> = columns
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_empty())
                .map(|(k, _)| k)
                .collect();
            debug!(realized, n_scenarios, ?missing, "padded empty scenarios");
        }

        Self { columns }
    }

    /// Number of scenarios, empty ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether there is no scenario at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Samples of scenario `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k >= len()`.
    #[must_use]
    pub fn get(&self, k: usize) -> &[f64] {
        &self.columns[k]
    }

    /// Iterate over the samples of every scenario.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.columns.iter().map(Vec::as_slice)
    }

    /// Sample count of every scenario.
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        self.columns.iter().map(Vec::len).collect()
    }

    /// Number of scenarios without any sample.
    #[must_use]
    pub fn n_empty(&self) -> usize {
        self.columns.iter().filter(|c| c.is_empty()).count()
    }

    /// Total number of samples over all scenarios.
    #[must_use]
    pub fn total(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Rectangular (max count × scenarios) table, padded with `NaN`.
    #[must_use]
    pub fn to_padded_array(&self) -> Array2<f64> {
        let rows = self.columns.iter().map(Vec::len).max().unwrap_or(0);
        let mut table = Array2::from_elem((rows, self.columns.len()), f64::NAN);
        for (k, column) in self.columns.iter().enumerate() {
            for (r, &v) in column.iter().enumerate() {
                table[[r, k]] = v;
            }
        }
        table
    }
}

/// Per-scenario statistic and raw samples from a single pass over the runs.
#[derive(Debug, Clone)]
pub(crate) struct Aggregation {
    pub(crate) statistic: Vec<Option<f64>>,
    pub(crate) bins: ScenarioBins,
}

/// Assign every run to its scenario and summarize the output there.
pub(crate) fn aggregate(
    spec: &BinSpec,
    selected: &FactorTable,
    output: &[f64],
    statistic: Statistic,
) -> Aggregation {
    let mut groups: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for (row, &y) in selected.data().rows().into_iter().zip(output) {
        groups.entry(spec.locate(row)).or_default().push(y);
    }

    let bins = ScenarioBins::reconcile(groups, spec.n_scenarios());
    let statistic = bins.iter().map(|samples| statistic.compute(samples)).collect();

    Aggregation { statistic, bins }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_inserts_at_flat_position() {
        let mut groups = BTreeMap::new();
        groups.insert(0, vec![1.0]);
        groups.insert(3, vec![4.0, 5.0]);

        let bins = ScenarioBins::reconcile(groups, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.counts(), vec![1, 0, 0, 2]);
        assert_eq!(bins.get(3), &[4.0, 5.0]);
        assert_eq!(bins.n_empty(), 2);
        assert_eq!(bins.total(), 3);
    }

    #[test]
    fn test_padded_array() {
        let mut groups = BTreeMap::new();
        groups.insert(0, vec![1.0, 2.0]);
        groups.insert(2, vec![3.0]);
        let table = ScenarioBins::reconcile(groups, 3).to_padded_array();

        assert_eq!(table.dim(), (2, 3));
        assert_eq!(table[[1, 0]], 2.0);
        assert!(table[[0, 1]].is_nan());
        assert!(table[[1, 2]].is_nan());
    }

    #[test]
    fn test_aggregate_with_empty_scenario() {
        // the (high, low) corner is never sampled
        let selected = FactorTable::builder()
            .numeric("a", vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
            .numeric("b", vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0])
            .build()
            .unwrap();
        let output = [1.0, 3.0, 10.0, 20.0, 22.0, 24.0];
        let spec = BinSpec::equal_frequency(&selected, &[2, 2]).unwrap();

        let agg = aggregate(&spec, &selected, &output, Statistic::Mean);
        assert_eq!(agg.bins.counts(), vec![2, 1, 0, 3]);
        assert_eq!(agg.statistic, vec![Some(2.0), Some(10.0), None, Some(22.0)]);

        let agg = aggregate(&spec, &selected, &output, Statistic::Median);
        assert_eq!(agg.statistic[3], Some(22.0));
    }
}
