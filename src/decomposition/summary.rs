//! Tabular summaries of a decomposition: one row per scenario and one row
//! per factor state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::DecompositionResult;
use crate::stats::sample_std;

/// Summary of one scenario.
///
/// Numeric cells are `None` when the scenario holds no sample (and `std`
/// also when it holds a single one).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScenarioRow {
    /// Display number, counting down from the number of scenarios.
    pub number: usize,
    /// State label of every decomposed factor.
    pub states: Vec<String>,
    /// Number of samples.
    pub count: usize,
    /// Sample standard deviation of the output.
    pub std: Option<f64>,
    /// Smallest output value.
    pub min: Option<f64>,
    /// Value of the configured statistic.
    pub statistic: Option<f64>,
    /// Largest output value.
    pub max: Option<f64>,
    /// Share of all runs falling in this scenario.
    pub probability: f64,
}

/// Bin range of one state of one factor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateRow {
    /// Factor name.
    pub variable: String,
    /// State label.
    pub state: String,
    /// Lower bin edge.
    pub min: f64,
    /// Upper bin edge.
    pub max: f64,
}

pub(crate) fn scenario_table(result: &DecompositionResult) -> Vec<ScenarioRow> {
    let levels: Vec<Vec<String>> = result.states.iter().map(|s| s.level_names()).collect();
    let counts: Vec<usize> = levels.iter().map(Vec::len).collect();
    let n_scenarios = result.n_scenarios();
    let total = result.bins.total().max(1) as f64;

    result
        .bins
        .iter()
        .zip(result.statistic.iter())
        .enumerate()
        .map(|(flat, (samples, &statistic))| {
            let states = unflatten(flat, &counts)
                .into_iter()
                .zip(&levels)
                .map(|(level, names)| names[level].clone())
                .collect();

            ScenarioRow {
                number: n_scenarios - flat,
                states,
                count: samples.len(),
                std: sample_std(samples),
                min: samples.iter().copied().reduce(f64::min),
                statistic,
                max: samples.iter().copied().reduce(f64::max),
                probability: samples.len() as f64 / total,
            }
        })
        .collect()
}

pub(crate) fn state_table(result: &DecompositionResult) -> Vec<StateRow> {
    result
        .var_names
        .iter()
        .zip(&result.states)
        .zip(result.bin_edges.iter())
        .flat_map(|((name, state), edges)| {
            state
                .level_names()
                .into_iter()
                .zip(edges.windows(2))
                .map(move |(label, w)| StateRow {
                    variable: name.clone(),
                    state: label,
                    min: w[0],
                    max: w[1],
                })
        })
        .collect()
}

/// Per-factor levels of a flattened scenario index, last factor fastest.
fn unflatten(mut flat: usize, counts: &[usize]) -> Vec<usize> {
    let mut levels = vec![0; counts.len()];
    for (level, &count) in levels.iter_mut().zip(counts).rev() {
        *level = flat % count;
        flat /= count;
    }
    levels
}
