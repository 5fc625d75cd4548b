//! Decomposition engine: partition the output into scenarios.
//!
//! A decomposition picks the most significant factors, cuts each of them
//! into a few equal-frequency states and summarizes the output within every
//! combination of states (a *scenario*). The steps are:
//!
//! 1. **Variable selection**: factors sorted by significance, descending,
//!    keeping those whose cumulative significance stays below `dec_limit`
//!    plus the one crossing it, between 1 and
//!    [`MAX_DECOMPOSITION_FACTORS`] factors.
//! 2. **States**: supplied by the caller or derived with
//!    [`derive_states`](crate::states::derive_states).
//! 3. **Binning**: equal-frequency edges per factor, see [`BinSpec`].
//! 4. **Aggregation**: one pass over the runs that yields both the
//!    statistic and the raw samples of every scenario. Scenarios without
//!    samples keep a `None` statistic and an empty bin at their own
//!    flattened position.
//!
//! # Example
//!
//! ```
//! use simdec::{Decomposition, FactorTable, Statistic};
//!
//! let x: Vec<f64> = (0..90).map(f64::from).collect();
//! let z: Vec<f64> = (0..90).map(|i| f64::from((i * 7) % 90)).collect();
//! let y: Vec<f64> = x.iter().zip(&z).map(|(a, b)| a + 0.1 * b).collect();
//! let table = FactorTable::builder().numeric("x", x).numeric("z", z).build()?;
//!
//! let result = Decomposition::new()
//!     .dec_limit(0.8)
//!     .statistic(Statistic::Median)
//!     .run(&table, &y, &[0.9, 0.1])?;
//!
//! assert_eq!(result.var_names, vec!["x".to_string()]);
//! assert_eq!(result.statistic.shape(), &[3]);
//! assert_eq!(result.bins.len(), 3);
//! # Ok::<(), simdec::Error>(())
//! ```

mod aggregate;
mod edges;
mod summary;
mod types;

pub use aggregate::ScenarioBins;
pub use edges::{BinSpec, EDGE_JITTER};
pub use summary::{ScenarioRow, StateRow};
pub use types::{DecompositionConfig, Statistic, MAX_DECOMPOSITION_FACTORS};

use ndarray::{ArrayD, IxDyn};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::states::{derive_states, State};
use crate::table::FactorTable;

/// Outcome of a decomposition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecompositionResult {
    /// Names of the decomposed factors, in decomposition order.
    pub var_names: Vec<String>,
    /// Statistic of every scenario, shape = state count of each factor.
    /// `None` where no run falls in the scenario.
    pub statistic: ArrayD<Option<f64>>,
    /// Raw output samples of every scenario, in flattened order.
    pub bins: ScenarioBins,
    /// States of every decomposed factor.
    pub states: Vec<State>,
    /// Realized bin edges of every decomposed factor.
    pub bin_edges: BinSpec,
}

impl DecompositionResult {
    /// Number of decomposed factors.
    #[must_use]
    pub fn n_factors(&self) -> usize {
        self.var_names.len()
    }

    /// Number of scenarios, empty ones included.
    #[must_use]
    pub fn n_scenarios(&self) -> usize {
        self.statistic.len()
    }

    /// State count of every decomposed factor.
    #[must_use]
    pub fn state_counts(&self) -> Vec<usize> {
        self.states.iter().map(State::count).collect()
    }

    /// Statistic in flattened scenario order, matching [`Self::bins`].
    #[must_use]
    pub fn statistic_flat(&self) -> Vec<Option<f64>> {
        self.statistic.iter().copied().collect()
    }

    /// One summary row per scenario, in flattened order.
    #[must_use]
    pub fn scenario_table(&self) -> Vec<ScenarioRow> {
        summary::scenario_table(self)
    }

    /// Bin range of every state of every decomposed factor.
    #[must_use]
    pub fn state_table(&self) -> Vec<StateRow> {
        summary::state_table(self)
    }
}

/// Pick the factors to decompose, as column indices in decomposition order.
///
/// With `auto_ordering`, factors are sorted by `indices` descending (ties
/// keep column order) and kept while their cumulative index is below
/// `dec_limit`; the factor crossing the limit is kept too. The count is
/// bounded to `1..=MAX_DECOMPOSITION_FACTORS`. Without it, every factor is
/// used in column order.
///
/// # Example
///
/// ```
/// use simdec::decomposition::select_factors;
///
/// let si = [0.1, 0.5, 0.3, 0.05];
/// assert_eq!(select_factors(&si, 0.7, true), vec![1, 2]);
/// assert_eq!(select_factors(&si, 0.2, true), vec![1]);
/// assert_eq!(select_factors(&si, 0.2, false), vec![0, 1, 2, 3]);
/// ```
#[must_use]
pub fn select_factors(indices: &[f64], dec_limit: f64, auto_ordering: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..indices.len()).collect();
    if !auto_ordering {
        return order;
    }

    order.sort_by(|&a, &b| indices[b].total_cmp(&indices[a]));

    let mut cumulative = 0.0;
    let below = order
        .iter()
        .take_while(|&&i| {
            cumulative += indices[i];
            cumulative < dec_limit
        })
        .count();
    let crossing = usize::from(below < order.len());

    let n = (below + crossing)
        .clamp(1, MAX_DECOMPOSITION_FACTORS)
        .min(order.len());
    order.truncate(n);
    order
}

/// Decompose `output` into scenarios of the most significant factors.
///
/// `significance_indices` holds one index per column of `inputs`, usually
/// [`SignificanceResult::si`](crate::SignificanceResult::si).
///
/// # Errors
///
/// Everything is validated before any binning:
/// - [`Error::InvalidParams`] if `dec_limit` is not a positive number or a
///   state count cannot be binned
/// - [`Error::DimensionMismatch`] if `significance_indices` or `output` is
///   not aligned with `inputs`
/// - [`Error::NonFiniteValue`] if `significance_indices` or `output` holds
///   NaN or infinity
/// - [`Error::NoFactorsSelected`] if no factor is left to decompose on
/// - [`Error::StatesMismatch`] if explicit states do not match the selection
pub fn decompose(
    inputs: &FactorTable,
    output: &[f64],
    significance_indices: &[f64],
    config: &DecompositionConfig,
) -> Result<DecompositionResult> {
    if !(config.dec_limit.is_finite() && config.dec_limit > 0.0) {
        return Err(Error::invalid_params(format!(
            "dec_limit must be a positive number, got {}",
            config.dec_limit
        )));
    }
    if significance_indices.len() != inputs.n_factors() {
        return Err(Error::dimension_mismatch(
            format!("{} significance indices", inputs.n_factors()),
            format!("{} significance indices", significance_indices.len()),
        ));
    }
    if let Some(row) = significance_indices.iter().position(|v| !v.is_finite()) {
        return Err(Error::NonFiniteValue {
            column: "significance".to_string(),
            row,
        });
    }
    inputs.check_output(output)?;

    let order = select_factors(significance_indices, config.dec_limit, config.auto_ordering);
    let selected = inputs.select(&order)?;
    debug!(
        selected = ?selected.names(),
        auto_ordering = config.auto_ordering,
        dec_limit = config.dec_limit,
        "selected factors"
    );

    let states = match &config.states {
        Some(states) if states.len() != selected.n_factors() => {
            return Err(Error::StatesMismatch {
                expected: selected.n_factors(),
                actual: states.len(),
            });
        }
        Some(states) => states.clone(),
        None => derive_states(&selected),
    };
    let state_counts: Vec<usize> = states.iter().map(State::count).collect();

    let bin_edges = BinSpec::equal_frequency(&selected, &state_counts)?;
    let aggregation = aggregate::aggregate(&bin_edges, &selected, output, config.statistic);

    let statistic = ArrayD::from_shape_vec(IxDyn(&state_counts), aggregation.statistic)
        .map_err(|e| Error::invalid_params(format!("scenario layout: {e}")))?;

    Ok(DecompositionResult {
        var_names: selected.names().into_iter().map(str::to_string).collect(),
        statistic,
        bins: aggregation.bins,
        states,
        bin_edges,
    })
}

/// Builder for a decomposition.
///
/// # Example
///
/// ```
/// use simdec::{Decomposition, FactorTable, State};
///
/// let table = FactorTable::builder()
///     .numeric("a", (0..40).map(f64::from).collect())
///     .numeric("b", (0..40).map(|i| f64::from(i % 8)).collect())
///     .build()?;
/// let y: Vec<f64> = (0..40).map(|i| f64::from(i * i)).collect();
///
/// let result = Decomposition::new()
///     .auto_ordering(false)
///     .states(vec![State::Count(4), State::Count(2)])
///     .run(&table, &y, &[0.7, 0.2])?;
///
/// assert_eq!(result.var_names, vec!["a".to_string(), "b".to_string()]);
/// assert_eq!(result.n_scenarios(), 8);
/// # Ok::<(), simdec::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decomposition {
    config: DecompositionConfig,
}

impl Decomposition {
    /// Create a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    #[must_use]
    pub fn with_config(config: DecompositionConfig) -> Self {
        Self { config }
    }

    /// Set the cumulative significance limit.
    #[must_use]
    pub fn dec_limit(mut self, dec_limit: f64) -> Self {
        self.config.dec_limit = dec_limit;
        self
    }

    /// Enable or disable ranking and cutting of the factors.
    #[must_use]
    pub fn auto_ordering(mut self, auto_ordering: bool) -> Self {
        self.config.auto_ordering = auto_ordering;
        self
    }

    /// Use explicit states for the selected factors.
    #[must_use]
    pub fn states(mut self, states: Vec<State>) -> Self {
        self.config.states = Some(states);
        self
    }

    /// Set the statistic computed in each scenario.
    #[must_use]
    pub fn statistic(mut self, statistic: Statistic) -> Self {
        self.config.statistic = statistic;
        self
    }

    /// The configuration built so far.
    #[must_use]
    pub fn config(&self) -> &DecompositionConfig {
        &self.config
    }

    /// Run the decomposition.
    ///
    /// # Errors
    ///
    /// See [`decompose`].
    pub fn run(
        &self,
        inputs: &FactorTable,
        output: &[f64],
        significance_indices: &[f64],
    ) -> Result<DecompositionResult> {
        decompose(inputs, output, significance_indices, &self.config)
    }
}
