//! State model: how many discrete states each decomposed factor gets.
//!
//! A [`State`] is either an anonymous number of levels or an explicit list of
//! labels. It is resolved once here and then passed by value to the
//! decomposition engine and to whatever renders its results.
//!
//! Rules applied by [`derive_states`]:
//! 1. Default count: 3 states when fewer than 3 factors are decomposed,
//!    2 states otherwise, so the scenario count stays tractable.
//! 2. A factor with at most [`LOW_CARDINALITY_MAX`] distinct values gets
//!    exactly that many states; categorical factors then use their category
//!    labels instead of a count.
//!
//! [`states_expansion`] turns anonymous counts into display labels:
//! 2 → `low/high`, 3 → `low/medium/high`.

use std::fmt;

use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::table::FactorTable;

/// Distinct-value count at or below which a factor keeps its own levels.
pub const LOW_CARDINALITY_MAX: usize = 5;

const TWO_LEVELS: [&str; 2] = ["low", "high"];
const THREE_LEVELS: [&str; 3] = ["low", "medium", "high"];

/// Discretization of one factor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum State {
    /// Anonymous levels.
    Count(usize),
    /// Named levels, in bin order.
    Labels(Vec<String>),
}

impl State {
    /// Build a labelled state from anything string-like.
    #[must_use]
    pub fn labels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self::Labels(labels.into_iter().map(Into::into).collect())
    }

    /// Number of levels.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Count(n) => *n,
            Self::Labels(labels) => labels.len(),
        }
    }

    /// Label of every level, numbering anonymous levels from 0.
    ///
    /// Counts of 2 and 3 use the `low/high` and `low/medium/high` names.
    #[must_use]
    pub fn level_names(&self) -> Vec<String> {
        match self {
            Self::Labels(labels) => labels.clone(),
            Self::Count(2) => TWO_LEVELS.iter().map(|s| (*s).to_string()).collect(),
            Self::Count(3) => THREE_LEVELS.iter().map(|s| (*s).to_string()).collect(),
            Self::Count(n) => (0..*n).map(|i| i.to_string()).collect(),
        }
    }
}

impl From<usize> for State {
    fn from(n: usize) -> Self {
        Self::Count(n)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Labels(labels) => write!(f, "[{}]", labels.join(", ")),
        }
    }
}

/// Default number of states for a decomposition over `n_selected` factors.
#[must_use]
pub fn default_state_count(n_selected: usize) -> usize {
    if n_selected < 3 {
        3
    } else {
        2
    }
}

/// Derive the states of every factor of `selected`.
///
/// `selected` holds exactly the factors being decomposed, in decomposition
/// order; its width sets the default state count.
///
/// # Example
///
/// ```
/// use simdec::{derive_states, FactorTable, State};
///
/// let table = FactorTable::builder()
///     .numeric("x", (0..20).map(f64::from).collect())
///     .categorical("mode", &["b", "a"].repeat(10))
///     .build()
///     .unwrap();
///
/// let states = derive_states(&table);
/// assert_eq!(states, vec![State::Count(3), State::labels(["a", "b"])]);
/// ```
#[must_use]
pub fn derive_states(selected: &FactorTable) -> Vec<State> {
    let default = default_state_count(selected.n_factors());

    (0..selected.n_factors())
        .map(|i| {
            let distinct = selected.distinct_values(i);
            let state = if distinct.len() > LOW_CARDINALITY_MAX {
                State::Count(default)
            } else {
                match selected.factor(i).labels() {
                    Some(labels) => State::Labels(
                        distinct
                            .iter()
                            .filter_map(|&code| labels.get(code as usize).cloned())
                            .collect(),
                    ),
                    None => State::Count(distinct.len()),
                }
            };
            trace!(factor = %selected.factor(i).name, distinct = distinct.len(), %state, "derived state");
            state
        })
        .collect()
}

/// Replace anonymous counts by display labels where a convention exists.
///
/// Categorical factors whose count matches their number of categories get
/// the category labels; other counts of 2 and 3 become `low/high` and
/// `low/medium/high`. Any other count and every explicit label list are
/// kept as they are, so applying the expansion twice changes nothing.
///
/// # Errors
///
/// Returns [`Error::StatesMismatch`] if `states` and `inputs` do not
/// describe the same number of factors.
pub fn states_expansion(states: &[State], inputs: &FactorTable) -> Result<Vec<State>> {
    if states.len() != inputs.n_factors() {
        return Err(Error::StatesMismatch {
            expected: inputs.n_factors(),
            actual: states.len(),
        });
    }

    Ok(states
        .iter()
        .zip(inputs.factors())
        .map(|(state, factor)| match (state, factor.labels()) {
            (State::Labels(_), _) => state.clone(),
            (State::Count(n), Some(labels)) if labels.len() == *n => State::Labels(labels.to_vec()),
            (State::Count(2 | 3), _) => State::Labels(state.level_names()),
            (State::Count(_), _) => state.clone(),
        })
        .collect())
}
