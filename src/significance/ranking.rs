//! Ranking of factors by significance and pre-selection for decomposition.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cumulative index reached by the default pre-selection.
pub const DEFAULT_EXPLAINED_VARIANCE: f64 = 0.8;

/// A factor and its index, as shown in a ranking table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankedFactor {
    /// Column index in the factor table.
    pub index: usize,
    /// Factor name.
    pub name: String,
    /// Significance index used for ranking.
    pub value: f64,
}

/// Rank factors by descending index. Ties keep column order.
///
/// # Example
///
/// ```
/// use simdec::significance::rank_factors;
///
/// let ranking = rank_factors(&["a", "b", "c"], &[0.1, 0.6, 0.3]);
/// let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
/// assert_eq!(names, ["b", "c", "a"]);
/// ```
#[must_use]
pub fn rank_factors<S: AsRef<str>>(names: &[S], indices: &[f64]) -> Vec<RankedFactor> {
    let mut ranking: Vec<RankedFactor> = names
        .iter()
        .zip(indices)
        .enumerate()
        .map(|(index, (name, &value))| RankedFactor {
            index,
            name: name.as_ref().to_string(),
            value,
        })
        .collect();
    ranking.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranking
}

/// Total variance ratio explained by `indices`.
///
/// Offset by machine epsilon so that a decomposition limit set to this value
/// still keeps the last factor under a strict comparison.
#[must_use]
pub fn explained_variance(indices: &[f64]) -> f64 {
    indices.iter().sum::<f64>() + f64::EPSILON
}

/// Leading factors of `ranking` needed to reach `threshold`.
///
/// Keeps every factor whose cumulative index stays at or below `threshold`
/// plus the one that crosses it. Returns the whole ranking when the
/// threshold is never crossed.
///
/// # Example
///
/// ```
/// use simdec::significance::{rank_factors, select_by_explained_variance};
///
/// let ranking = rank_factors(&["a", "b", "c", "d"], &[0.5, 0.28, 0.11, 0.04]);
/// let kept = select_by_explained_variance(&ranking, 0.8);
/// assert_eq!(kept.len(), 3);
/// ```
#[must_use]
pub fn select_by_explained_variance(ranking: &[RankedFactor], threshold: f64) -> Vec<RankedFactor> {
    let mut cumulative = 0.0;
    let below = ranking
        .iter()
        .take_while(|r| {
            cumulative += r.value;
            cumulative <= threshold
        })
        .count();
    ranking[..(below + 1).min(ranking.len())].to_vec()
}
