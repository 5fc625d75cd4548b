//! Decomposition configuration types.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::states::State;

/// Upper bound on automatically selected factors; more scenarios than
/// `2^5` stop being readable.
pub const MAX_DECOMPOSITION_FACTORS: usize = 5;

/// Summary statistic of the output computed within each scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Statistic {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Median, averaging the two middle samples for even counts.
    Median,
}

impl Statistic {
    /// Apply the statistic to the samples of one scenario.
    ///
    /// `None` for an empty scenario.
    #[must_use]
    pub fn compute(self, samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        match self {
            Self::Mean => Some(crate::stats::mean(samples)),
            Self::Median => crate::stats::median(samples),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            _ => Err(Error::UnknownStatistic {
                name: s.to_string(),
            }),
        }
    }
}

/// Configuration for a decomposition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecompositionConfig {
    /// Cumulative significance up to which factors are kept (default: 1.0).
    pub dec_limit: f64,
    /// Rank factors by significance and cut at `dec_limit` (default: true).
    /// When false, every factor of the table is used in column order.
    pub auto_ordering: bool,
    /// Explicit states of the selected factors, derived when `None`.
    pub states: Option<Vec<State>>,
    /// Statistic computed in each scenario (default: mean).
    pub statistic: Statistic,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            dec_limit: 1.0,
            auto_ordering: true,
            states: None,
            statistic: Statistic::Mean,
        }
    }
}
