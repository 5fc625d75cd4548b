//! Error types for the simdec library.
//!
//! This module provides error handling using the `thiserror` crate, with
//! variants grouped by how the caller is expected to react: configuration
//! errors, shape/alignment errors and input data validation errors.
//!
//! Numerical degeneracies (empty bins, constant factors) are not errors. They
//! are resolved inside the engines and surface as explicit `None` cells or
//! zero indices in the results.

use thiserror::Error;

/// The main error type for the simdec library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ============ Configuration Errors ============
    /// The requested summary statistic is not supported.
    #[error("unknown statistic '{name}' (expected 'mean' or 'median')")]
    UnknownStatistic {
        /// The rejected statistic name.
        name: String,
    },

    /// A parameter has an invalid value.
    #[error("invalid parameters: {message}")]
    InvalidParams {
        /// Description of what is invalid.
        message: String,
    },

    /// Variable selection produced no factor to decompose on.
    #[error("no factor selected for decomposition")]
    NoFactorsSelected,

    /// Every output value is the same, so no index is defined.
    #[error("output is constant, significance indices are undefined")]
    ConstantOutput,

    // ============ Shape Errors ============
    /// Two inputs that must be aligned have different sizes.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension description.
        expected: String,
        /// Actual dimension description.
        actual: String,
    },

    /// More factors were requested than the table holds.
    #[error("{factors} factors requested but only {max} available")]
    TooManyFactors {
        /// Requested number of factors.
        factors: usize,
        /// Number of factors available.
        max: usize,
    },

    /// A factor name does not exist in the table.
    #[error("unknown factor '{0}'")]
    UnknownFactor(String),

    /// Explicit states were supplied for the wrong number of factors.
    #[error("states given for {actual} factors, but {expected} factors are selected")]
    StatesMismatch {
        /// Number of selected factors.
        expected: usize,
        /// Number of state entries supplied.
        actual: usize,
    },

    // ============ Data Errors ============
    /// The factor table or the output holds a NaN or infinite value.
    #[error("non-finite value in column '{column}' at row {row}")]
    NonFiniteValue {
        /// Column holding the value.
        column: String,
        /// Row of the value.
        row: usize,
    },

    /// The factor table has no runs or no factors.
    #[error("factor table is empty")]
    EmptyTable,
}

/// A specialized `Result` type for simdec operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `InvalidParams` error.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Create a new `DimensionMismatch` error.
    #[must_use]
    pub fn dimension_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Whether the error comes from caller configuration rather than data shape.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownStatistic { .. }
                | Self::InvalidParams { .. }
                | Self::NoFactorsSelected
                | Self::ConstantOutput
        )
    }
}
