//! Factor table: the simulated inputs of a decomposition.
//!
//! A [`FactorTable`] stores one column per factor and one row per simulation
//! run. Categorical factors are stored as integer codes (as `f64`) with the
//! original category labels kept alongside, so both engines can treat every
//! column numerically while the state model can still recover the labels.
//!
//! # Example
//!
//! ```
//! use simdec::FactorTable;
//!
//! let table = FactorTable::builder()
//!     .numeric("load", vec![1.0, 2.5, 3.0, 4.5])
//!     .categorical("material", &["steel", "alu", "steel", "alu"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.runs(), 4);
//! assert_eq!(table.n_factors(), 2);
//! // labels are factorized in lexical order
//! assert_eq!(table.factor(1).labels(), Some(&["alu".to_string(), "steel".to_string()][..]));
//! assert_eq!(table.column(1).to_vec(), vec![1.0, 0.0, 1.0, 0.0]);
//! ```

use ndarray::{Array2, ArrayView1, Axis};
use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the values of a factor should be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FactorKind {
    /// Continuous or discrete numeric values.
    Numeric,
    /// Integer codes `0..labels.len()` standing for the labels.
    Categorical {
        /// Category labels, indexed by code.
        labels: Vec<String>,
    },
}

/// Metadata of a single factor column.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Factor {
    /// Column name.
    pub name: String,
    /// Value interpretation.
    pub kind: FactorKind,
}

impl Factor {
    /// Whether the factor holds category codes.
    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, FactorKind::Categorical { .. })
    }

    /// Category labels of a categorical factor.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        match &self.kind {
            FactorKind::Categorical { labels } => Some(labels),
            FactorKind::Numeric => None,
        }
    }
}

/// Table of simulated input factors, shape (runs, factors).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactorTable {
    data: Array2<f64>,
    factors: Vec<Factor>,
}

impl FactorTable {
    /// Start building a table column by column.
    #[must_use]
    pub fn builder() -> FactorTableBuilder {
        FactorTableBuilder::default()
    }

    /// Create a table of numeric factors from a (runs × factors) matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of names does not match the number of
    /// columns, if the matrix is empty, if names repeat, or if any value is
    /// not finite.
    pub fn from_array<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        data: Array2<f64>,
    ) -> Result<Self> {
        let factors: Vec<Factor> = names
            .into_iter()
            .map(|name| Factor {
                name: name.into(),
                kind: FactorKind::Numeric,
            })
            .collect();

        if factors.len() != data.ncols() {
            return Err(Error::dimension_mismatch(
                format!("{} names", data.ncols()),
                format!("{} names", factors.len()),
            ));
        }

        Self::try_new(data, factors)
    }

    fn try_new(data: Array2<f64>, factors: Vec<Factor>) -> Result<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(Error::EmptyTable);
        }

        let mut seen = BTreeSet::new();
        for factor in &factors {
            if !seen.insert(factor.name.as_str()) {
                return Err(Error::invalid_params(format!(
                    "duplicate factor name '{}'",
                    factor.name
                )));
            }
        }

        for (col, factor) in data.axis_iter(Axis(1)).zip(&factors) {
            if let Some(row) = col.iter().position(|v| !v.is_finite()) {
                return Err(Error::NonFiniteValue {
                    column: factor.name.clone(),
                    row,
                });
            }
        }

        Ok(Self { data, factors })
    }

    /// Number of runs (rows).
    #[must_use]
    pub fn runs(&self) -> usize {
        self.data.nrows()
    }

    /// Number of factors (columns).
    #[must_use]
    pub fn n_factors(&self) -> usize {
        self.data.ncols()
    }

    /// The underlying (runs × factors) matrix.
    #[must_use]
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Values of factor `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_factors()`.
    #[must_use]
    pub fn column(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.column(index)
    }

    /// Metadata of factor `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_factors()`.
    #[must_use]
    pub fn factor(&self, index: usize) -> &Factor {
        &self.factors[index]
    }

    /// All factor metadata, in column order.
    #[must_use]
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Factor names, in column order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factors.iter().map(|f| f.name.as_str()).collect()
    }

    /// Column index of the factor called `name`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.factors
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| Error::UnknownFactor(name.to_string()))
    }

    /// Sorted distinct values of factor `index`.
    #[must_use]
    pub fn distinct_values(&self, index: usize) -> Vec<f64> {
        let mut values = self.column(index).to_vec();
        values.sort_by(f64::total_cmp);
        values.dedup();
        values
    }

    /// Build a new table holding the given columns, in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if `indices` is empty or refers to a missing column.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        if indices.is_empty() {
            return Err(Error::NoFactorsSelected);
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.n_factors()) {
            return Err(Error::TooManyFactors {
                factors: bad + 1,
                max: self.n_factors(),
            });
        }

        Ok(Self {
            data: self.data.select(Axis(1), indices),
            factors: indices.iter().map(|&i| self.factors[i].clone()).collect(),
        })
    }

    /// Check that `output` has one value per run and holds no NaN.
    pub(crate) fn check_output(&self, output: &[f64]) -> Result<()> {
        if output.len() != self.runs() {
            return Err(Error::dimension_mismatch(
                format!("{} output values", self.runs()),
                format!("{} output values", output.len()),
            ));
        }
        if let Some(row) = output.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteValue {
                column: "output".to_string(),
                row,
            });
        }
        Ok(())
    }
}

impl fmt::Display for FactorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.names().join("\t"))?;
        for row in self.data.rows() {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:.4}")).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

/// Column-wise builder for [`FactorTable`].
#[derive(Debug, Clone, Default)]
pub struct FactorTableBuilder {
    columns: Vec<(Factor, Vec<f64>)>,
}

impl FactorTableBuilder {
    /// Add a numeric factor.
    #[must_use]
    pub fn numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((
            Factor {
                name: name.into(),
                kind: FactorKind::Numeric,
            },
            values,
        ));
        self
    }

    /// Add a categorical factor; labels are factorized in lexical order.
    #[must_use]
    pub fn categorical<S: AsRef<str>>(mut self, name: impl Into<String>, values: &[S]) -> Self {
        let labels: Vec<String> = values
            .iter()
            .map(|v| v.as_ref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let codes = values
            .iter()
            .map(|v| {
                let code = labels
                    .binary_search_by(|l| l.as_str().cmp(v.as_ref()))
                    .unwrap_or_default();
                code as f64
            })
            .collect();

        self.columns.push((
            Factor {
                name: name.into(),
                kind: FactorKind::Categorical { labels },
            },
            codes,
        ));
        self
    }

    /// Build the table.
    ///
    /// # Errors
    ///
    /// Returns an error if no column was added, if columns have different
    /// lengths, if names repeat, or if any value is not finite.
    pub fn build(self) -> Result<FactorTable> {
        let runs = self.columns.first().map_or(0, |(_, v)| v.len());

        for (factor, values) in &self.columns {
            if values.len() != runs {
                return Err(Error::dimension_mismatch(
                    format!("{runs} values"),
                    format!("{} values in column '{}'", values.len(), factor.name),
                ));
            }
        }

        let mut data = Array2::zeros((runs, self.columns.len()));
        let mut factors = Vec::with_capacity(self.columns.len());
        for (j, (factor, values)) in self.columns.into_iter().enumerate() {
            for (i, v) in values.into_iter().enumerate() {
                data[[i, j]] = v;
            }
            factors.push(factor);
        }

        FactorTable::try_new(data, factors)
    }
}
