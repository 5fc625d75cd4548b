//! Python bindings for simdec.
//!
//! This module exposes the significance and decomposition engines to Python
//! using PyO3. Enable the `python` feature to use this.
//!
//! Factor tables cross the boundary as lists of rows, one value per factor.

use ndarray::Array2;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::decomposition::{DecompositionConfig, DecompositionResult};
use crate::error::Error;
use crate::significance::SignificanceResult;
use crate::states::State;
use crate::table::FactorTable;

fn to_py_err(e: Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn factor_table(rows: Vec<Vec<f64>>, names: Option<Vec<String>>) -> PyResult<FactorTable> {
    let n_factors = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|r| r.len() != n_factors) {
        return Err(PyValueError::new_err(format!(
            "row {bad} has {} values, expected {n_factors}",
            rows[bad].len()
        )));
    }

    let names = names.unwrap_or_else(|| (0..n_factors).map(|k| format!("X{k}")).collect());
    let n_runs = rows.len();
    let data = Array2::from_shape_vec((n_runs, n_factors), rows.into_iter().flatten().collect())
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    FactorTable::from_array(names, data).map_err(to_py_err)
}

/// Python wrapper for SignificanceResult
#[pyclass(name = "SignificanceResult")]
pub struct PySignificanceResult {
    inner: SignificanceResult,
}

#[pymethods]
impl PySignificanceResult {
    /// Combined significance index of every factor.
    #[getter]
    fn si(&self) -> Vec<f64> {
        self.inner.si.to_vec()
    }

    /// First-order effects.
    #[getter]
    fn first_order(&self) -> Vec<f64> {
        self.inner.first_order.to_vec()
    }

    /// Second-order effects as a list of rows.
    #[getter]
    fn second_order(&self) -> Vec<Vec<f64>> {
        self.inner
            .second_order
            .rows()
            .into_iter()
            .map(|r| r.to_vec())
            .collect()
    }

    fn __repr__(&self) -> String {
        format!("SignificanceResult(si={:?})", self.inner.si.to_vec())
    }
}

/// Python wrapper for DecompositionResult
#[pyclass(name = "DecompositionResult")]
pub struct PyDecompositionResult {
    inner: DecompositionResult,
}

#[pymethods]
impl PyDecompositionResult {
    /// Names of the decomposed factors.
    #[getter]
    fn var_names(&self) -> Vec<String> {
        self.inner.var_names.clone()
    }

    /// Statistic of every scenario in flattened order, `None` when empty.
    #[getter]
    fn statistic(&self) -> Vec<Option<f64>> {
        self.inner.statistic_flat()
    }

    /// Shape of the statistic array.
    #[getter]
    fn shape(&self) -> Vec<usize> {
        self.inner.statistic.shape().to_vec()
    }

    /// Raw output samples of every scenario.
    #[getter]
    fn bins(&self) -> Vec<Vec<f64>> {
        self.inner.bins.iter().map(<[f64]>::to_vec).collect()
    }

    /// State labels of every decomposed factor.
    #[getter]
    fn states(&self) -> Vec<Vec<String>> {
        self.inner.states.iter().map(State::level_names).collect()
    }

    /// Bin edges of every decomposed factor.
    #[getter]
    fn bin_edges(&self) -> Vec<Vec<f64>> {
        self.inner.bin_edges.iter().map(<[f64]>::to_vec).collect()
    }
}

/// Compute significance indices.
#[pyfunction]
#[pyo3(signature = (inputs, output, names=None))]
fn significance(
    inputs: Vec<Vec<f64>>,
    output: Vec<f64>,
    names: Option<Vec<String>>,
) -> PyResult<PySignificanceResult> {
    let table = factor_table(inputs, names)?;
    let inner = crate::significance::significance(&table, &output).map_err(to_py_err)?;
    Ok(PySignificanceResult { inner })
}

/// Decompose the output into scenarios.
#[pyfunction]
#[pyo3(signature = (
    inputs,
    output,
    significance,
    names=None,
    dec_limit=1.0,
    auto_ordering=true,
    states=None,
    statistic="mean"
))]
#[allow(clippy::too_many_arguments)]
fn decomposition(
    inputs: Vec<Vec<f64>>,
    output: Vec<f64>,
    significance: Vec<f64>,
    names: Option<Vec<String>>,
    dec_limit: f64,
    auto_ordering: bool,
    states: Option<Vec<usize>>,
    statistic: &str,
) -> PyResult<PyDecompositionResult> {
    let config = DecompositionConfig {
        dec_limit,
        auto_ordering,
        states: states.map(|s| s.into_iter().map(State::Count).collect()),
        statistic: statistic.parse().map_err(to_py_err)?,
    };

    let table = factor_table(inputs, names)?;
    let inner = crate::decomposition::decompose(&table, &output, &significance, &config)
        .map_err(to_py_err)?;
    Ok(PyDecompositionResult { inner })
}

/// The simdec Python module.
#[pymodule]
fn simdec(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<PySignificanceResult>()?;
    m.add_class::<PyDecompositionResult>()?;
    m.add_function(wrap_pyfunction!(significance, m)?)?;
    m.add_function(wrap_pyfunction!(decomposition, m)?)?;
    Ok(())
}
