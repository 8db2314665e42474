//! Python bindings for treeedit
//!
//! Trees are passed in bracket notation; mappings come back with labels
//! resolved, deletions shown as `None`.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::cost::{EditCost, edit_cost, min_cost};
use crate::notation::{NotationError, parse_tree};
use crate::search::enumerate;
use crate::tree::Tree;

/// Convert NotationError to Python exception
impl From<NotationError> for PyErr {
    fn from(err: NotationError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[pyclass(name = "Mapping")]
#[derive(Clone)]
pub struct PyMapping {
    pairs: Vec<(String, Option<String>)>,
    cost: EditCost,
}

#[pymethods]
impl PyMapping {
    #[getter]
    fn pairs(&self) -> Vec<(String, Option<String>)> {
        self.pairs.clone()
    }

    #[getter]
    fn cost(&self) -> usize {
        self.cost.total()
    }

    #[getter]
    fn deletions(&self) -> usize {
        self.cost.deletions
    }

    #[getter]
    fn insertions(&self) -> usize {
        self.cost.insertions
    }

    #[getter]
    fn substitutions(&self) -> usize {
        self.cost.substitutions
    }

    fn __len__(&self) -> usize {
        self.pairs.len()
    }

    fn __repr__(&self) -> String {
        let pairs: Vec<String> = self
            .pairs
            .iter()
            .map(|(from, to)| format!("{}->{}", from, to.as_deref().unwrap_or("None")))
            .collect();
        format!("<Mapping cost={} [{}]>", self.cost.total(), pairs.join(", "))
    }
}

fn parse_pair(t1: &str, t2: &str) -> PyResult<(Tree, Tree)> {
    Ok((parse_tree(t1)?, parse_tree(t2)?))
}

/// Every mapping of `t1` onto `t2` in enumeration order
#[pyfunction]
fn enumerate_mappings(t1: &str, t2: &str) -> PyResult<Vec<PyMapping>> {
    let (t1, mut t2) = parse_pair(t1, t2)?;
    let result = enumerate(&t1, &mut t2);

    Ok(result
        .solutions
        .iter()
        .map(|mapping| PyMapping {
            pairs: mapping
                .iter()
                .map(|(v, w)| {
                    let to = (!t2.is_sentinel(w)).then(|| t2.label(w).to_string());
                    (t1.label(v).to_string(), to)
                })
                .collect(),
            cost: edit_cost(&t1, &t2, mapping),
        })
        .collect())
}

/// Minimum total edit cost over all mappings
#[pyfunction]
fn edit_distance(t1: &str, t2: &str) -> PyResult<usize> {
    let (t1, mut t2) = parse_pair(t1, t2)?;
    let result = enumerate(&t1, &mut t2);
    min_cost(&t1, &t2, &result.solutions)
        .map(|(_, cost)| cost.total())
        .ok_or_else(|| PyValueError::new_err("no mapping found"))
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn treeedit(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMapping>()?;

    m.add_function(wrap_pyfunction!(enumerate_mappings, m)?)?;
    m.add_function(wrap_pyfunction!(edit_distance, m)?)?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;

    Ok(())
}
