//! Design matrix, regressand vector and weight vector extraction.
//!
//! All three are read for the rows chosen by the selector. A selected row is
//! known to be complete, so a missing cell here means the source changed
//! between selection and extraction; it is reported as a data-access fault.

use std::fmt::Debug;
use std::hash::Hash;

use nalgebra::{DMatrix, DVector};

use crate::data::TableSource;
use crate::data::source::finite_value;
use crate::domain::RegressionModel;
use crate::error::{RegressionError, Result};
use crate::fit::observations::raw_weight;

/// `X` (n×p): row `i` holds the regressor cells of `rows[i]` in regressor order.
pub fn design_matrix<R, K, S>(model: &RegressionModel<K>, source: &S, rows: &[R]) -> Result<DMatrix<f64>>
where
    R: Debug,
    K: Clone + Eq + Hash + Debug,
    S: TableSource<R, K> + ?Sized,
{
    let p = model.regressor_count();
    let mut x = DMatrix::zeros(rows.len(), p);
    for (i, row) in rows.iter().enumerate() {
        for (j, key) in model.regressors().iter().enumerate() {
            x[(i, j)] = read_cell(source, row, key)?;
        }
    }
    Ok(x)
}

/// `y` (n): regressand cell of each selected row.
pub fn regressand_vector<R, K, S>(model: &RegressionModel<K>, source: &S, rows: &[R]) -> Result<DVector<f64>>
where
    R: Debug,
    K: Clone + Eq + Hash + Debug,
    S: TableSource<R, K> + ?Sized,
{
    let mut y = DVector::zeros(rows.len());
    for (i, row) in rows.iter().enumerate() {
        y[i] = read_cell(source, row, model.regressand())?;
    }
    Ok(y)
}

/// Weights of the selected rows rescaled by `n / Σw`, so they sum to `n`.
pub fn weight_vector<R, K, S>(model: &RegressionModel<K>, source: &S, rows: &[R]) -> Result<DVector<f64>>
where
    R: Debug,
    K: Clone + Eq + Hash + Debug,
    S: TableSource<R, K> + ?Sized,
{
    let mut w = DVector::zeros(rows.len());
    for (i, row) in rows.iter().enumerate() {
        w[i] = raw_weight(model, source, row).ok_or_else(|| {
            RegressionError::data_access(format!("selected row {row:?} has no finite weight"))
        })?;
    }

    let total = w.sum();
    if total <= 0.0 {
        return Err(RegressionError::numerical(format!(
            "total weight of {} selected observation(s) is zero",
            rows.len()
        )));
    }
    if !total.is_finite() {
        return Err(RegressionError::numerical("total weight is not finite"));
    }

    w *= rows.len() as f64 / total;
    Ok(w)
}

fn read_cell<R, K, S>(source: &S, row: &R, column: &K) -> Result<f64>
where
    R: Debug,
    K: Debug,
    S: TableSource<R, K> + ?Sized,
{
    finite_value(source, row, column).ok_or_else(|| {
        RegressionError::data_access(format!(
            "selected row {row:?} has no finite value in column {column:?}"
        ))
    })
}
