//! Observation selection.
//!
//! A row takes part in the regression iff its weight is strictly positive and
//! the regressand and every regressor cell are finite. Rows failing the test
//! are dropped silently (incomplete observations are filtered, not errors),
//! but counted so callers can report what happened.
//!
//! Selection preserves the source's row order.

use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

use crate::data::TableSource;
use crate::data::source::finite_value;
use crate::domain::RegressionModel;

/// Rows chosen for a regression run plus drop counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<R> {
    pub rows: Vec<R>,
    pub rows_scanned: usize,
    /// Rows whose weight was zero, negative, missing or non-finite.
    pub dropped_by_weight: usize,
    /// Rows with a missing or non-finite regressand/regressor cell.
    pub dropped_incomplete: usize,
}

/// Raw (unscaled) weight of `row`: the weight cell when the model names a
/// weight column, else `1.0`. `None` when the cell is missing or non-finite.
///
/// Both the selector and the weight vector builder read weights through this
/// function, so a selected row always has a positive weight.
pub fn raw_weight<R, K, S>(model: &RegressionModel<K>, source: &S, row: &R) -> Option<f64>
where
    K: Clone + Eq + Hash + Debug,
    S: TableSource<R, K> + ?Sized,
{
    match model.weight() {
        Some(column) => finite_value(source, row, column),
        None => Some(1.0),
    }
}

pub fn select_observations<R, K, S>(model: &RegressionModel<K>, source: &S) -> Selection<R>
where
    R: Clone + Debug,
    K: Clone + Eq + Hash + Debug,
    S: TableSource<R, K> + ?Sized,
{
    let keys = source.row_keys();
    let rows_scanned = keys.len();
    let mut rows = Vec::with_capacity(rows_scanned);
    let mut dropped_by_weight = 0usize;
    let mut dropped_incomplete = 0usize;
    let mut negative = 0usize;

    for row in keys {
        match raw_weight(model, source, &row) {
            Some(w) if w > 0.0 => {}
            Some(w) => {
                if w < 0.0 {
                    negative += 1;
                }
                dropped_by_weight += 1;
                continue;
            }
            None => {
                dropped_by_weight += 1;
                continue;
            }
        }

        let complete = finite_value(source, &row, model.regressand()).is_some()
            && model
                .regressors()
                .iter()
                .all(|k| finite_value(source, &row, k).is_some());
        if !complete {
            dropped_incomplete += 1;
            continue;
        }

        rows.push(row);
    }

    if negative > 0 {
        warn!("{negative} row(s) with negative weight excluded from the regression");
    }
    debug!(
        "selected {} of {} rows ({} dropped by weight, {} incomplete)",
        rows.len(),
        rows_scanned,
        dropped_by_weight,
        dropped_incomplete
    );

    Selection {
        rows,
        rows_scanned,
        dropped_by_weight,
        dropped_incomplete,
    }
}
