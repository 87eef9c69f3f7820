//! The assembled regression system for one run.
//!
//! Built once from a model and a read-only source, then handed (by value) to
//! [`crate::fit::solve`]. All intermediates stay readable for inspection.

use std::fmt::Debug;
use std::hash::Hash;

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::config::RegressionOptions;
use crate::data::TableSource;
use crate::domain::RegressionModel;
use crate::error::{RegressionError, Result};
use crate::fit::augmented::{assemble, constraint_system, normal_equations};
use crate::fit::design::{design_matrix, regressand_vector, weight_vector};
use crate::fit::observations::{Selection, select_observations};

#[derive(Debug, Clone)]
pub struct RegressionSystem<R, K> {
    model: RegressionModel<K>,
    options: RegressionOptions,
    selection: Selection<R>,
    design: DMatrix<f64>,
    regressand: DVector<f64>,
    weights: DVector<f64>,
    constraint_matrix: DMatrix<f64>,
    constraint_vector: DVector<f64>,
    augmented_matrix: DMatrix<f64>,
    augmented_vector: DVector<f64>,
}

impl<R, K> RegressionSystem<R, K>
where
    R: Clone + Debug,
    K: Clone + Eq + Hash + Debug,
{
    pub fn build<S>(model: &RegressionModel<K>, source: &S, options: &RegressionOptions) -> Result<Self>
    where
        S: TableSource<R, K> + ?Sized,
    {
        options.validate()?;
        ensure_columns_present(model, source)?;

        let selection = select_observations(model, source);
        let rows = &selection.rows;

        let design = design_matrix(model, source, rows)?;
        let regressand = regressand_vector(model, source, rows)?;
        let weights = weight_vector(model, source, rows)?;

        let (constraint_matrix, constraint_vector) = constraint_system(model);
        let (gram, moment) = normal_equations(&design, &regressand, &weights, options)?;
        let (augmented_matrix, augmented_vector) =
            assemble(&gram, &moment, &constraint_matrix, &constraint_vector);

        debug!(
            "built {dim}x{dim} augmented system from {n} observations ({p} regressors, {m} constraints)",
            dim = augmented_matrix.nrows(),
            n = rows.len(),
            p = model.regressor_count(),
            m = model.constraint_count(),
        );

        Ok(Self {
            model: model.clone(),
            options: *options,
            selection,
            design,
            regressand,
            weights,
            constraint_matrix,
            constraint_vector,
            augmented_matrix,
            augmented_vector,
        })
    }

    pub fn model(&self) -> &RegressionModel<K> {
        &self.model
    }

    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    pub fn selection(&self) -> &Selection<R> {
        &self.selection
    }

    /// Selected row identifiers; row `i` of every per-observation quantity.
    pub fn observation_rows(&self) -> &[R] {
        &self.selection.rows
    }

    /// `n`
    pub fn observation_count(&self) -> usize {
        self.selection.rows.len()
    }

    /// `p + m`
    pub fn dimension(&self) -> usize {
        self.augmented_matrix.nrows()
    }

    /// `X` (n×p)
    pub fn design_matrix(&self) -> &DMatrix<f64> {
        &self.design
    }

    /// `y` (n)
    pub fn regressand_vector(&self) -> &DVector<f64> {
        &self.regressand
    }

    /// Rescaled weights (n), summing to `n`.
    pub fn weight_vector(&self) -> &DVector<f64> {
        &self.weights
    }

    /// `W` (n×n), materialized on request.
    pub fn weight_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_diagonal(&self.weights)
    }

    /// `C` (m×p)
    pub fn constraint_matrix(&self) -> &DMatrix<f64> {
        &self.constraint_matrix
    }

    /// `d` (m)
    pub fn constraint_vector(&self) -> &DVector<f64> {
        &self.constraint_vector
    }

    /// `A` ((p+m)×(p+m))
    pub fn augmented_matrix(&self) -> &DMatrix<f64> {
        &self.augmented_matrix
    }

    /// `b` (p+m)
    pub fn augmented_vector(&self) -> &DVector<f64> {
        &self.augmented_vector
    }
}

fn ensure_columns_present<R, K, S>(model: &RegressionModel<K>, source: &S) -> Result<()>
where
    K: Clone + Eq + Hash + Debug,
    S: TableSource<R, K> + ?Sized,
{
    let required = std::iter::once(model.regressand())
        .chain(model.regressors())
        .chain(model.weight());
    for column in required {
        if !source.has_column(column) {
            return Err(RegressionError::data_access(format!(
                "source has no column {column:?}"
            )));
        }
    }
    Ok(())
}
