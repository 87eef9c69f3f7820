//! Solved regression: coefficients, multipliers and derived quantities.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::OnceLock;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::data::TableSource;
use crate::data::source::finite_value;
use crate::error::{RegressionError, Result};
use crate::fit::RegressionSystem;

/// Outcome of one constrained regression run.
///
/// The solution vector of the augmented system is split into `β` (one entry
/// per regressor, in regressor order) and `λ` (one per constraint, in
/// constraint order). Fitted values and residuals are computed on first use
/// and cached.
#[derive(Debug, Clone)]
pub struct RegressionResult<R, K> {
    system: RegressionSystem<R, K>,
    solution: DVector<f64>,
    coefficients: DVector<f64>,
    multipliers: DVector<f64>,
    fitted: OnceLock<DVector<f64>>,
    residuals: OnceLock<DVector<f64>>,
}

impl<R, K> RegressionResult<R, K>
where
    R: Clone + Debug,
    K: Clone + Eq + Hash + Debug,
{
    pub(crate) fn new(system: RegressionSystem<R, K>, solution: DVector<f64>) -> Self {
        let p = system.model().regressor_count();
        let m = system.model().constraint_count();
        let coefficients = solution.rows(0, p).into_owned();
        let multipliers = solution.rows(p, m).into_owned();
        Self {
            system,
            solution,
            coefficients,
            multipliers,
            fitted: OnceLock::new(),
            residuals: OnceLock::new(),
        }
    }

    pub fn system(&self) -> &RegressionSystem<R, K> {
        &self.system
    }

    /// Full `(β, λ)` solution of the augmented system.
    pub fn solution(&self) -> &DVector<f64> {
        &self.solution
    }

    /// `β`, in regressor order.
    pub fn coefficients(&self) -> &DVector<f64> {
        &self.coefficients
    }

    pub fn coefficient(&self, regressor: &K) -> Option<f64> {
        self.system
            .model()
            .regressor_index(regressor)
            .map(|j| self.coefficients[j])
    }

    /// `λ`, in constraint order.
    pub fn multipliers(&self) -> &DVector<f64> {
        &self.multipliers
    }

    pub fn multiplier(&self, constraint: &str) -> Option<f64> {
        self.system
            .model()
            .constraint_index(constraint)
            .map(|j| self.multipliers[j])
    }

    /// `ŷ = Xβ`, one entry per selected row.
    pub fn fitted_values(&self) -> &DVector<f64> {
        self.fitted
            .get_or_init(|| self.system.design_matrix() * &self.coefficients)
    }

    /// `y − ŷ`
    pub fn residuals(&self) -> &DVector<f64> {
        self.residuals
            .get_or_init(|| self.system.regressand_vector() - self.fitted_values())
    }

    pub fn fitted_by_row(&self) -> impl Iterator<Item = (&R, f64)> + '_ {
        self.system
            .observation_rows()
            .iter()
            .zip(self.fitted_values().iter().copied())
    }

    pub fn residuals_by_row(&self) -> impl Iterator<Item = (&R, f64)> + '_ {
        self.system
            .observation_rows()
            .iter()
            .zip(self.residuals().iter().copied())
    }

    /// `Σ w_i r_i²` with the rescaled weights.
    pub fn weighted_sse(&self) -> f64 {
        let w = self.system.weight_vector();
        self.residuals()
            .iter()
            .zip(w.iter())
            .map(|(r, w)| w * r * r)
            .sum()
    }

    /// `max_j |(Cβ − d)_j|`, zero for an unconstrained model.
    pub fn constraint_violation(&self) -> f64 {
        let gap = self.system.constraint_matrix() * &self.coefficients - self.system.constraint_vector();
        gap.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// `x_rowᵗ β` for any row of `source` that has finite regressor cells.
    pub fn predict<S>(&self, source: &S, row: &R) -> Result<f64>
    where
        S: TableSource<R, K> + ?Sized,
    {
        let mut total = 0.0;
        for (key, beta) in self.system.model().regressors().iter().zip(self.coefficients.iter()) {
            let x = finite_value(source, row, key).ok_or_else(|| {
                RegressionError::data_access(format!(
                    "row {row:?} has no finite value in column {key:?}"
                ))
            })?;
            total += x * beta;
        }
        Ok(total)
    }

    pub fn summary(&self) -> RegressionSummary<K> {
        let model = self.system.model();
        let coefficients = model
            .regressors()
            .iter()
            .zip(self.coefficients.iter())
            .map(|(key, value)| CoefficientEstimate {
                regressor: key.clone(),
                value: *value,
            })
            .collect();
        let multipliers = model
            .constraints()
            .iter()
            .zip(self.multipliers.iter())
            .map(|(c, value)| MultiplierEstimate {
                constraint: c.name().to_string(),
                rhs: c.rhs(),
                value: *value,
            })
            .collect();

        RegressionSummary {
            observations: self.system.observation_count(),
            coefficients,
            multipliers,
            weighted_sse: self.weighted_sse(),
            constraint_violation: self.constraint_violation(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEstimate<K> {
    pub regressor: K,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierEstimate {
    pub constraint: String,
    pub rhs: f64,
    pub value: f64,
}

/// Serializable snapshot of a regression result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary<K> {
    pub observations: usize,
    pub coefficients: Vec<CoefficientEstimate<K>>,
    pub multipliers: Vec<MultiplierEstimate>,
    pub weighted_sse: f64,
    pub constraint_violation: f64,
}
