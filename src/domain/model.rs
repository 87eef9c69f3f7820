//! Model specification: regressand, ordered regressors, constraints, weights.
//!
//! A `RegressionModel` is validated once, when it is built. Nothing about it
//! can fail later at solve time.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::domain::Constraint;
use crate::error::{RegressionError, Result};

/// Immutable description of a constrained weighted regression.
#[derive(Debug, Clone)]
pub struct RegressionModel<K> {
    regressand: K,
    regressors: Vec<K>,
    index: HashMap<K, usize>,
    constraints: Vec<Constraint<K>>,
    weight: Option<K>,
}

impl<K> RegressionModel<K>
where
    K: Clone + Eq + Hash + Debug,
{
    pub fn builder(regressand: K) -> ModelBuilder<K> {
        ModelBuilder {
            regressand,
            regressors: Vec::new(),
            constraints: Vec::new(),
            weight: None,
        }
    }

    pub fn regressand(&self) -> &K {
        &self.regressand
    }

    /// Regressor keys in design-matrix column order.
    pub fn regressors(&self) -> &[K] {
        &self.regressors
    }

    /// Constraints in multiplier order.
    pub fn constraints(&self) -> &[Constraint<K>] {
        &self.constraints
    }

    /// Weight column, or `None` for uniform weights.
    pub fn weight(&self) -> Option<&K> {
        self.weight.as_ref()
    }

    /// `p`
    pub fn regressor_count(&self) -> usize {
        self.regressors.len()
    }

    /// `m`
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Column of `key` in the design matrix.
    pub fn regressor_index(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Position of the constraint called `name`.
    pub fn constraint_index(&self, name: &str) -> Option<usize> {
        self.constraints.iter().position(|c| c.name() == name)
    }
}

/// Builder for [`RegressionModel`]; all validation happens in [`ModelBuilder::build`].
#[derive(Debug, Clone)]
pub struct ModelBuilder<K> {
    regressand: K,
    regressors: Vec<K>,
    constraints: Vec<Constraint<K>>,
    weight: Option<K>,
}

impl<K> ModelBuilder<K>
where
    K: Clone + Eq + Hash + Debug,
{
    pub fn regressor(mut self, key: K) -> Self {
        self.regressors.push(key);
        self
    }

    pub fn regressors<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        self.regressors.extend(keys);
        self
    }

    pub fn constraint(mut self, constraint: Constraint<K>) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn weight(mut self, key: K) -> Self {
        self.weight = Some(key);
        self
    }

    pub fn build(self) -> Result<RegressionModel<K>> {
        if self.regressors.is_empty() {
            return Err(RegressionError::configuration(
                "a regression needs at least one regressor",
            ));
        }

        let mut index = HashMap::with_capacity(self.regressors.len());
        for (col, key) in self.regressors.iter().enumerate() {
            if index.insert(key.clone(), col).is_some() {
                return Err(RegressionError::configuration(format!(
                    "duplicate regressor {key:?}"
                )));
            }
        }
        if index.contains_key(&self.regressand) {
            return Err(RegressionError::configuration(format!(
                "regressand {:?} is also listed as a regressor",
                self.regressand
            )));
        }

        let mut names = HashSet::with_capacity(self.constraints.len());
        for constraint in &self.constraints {
            validate_constraint(constraint, &index)?;
            if !names.insert(constraint.name()) {
                return Err(RegressionError::configuration(format!(
                    "duplicate constraint name '{}'",
                    constraint.name()
                )));
            }
        }

        Ok(RegressionModel {
            regressand: self.regressand,
            regressors: self.regressors,
            index,
            constraints: self.constraints,
            weight: self.weight,
        })
    }
}

fn validate_constraint<K>(constraint: &Constraint<K>, index: &HashMap<K, usize>) -> Result<()>
where
    K: Eq + Hash + Debug,
{
    let name = constraint.name();
    if !constraint.rhs().is_finite() {
        return Err(RegressionError::configuration(format!(
            "constraint '{name}' has a non-finite right-hand side"
        )));
    }
    for (key, coefficient) in constraint.terms() {
        if !index.contains_key(key) {
            return Err(RegressionError::configuration(format!(
                "constraint '{name}' references unknown regressor {key:?}"
            )));
        }
        if !coefficient.is_finite() {
            return Err(RegressionError::configuration(format!(
                "constraint '{name}' has a non-finite coefficient on {key:?}"
            )));
        }
    }
    if constraint.is_trivial() {
        return Err(RegressionError::configuration(format!(
            "constraint '{name}' has no non-zero coefficient"
        )));
    }
    Ok(())
}
