//! Linear equality constraints on regression coefficients.

use serde::{Deserialize, Serialize};

/// A linear equality `Σ_k c_k · β_k = d` over regressor keys.
///
/// Coefficients are stored sparsely in first-mention order; keys not mentioned
/// have coefficient zero. The dense row is only materialized when the
/// augmented system is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint<K> {
    name: String,
    terms: Vec<(K, f64)>,
    rhs: f64,
}

impl<K: PartialEq> Constraint<K> {
    pub fn new(name: impl Into<String>, rhs: f64) -> Self {
        Self {
            name: name.into(),
            terms: Vec::new(),
            rhs,
        }
    }

    /// Add `coefficient · β_key`. Repeated keys accumulate.
    pub fn term(mut self, key: K, coefficient: f64) -> Self {
        match self.terms.iter_mut().find(|(k, _)| *k == key) {
            Some((_, c)) => *c += coefficient,
            None => self.terms.push((key, coefficient)),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn terms(&self) -> &[(K, f64)] {
        &self.terms
    }

    /// Coefficient on `key` (zero when the constraint does not mention it).
    pub fn coefficient(&self, key: &K) -> f64 {
        self.terms
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| *c)
            .unwrap_or(0.0)
    }

    pub(crate) fn is_trivial(&self) -> bool {
        self.terms.iter().all(|(_, c)| *c == 0.0)
    }
}
