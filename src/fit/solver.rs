//! Solve an assembled system and split the solution.

use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

use crate::error::{RegressionError, Result, SingularBlock};
use crate::fit::{RegressionResult, RegressionSystem};
use crate::math::{LinearSolveError, solve_lu};

/// Consume `system` and solve `A·v = b`.
///
/// Singular systems are reported, never approximated.
pub fn solve<R, K>(system: RegressionSystem<R, K>) -> Result<RegressionResult<R, K>>
where
    R: Clone + Debug,
    K: Clone + Eq + Hash + Debug,
{
    let p = system.model().regressor_count();
    let m = system.model().constraint_count();
    let threshold = system.options().singularity_threshold;

    let solution = match solve_lu(system.augmented_matrix(), system.augmented_vector(), threshold) {
        Ok(v) => v,
        Err(LinearSolveError::Singular { pivot }) => {
            let block = if pivot < p {
                SingularBlock::Regressors
            } else {
                SingularBlock::Constraints
            };
            warn!(
                "augmented system is singular at pivot {pivot} ({block}); n={}, p={p}, m={m}",
                system.observation_count()
            );
            return Err(RegressionError::SingularSystem {
                dimension: p + m,
                regressors: p,
                constraints: m,
                pivot,
                block,
            });
        }
        Err(e) => return Err(RegressionError::numerical(format!("augmented solve failed: {e}"))),
    };

    debug!("solved {}x{} augmented system", p + m, p + m);
    Ok(RegressionResult::new(system, solution))
}
