//! End-to-end regression run.
//!
//! model + source -> selection -> X / y / W -> augmented system -> LU solve -> result

use std::fmt::Debug;
use std::hash::Hash;

use crate::config::RegressionOptions;
use crate::data::TableSource;
use crate::domain::RegressionModel;
use crate::error::Result;
use crate::fit::{RegressionResult, RegressionSystem, solve};

/// Run a constrained weighted regression of `model` over `source`.
///
/// The source is only read; several runs may share it concurrently.
pub fn regress<R, K, S>(
    model: &RegressionModel<K>,
    source: &S,
    options: &RegressionOptions,
) -> Result<RegressionResult<R, K>>
where
    R: Clone + Debug,
    K: Clone + Eq + Hash + Debug,
    S: TableSource<R, K> + ?Sized,
{
    let system = RegressionSystem::build(model, source, options)?;
    solve(system)
}
