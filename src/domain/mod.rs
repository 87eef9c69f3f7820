//! Model specification types.
//!
//! This module defines:
//!
//! - linear equality constraints on coefficients (`Constraint`)
//! - the validated regression description (`RegressionModel`, `ModelBuilder`)

pub mod constraint;
pub mod model;

pub use constraint::*;
pub use model::*;
