//! Constrained regression fitting.
//!
//! Responsibilities:
//!
//! - select the observations a run uses (`observations`)
//! - extract `X`, `y` and the rescaled weights (`design`)
//! - assemble the bordered KKT system (`augmented`, `system`)
//! - solve it and split the solution (`solver`, `result`)

pub mod augmented;
pub mod design;
pub mod observations;
pub mod result;
pub mod solver;
pub mod system;

pub use observations::Selection;
pub use result::*;
pub use solver::*;
pub use system::*;
