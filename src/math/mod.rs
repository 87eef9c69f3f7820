//! Linear-algebra primitives: diagonal-weight products and the LU solve.

pub mod linalg;
pub mod weighted;

pub use linalg::*;
pub use weighted::*;
