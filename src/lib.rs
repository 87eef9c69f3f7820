//! `conreg`: weighted linear regression under linear equality constraints.
//!
//! Coefficients minimize the weighted squared residuals subject to `Cβ = d`,
//! found by solving the bordered (Lagrange multiplier) system with LU.
//!
//! ```no_run
//! use conreg::{Constraint, DataFrame, RegressionModel, RegressionOptions, regress};
//!
//! # fn main() -> conreg::Result<()> {
//! let frame = DataFrame::from_columns(
//!     vec![0, 1, 2, 3],
//!     [
//!         ("y", vec![1.0, 2.1, 2.9, 4.2]),
//!         ("a", vec![1.0, 0.0, 1.0, 0.0]),
//!         ("b", vec![0.0, 1.0, 0.0, 1.0]),
//!         ("t", vec![0.0, 1.0, 2.0, 3.0]),
//!     ],
//! )?;
//! let model = RegressionModel::builder("y")
//!     .regressors(["a", "b", "t"])
//!     .constraint(Constraint::new("groups", 0.0).term("a", 1.0).term("b", 1.0))
//!     .build()?;
//! let result = regress(&model, &frame, &RegressionOptions::default())?;
//! println!("slope = {:?}", result.coefficient(&"t"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod pipeline;

pub use config::RegressionOptions;
pub use data::{DataFrame, TableSource};
pub use domain::{Constraint, ModelBuilder, RegressionModel};
pub use error::{RegressionError, Result, SingularBlock};
pub use fit::{RegressionResult, RegressionSummary, RegressionSystem, Selection, solve};
pub use pipeline::regress;
