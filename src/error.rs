//! Error taxonomy for a regression run.
//!
//! Every failure is terminal for the run that raised it: the computation is
//! deterministic, so retrying with the same inputs reproduces the same error.

use std::fmt;

use thiserror::Error;

/// Which block of the augmented system the failing LU pivot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingularBlock {
    /// Pivot column lies in the first `p` columns: `XᵗWX` is rank deficient
    /// in a direction the constraints do not pin down.
    Regressors,
    /// Pivot column lies in the multiplier columns: constraint rows are
    /// redundant or contradictory.
    Constraints,
}

impl fmt::Display for SingularBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingularBlock::Regressors => write!(f, "regressor block"),
            SingularBlock::Constraints => write!(f, "constraint block"),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum RegressionError {
    /// Malformed model specification or options.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A selected row or a required column could not be read from the source.
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Zero total weight, or a non-finite intermediate.
    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error(
        "Singular augmented system ({dimension}x{dimension}, {regressors} regressors, \
         {constraints} constraints): pivot {pivot} in {block} is numerically zero"
    )]
    SingularSystem {
        dimension: usize,
        regressors: usize,
        constraints: usize,
        pivot: usize,
        block: SingularBlock,
    },
}

impl RegressionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        RegressionError::Configuration(message.into())
    }

    pub fn data_access(message: impl Into<String>) -> Self {
        RegressionError::DataAccess(message.into())
    }

    pub fn numerical(message: impl Into<String>) -> Self {
        RegressionError::Numerical(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RegressionError>;
