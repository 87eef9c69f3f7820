//! Dense linear solve for the augmented (bordered) system.
//!
//! The bordered matrix is symmetric but indefinite (its lower-right block is
//! zero), so Cholesky does not apply. We use nalgebra's LU with partial
//! pivoting and inspect the pivots ourselves: nalgebra only refuses exactly
//! zero pivots, while a rank-deficient system usually leaves a pivot that is
//! zero up to rounding.
//!
//! Regressors measured in large units make `XᵗWX` dwarf the unit-sized
//! constraint block, so pivots are tested on a symmetrically equilibrated
//! copy `D·A·D`. The scale factors are powers of two, which keeps the
//! scaled entries exact.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Upper bound on equilibration sweeps.
const MAX_EQUILIBRATION_SWEEPS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LinearSolveError {
    #[error("matrix is {rows}x{cols}, expected square")]
    NotSquare { rows: usize, cols: usize },

    #[error("right-hand side has length {got}, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("non-finite value in linear system")]
    NonFinite,

    /// Pivot `pivot` of the LU factorization is numerically zero.
    #[error("singular matrix (pivot {pivot})")]
    Singular { pivot: usize },
}

/// Symmetric scaling `d` such that every non-zero row of `diag(d)·a·diag(d)`
/// has its largest magnitude in `(1/2, 2)`.
///
/// Iterates `d_i ← d_i / sqrt(max_j |d_i a_ij d_j|)` with each factor rounded
/// to a power of two. All-zero rows keep `d_i = 1`.
pub fn equilibrate(a: &DMatrix<f64>) -> DVector<f64> {
    let n = a.nrows();
    let mut d = DVector::from_element(n, 1.0);
    for _ in 0..MAX_EQUILIBRATION_SWEEPS {
        let mut changed = false;
        let factors = DVector::from_fn(n, |i, _| {
            let row_max = (0..n).fold(0.0_f64, |acc, j| acc.max((d[i] * a[(i, j)] * d[j]).abs()));
            if row_max == 0.0 {
                return 1.0;
            }
            let exponent = (-0.5 * row_max.log2()).round();
            if exponent != 0.0 {
                changed = true;
            }
            exponent.exp2()
        });
        if !changed {
            break;
        }
        d.component_mul_assign(&factors);
    }
    d
}

/// Solve `a · x = b` with LU on the equilibrated system.
///
/// With `ã = D·a·D` (see [`equilibrate`]), a pivot `ũ_kk` counts as zero when
/// `|ũ_kk| <= threshold * max|ã_ij|`. The test is therefore unchanged by a
/// symmetric rescaling of the unknowns. There is no least-squares or
/// pseudo-inverse fallback: singular systems are always reported.
pub fn solve_lu(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    threshold: f64,
) -> Result<DVector<f64>, LinearSolveError> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(LinearSolveError::NotSquare { rows, cols });
    }
    if b.len() != rows {
        return Err(LinearSolveError::DimensionMismatch {
            expected: rows,
            got: b.len(),
        });
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(LinearSolveError::NonFinite);
    }
    if a.amax() == 0.0 {
        return Err(LinearSolveError::Singular { pivot: 0 });
    }

    let d = equilibrate(a);
    let scaled = DMatrix::from_fn(rows, cols, |i, j| d[i] * a[(i, j)] * d[j]);
    let tol = threshold * scaled.amax();

    let lu = scaled.lu();
    let u = lu.u();
    if let Some(pivot) = (0..rows).find(|&k| u[(k, k)].abs() <= tol) {
        return Err(LinearSolveError::Singular { pivot });
    }

    let scaled_x = lu
        .solve(&b.component_mul(&d))
        .ok_or(LinearSolveError::Singular { pivot: rows - 1 })?;
    let x = scaled_x.component_mul(&d);
    if x.iter().any(|v| !v.is_finite()) {
        return Err(LinearSolveError::NonFinite);
    }
    Ok(x)
}
