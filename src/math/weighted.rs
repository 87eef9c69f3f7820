//! Products against a diagonal weight matrix stored as a vector.
//!
//! `W` is never materialized, which keeps `XᵗWX` at `O(n·p²)` with no `n×n`
//! allocation.

use nalgebra::{DMatrix, DVector};

/// `xᵗ · diag(w) · x`.
///
/// Each off-diagonal sum is computed once and mirrored, so the result is
/// exactly symmetric.
pub fn weighted_gram(x: &DMatrix<f64>, w: &DVector<f64>) -> DMatrix<f64> {
    let (n, p) = x.shape();
    let mut out = DMatrix::zeros(p, p);
    for a in 0..p {
        for b in a..p {
            let mut s = 0.0;
            for i in 0..n {
                s += w[i] * x[(i, a)] * x[(i, b)];
            }
            out[(a, b)] = s;
            out[(b, a)] = s;
        }
    }
    out
}

/// `xᵗ · diag(w) · y`
pub fn weighted_cross(x: &DMatrix<f64>, w: &DVector<f64>, y: &DVector<f64>) -> DVector<f64> {
    let (n, p) = x.shape();
    DVector::from_fn(p, |a, _| {
        let mut s = 0.0;
        for i in 0..n {
            s += w[i] * x[(i, a)] * y[i];
        }
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn design() -> DMatrix<f64> {
        DMatrix::from_row_slice(4, 2, &[1.0, 0.5, 1.0, -1.0, 1.0, 2.0, 1.0, 3.5])
    }

    #[test]
    fn agrees_with_dense_products() {
        let w = DVector::from_row_slice(&[0.5, 1.0, 1.5, 1.0]);
        let dense = DMatrix::from_diagonal(&w);
        let x = design();
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0]);

        assert_relative_eq!(weighted_gram(&x, &w), x.transpose() * &dense * &x, epsilon = 1e-12);
        assert_relative_eq!(weighted_cross(&x, &w, &y), x.transpose() * (&dense * &y), epsilon = 1e-12);
    }

    #[test]
    fn gram_is_exactly_symmetric() {
        let w = DVector::from_row_slice(&[0.1, 0.7, 0.3, 1.9]);
        let g = weighted_gram(&design(), &w);
        assert_eq!(g, g.transpose());
        assert_eq!(g.shape(), (2, 2));
    }

    #[test]
    fn empty_selection_gives_zero_products() {
        let x = DMatrix::zeros(0, 3);
        let w = DVector::zeros(0);
        assert_eq!(weighted_gram(&x, &w), DMatrix::zeros(3, 3));
        assert_eq!(weighted_cross(&x, &w, &DVector::zeros(0)), DVector::zeros(3));
    }
}
