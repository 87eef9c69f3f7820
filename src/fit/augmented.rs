//! Bordered (KKT) system for weighted least squares under equality constraints.
//!
//! Minimizing `(y − Xβ)ᵗ W (y − Xβ)` subject to `Cβ = d` has the first-order
//! conditions
//!
//! ```text
//! [ XᵗWX  Cᵗ ] [ β ]   [ XᵗWy ]
//! [ C     0  ] [ λ ] = [ d    ]
//! ```
//!
//! The matrix is symmetric by construction and indefinite whenever `m > 0`.
//!
//! `XᵗWX` and `XᵗWy` dominate the cost when `n ≫ p`. Large selections are
//! split into fixed-size row chunks accumulated in parallel; the partial sums
//! are added back in chunk order, so a given chunk size always produces the
//! same bits.

use std::fmt::Debug;
use std::hash::Hash;

use log::debug;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::config::RegressionOptions;
use crate::domain::RegressionModel;
use crate::error::{RegressionError, Result};
use crate::math::{weighted_cross, weighted_gram};

/// Dense `C` (m×p) and `d` (m) from the sparse constraint terms.
pub fn constraint_system<K>(model: &RegressionModel<K>) -> (DMatrix<f64>, DVector<f64>)
where
    K: Clone + Eq + Hash + Debug,
{
    let p = model.regressor_count();
    let m = model.constraint_count();
    let mut c = DMatrix::zeros(m, p);
    let mut d = DVector::zeros(m);
    for (j, constraint) in model.constraints().iter().enumerate() {
        for (key, coefficient) in constraint.terms() {
            // Keys were validated against the regressor set when the model was built.
            if let Some(col) = model.regressor_index(key) {
                c[(j, col)] = *coefficient;
            }
        }
        d[j] = constraint.rhs();
    }
    (c, d)
}

/// `M = XᵗWX` and `v = XᵗWy`.
pub fn normal_equations(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    weights: &DVector<f64>,
    options: &RegressionOptions,
) -> Result<(DMatrix<f64>, DVector<f64>)> {
    let n = x.nrows();
    if y.len() != n || weights.len() != n {
        return Err(RegressionError::numerical(format!(
            "inconsistent observation counts: X has {n} rows, y has {}, W has {}",
            y.len(),
            weights.len()
        )));
    }

    let (gram, moment) = if options.use_parallel(n) {
        accumulate_chunked(x, y, weights, options.chunk_rows)
    } else {
        debug!("accumulating normal equations sequentially over {n} rows");
        (weighted_gram(x, weights), weighted_cross(x, weights, y))
    };

    if gram.iter().chain(moment.iter()).any(|v| !v.is_finite()) {
        return Err(RegressionError::numerical(
            "non-finite value while accumulating XᵗWX / XᵗWy",
        ));
    }
    Ok((gram, moment))
}

fn accumulate_chunked(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    w: &DVector<f64>,
    chunk_rows: usize,
) -> (DMatrix<f64>, DVector<f64>) {
    let (n, p) = x.shape();
    let starts: Vec<usize> = (0..n).step_by(chunk_rows).collect();
    debug!(
        "accumulating normal equations over {n} rows in {} parallel chunks",
        starts.len()
    );

    let partials: Vec<(DMatrix<f64>, DVector<f64>)> = starts
        .par_iter()
        .map(|&start| {
            let len = chunk_rows.min(n - start);
            let xs = x.rows(start, len).into_owned();
            let ys = y.rows(start, len).into_owned();
            let ws = w.rows(start, len).into_owned();
            (weighted_gram(&xs, &ws), weighted_cross(&xs, &ws, &ys))
        })
        .collect();

    let mut gram = DMatrix::zeros(p, p);
    let mut moment = DVector::zeros(p);
    for (g, v) in &partials {
        gram += g;
        moment += v;
    }
    (gram, moment)
}

/// Place `M`, `C`, `Cᵗ` and a zero block into `A`; stack `v` over `d` into `b`.
pub fn assemble(
    gram: &DMatrix<f64>,
    moment: &DVector<f64>,
    c: &DMatrix<f64>,
    d: &DVector<f64>,
) -> (DMatrix<f64>, DVector<f64>) {
    let p = gram.nrows();
    let m = c.nrows();
    let dim = p + m;

    let mut a = DMatrix::zeros(dim, dim);
    a.view_mut((0, 0), (p, p)).copy_from(gram);
    a.view_mut((0, p), (p, m)).copy_from(&c.transpose());
    a.view_mut((p, 0), (m, p)).copy_from(c);

    let mut b = DVector::zeros(dim);
    b.rows_mut(0, p).copy_from(moment);
    b.rows_mut(p, m).copy_from(d);
    (a, b)
}
