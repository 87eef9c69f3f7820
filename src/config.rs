//! Run options for building and solving a constrained regression.
//!
//! Options are plain data so a host application can load them from whatever
//! configuration format it already uses (every field has a serde default).

use serde::{Deserialize, Serialize};

use crate::error::{RegressionError, Result};

/// Default relative pivot threshold used to declare the augmented system singular.
pub const DEFAULT_SINGULARITY_THRESHOLD: f64 = 1e-11;

/// Selections with at least this many rows accumulate `XᵗWX` in parallel.
pub const DEFAULT_PARALLEL_MIN_ROWS: usize = 4096;

/// Rows per chunk on the parallel accumulation path.
pub const DEFAULT_CHUNK_ROWS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionOptions {
    /// A pivot `ũ_kk` of the LU factorization of the equilibrated matrix
    /// `Ã = D·A·D` counts as zero when `|ũ_kk| <= singularity_threshold * max|Ã_ij|`.
    pub singularity_threshold: f64,
    /// Minimum number of selected rows before the chunked parallel path is used.
    pub parallel_min_rows: usize,
    /// Chunk size (rows) for the parallel path. Partial sums are combined in
    /// chunk order, so a fixed chunk size gives reproducible results.
    pub chunk_rows: usize,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            singularity_threshold: DEFAULT_SINGULARITY_THRESHOLD,
            parallel_min_rows: DEFAULT_PARALLEL_MIN_ROWS,
            chunk_rows: DEFAULT_CHUNK_ROWS,
        }
    }
}

impl RegressionOptions {
    /// Options that always take the sequential accumulation path.
    pub fn sequential() -> Self {
        Self {
            parallel_min_rows: usize::MAX,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.singularity_threshold.is_finite() && self.singularity_threshold > 0.0) {
            return Err(RegressionError::configuration(format!(
                "singularity_threshold must be finite and positive, got {}",
                self.singularity_threshold
            )));
        }
        if self.chunk_rows == 0 {
            return Err(RegressionError::configuration("chunk_rows must be at least 1"));
        }
        Ok(())
    }

    pub(crate) fn use_parallel(&self, n_rows: usize) -> bool {
        n_rows >= self.parallel_min_rows && n_rows > self.chunk_rows
    }
}
