//! In-memory column-major table.
//!
//! Rows and columns keep insertion order, which is the order the observation
//! selector scans them in. Empty cells are stored as `NaN`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::data::TableSource;
use crate::error::{RegressionError, Result};

#[derive(Debug, Clone)]
pub struct DataFrame<R, K> {
    rows: Vec<R>,
    row_index: HashMap<R, usize>,
    columns: Vec<K>,
    column_index: HashMap<K, usize>,
    /// One `Vec` per column, each of length `rows.len()`.
    data: Vec<Vec<f64>>,
}

impl<R, K> DataFrame<R, K>
where
    R: Clone + Eq + Hash + Debug,
    K: Clone + Eq + Hash + Debug,
{
    /// Empty-celled frame with the given row and column keys.
    pub fn new(rows: Vec<R>, columns: Vec<K>) -> Result<Self> {
        let row_index = index_keys(&rows, "row")?;
        let column_index = index_keys(&columns, "column")?;
        let data = vec![vec![f64::NAN; rows.len()]; columns.len()];
        Ok(Self {
            rows,
            row_index,
            columns,
            column_index,
            data,
        })
    }

    /// Frame from whole columns; every column must have one value per row.
    pub fn from_columns<I>(rows: Vec<R>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Vec<f64>)>,
    {
        let mut frame = Self::new(rows, Vec::new())?;
        for (key, values) in columns {
            frame.add_column(key, values)?;
        }
        Ok(frame)
    }

    pub fn add_column(&mut self, key: K, values: Vec<f64>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(RegressionError::data_access(format!(
                "column {key:?} has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        if self.column_index.contains_key(&key) {
            return Err(RegressionError::data_access(format!("duplicate column key {key:?}")));
        }
        self.column_index.insert(key.clone(), self.columns.len());
        self.columns.push(key);
        self.data.push(values);
        Ok(())
    }

    pub fn set(&mut self, row: &R, column: &K, value: f64) -> Result<()> {
        let r = self
            .row_index
            .get(row)
            .copied()
            .ok_or_else(|| RegressionError::data_access(format!("unknown row {row:?}")))?;
        let c = self
            .column_index
            .get(column)
            .copied()
            .ok_or_else(|| RegressionError::data_access(format!("unknown column {column:?}")))?;
        self.data[c][r] = value;
        Ok(())
    }

    pub fn get(&self, row: &R, column: &K) -> Option<f64> {
        let r = *self.row_index.get(row)?;
        let c = *self.column_index.get(column)?;
        Some(self.data[c][r])
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &[K] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

impl<R, K> TableSource<R, K> for DataFrame<R, K>
where
    R: Clone + Eq + Hash + Debug,
    K: Clone + Eq + Hash + Debug,
{
    fn row_keys(&self) -> Vec<R> {
        self.rows.clone()
    }

    fn has_column(&self, column: &K) -> bool {
        self.column_index.contains_key(column)
    }

    fn value(&self, row: &R, column: &K) -> Option<f64> {
        self.get(row, column)
    }
}

fn index_keys<T>(keys: &[T], what: &str) -> Result<HashMap<T, usize>>
where
    T: Clone + Eq + Hash + Debug,
{
    let mut index = HashMap::with_capacity(keys.len());
    for (pos, key) in keys.iter().enumerate() {
        if index.insert(key.clone(), pos).is_some() {
            return Err(RegressionError::data_access(format!("duplicate {what} key {key:?}")));
        }
    }
    Ok(index)
}
