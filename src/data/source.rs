//! Read-only access to row-indexed, column-typed tabular data.

/// A table the regression reads its observations from.
///
/// Implementations must enumerate rows in a stable order: two calls to
/// [`TableSource::row_keys`] on an unchanged table return the same sequence.
pub trait TableSource<R, K> {
    /// Row identifiers in the table's natural order.
    fn row_keys(&self) -> Vec<R>;

    /// Whether the table carries `column` at all.
    fn has_column(&self, column: &K) -> bool;

    /// Numeric value at `(row, column)`, or `None` when the cell is absent.
    ///
    /// `Some(NaN)` is allowed and is treated like a missing cell by the
    /// observation filter.
    fn value(&self, row: &R, column: &K) -> Option<f64>;
}

/// `value` narrowed to finite numbers.
pub(crate) fn finite_value<R, K, S>(source: &S, row: &R, column: &K) -> Option<f64>
where
    S: TableSource<R, K> + ?Sized,
{
    source.value(row, column).filter(|v| v.is_finite())
}
