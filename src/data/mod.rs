//! Tabular inputs.
//!
//! The regression only needs three things from its data: a stable row order,
//! column presence, and numeric cell reads. `TableSource` captures that and
//! `DataFrame` is the in-memory implementation.

pub mod frame;
pub mod source;

pub use frame::*;
pub use source::*;
