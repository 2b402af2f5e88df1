//! Per-row transform kernels plugged into the `Map` operation.
//!
//! A [`Mapper`] consumes one row and produces zero or more output rows. The
//! built-in kernels fall into three families:
//!
//! - [`text`] -- string-column transforms: [`FilterPunctuation`], [`LowerCase`],
//!   [`Split`].
//! - [`numeric`] -- arithmetic over numeric columns: [`Product`], [`Idf`].
//! - [`select`] -- row-shape and escape-hatch kernels: [`DummyMapper`],
//!   [`Filter`], [`Project`], [`ApplyFunction`].
//!
//! All kernels leave columns they were not asked about untouched, except
//! [`Project`], which drops them by design of its contract.

pub mod numeric;
pub mod select;
pub mod text;

pub use numeric::{Idf, Product};
pub use select::{ApplyFunction, DummyMapper, Filter, Project};
pub use text::{FilterPunctuation, LowerCase, Split};

use crate::row::Row;
use anyhow::Result;

/// A stateless per-row transform.
///
/// Implementors receive the row by value (each row has exactly one consumer,
/// so in-place mutation before yielding is fine) and return the rows to emit:
/// zero to drop the row, one to transform it, several to expand it.
pub trait Mapper: Send + Sync {
    /// Produce the output rows for one input row.
    fn map(&self, row: Row) -> Result<Vec<Row>>;
}
