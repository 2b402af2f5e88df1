//! Group reducer kernels plugged into the `Reduce` and `CountAll` operations.
//!
//! A [`Reducer`] receives the grouping key columns and one finite group of
//! rows sharing those key values, and emits zero or more output rows:
//!
//! - [`basic`] -- [`FirstReducer`], [`Count`], [`RowsCounter`], [`Sum`],
//!   [`Average`].
//! - [`topn`] -- [`TopN`], the largest-N rows of a group by a column.
//! - [`term_frequency`] -- [`TermFrequency`], per-word frequency within a group.
//!
//! Under `Reduce` the group is one maximal run of equal-key rows from a
//! pre-sorted stream; under `CountAll` it is the entire stream.

pub mod basic;
pub mod term_frequency;
pub mod topn;

pub use basic::{Average, Count, FirstReducer, RowsCounter, Sum};
pub use term_frequency::TermFrequency;
pub use topn::TopN;

use crate::row::Row;
use anyhow::Result;

/// A kernel aggregating one group of rows.
pub trait Reducer: Send + Sync {
    /// Produce the output rows for one group.
    ///
    /// `keys` are the grouping column names; every row in `group` carries
    /// equal values under them.
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>>;
}
