//! Top-N reducer: the largest rows of a group by one column.

use crate::reducers::Reducer;
use crate::row::{Row, Value};
use anyhow::Result;

/// Yield up to `n` rows of the group, sorted by `column` descending.
///
/// Ties keep their input order (the sort is stable under the descending
/// comparator).
pub struct TopN {
    column: String,
    n: usize,
}

impl TopN {
    /// Keep the `n` largest rows by `column`.
    #[must_use]
    pub fn new(column: impl Into<String>, n: usize) -> Self {
        Self {
            column: column.into(),
            n,
        }
    }
}

impl Reducer for TopN {
    fn reduce(&self, _keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        let mut decorated: Vec<(Value, Row)> = group
            .into_iter()
            .map(|row| Ok((row.get(&self.column)?.clone(), row)))
            .collect::<Result<_>>()?;
        decorated.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(decorated
            .into_iter()
            .take(self.n)
            .map(|(_, row)| row)
            .collect())
    }
}
