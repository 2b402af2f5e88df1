//! Term-frequency reducer: per-word share of a group.

use crate::reducers::Reducer;
use crate::row::{Row, Value};
use anyhow::Result;

/// For each distinct value of the words column within the group, emit one row
/// holding the grouping-key columns, the word, and the word's share of the
/// group: `count_of_word / size_of_whole_group`.
///
/// The denominator is the total number of rows handed to the reducer, not the
/// sum of any per-row count column.
pub struct TermFrequency {
    words_column: String,
    result_column: String,
}

impl TermFrequency {
    /// Compute per-`words_column` frequencies into `result_column`.
    #[must_use]
    pub fn new(words_column: impl Into<String>, result_column: impl Into<String>) -> Self {
        Self {
            words_column: words_column.into(),
            result_column: result_column.into(),
        }
    }
}

impl Reducer for TermFrequency {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        let total = group.len() as f64;
        let mut decorated: Vec<(Value, Row)> = group
            .into_iter()
            .map(|row| Ok((row.get(&self.words_column)?.clone(), row)))
            .collect::<Result<_>>()?;
        decorated.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = Vec::new();
        let mut start = 0;
        while start < decorated.len() {
            let mut end = start + 1;
            while end < decorated.len() && decorated[end].0 == decorated[start].0 {
                end += 1;
            }
            let (word, sample) = &decorated[start];
            let mut row = Row::new();
            for key in keys {
                row.set(key.as_str(), sample.get(key)?.clone());
            }
            row.set(self.words_column.as_str(), word.clone());
            row.set(self.result_column.as_str(), (end - start) as f64 / total);
            out.push(row);
            start = end;
        }
        Ok(out)
    }
}
