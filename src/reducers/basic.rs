//! Basic group reducers: first row, counting, sum, average.

use crate::reducers::Reducer;
use crate::row::{Row, Value};
use anyhow::Result;

// The aggregating reducers emit rows holding only the grouping-key columns
// (copied from the first row of the group; all rows agree on them) plus the
// aggregate itself.
fn key_columns(keys: &[String], sample: &Row) -> Result<Row> {
    let mut out = Row::new();
    for key in keys {
        out.set(key.as_str(), sample.get(key)?.clone());
    }
    Ok(out)
}

/* ===================== FirstReducer ===================== */

/// Yield only the first row of the group.
pub struct FirstReducer;

impl Reducer for FirstReducer {
    fn reduce(&self, _keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        Ok(group.into_iter().take(1).collect())
    }
}

/* ===================== Count ===================== */

/// Count the rows of the group; one output row per group.
pub struct Count {
    column: String,
}

impl Count {
    /// Store the group size in `column`.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Reducer for Count {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        let Some(first) = group.first() else {
            return Ok(Vec::new());
        };
        let mut out = key_columns(keys, first)?;
        out.set(self.column.as_str(), group.len() as i64);
        Ok(vec![out])
    }
}

/* ===================== RowsCounter ===================== */

/// Count the rows of the group and broadcast the total: one output row per
/// *input* row, each holding the key columns and the group size.
pub struct RowsCounter {
    column: String,
}

impl RowsCounter {
    /// Store the group size in `column`.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Reducer for RowsCounter {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        let total = group.len() as i64;
        let mut out = Vec::with_capacity(group.len());
        for row in &group {
            let mut counted = key_columns(keys, row)?;
            counted.set(self.column.as_str(), total);
            out.push(counted);
        }
        Ok(out)
    }
}

/* ===================== Sum ===================== */

/// Sum a numeric column over the group; one output row per group with the
/// total written back under the same column name.
///
/// All-integer inputs sum to an integer; any float promotes the total.
pub struct Sum {
    column: String,
}

impl Sum {
    /// Sum `column`.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Reducer for Sum {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        let Some(first) = group.first() else {
            return Ok(Vec::new());
        };
        let mut total = Value::Int(0);
        for row in &group {
            let value = row.get(&self.column)?;
            total = match (&total, value) {
                (Value::Int(a), Value::Int(b)) => Value::Int(a + b),
                _ => Value::Float(total.as_f64()? + value.as_f64()?),
            };
        }
        let mut out = key_columns(keys, first)?;
        out.set(self.column.as_str(), total);
        Ok(vec![out])
    }
}

/* ===================== Average ===================== */

/// Arithmetic mean of a numeric column over the group; one output row per
/// group with the mean written back under the same column name.
pub struct Average {
    column: String,
}

impl Average {
    /// Average `column`.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Reducer for Average {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        let Some(first) = group.first() else {
            return Ok(Vec::new());
        };
        let mut total = 0.0;
        for row in &group {
            total += row.get(&self.column)?.as_f64()?;
        }
        let mut out = key_columns(keys, first)?;
        out.set(self.column.as_str(), total / group.len() as f64);
        Ok(vec![out])
    }
}
