//! Row-shape mappers and the user-function escape hatches.

use crate::mappers::Mapper;
use crate::row::{Row, Value};
use anyhow::Result;

/* ===================== DummyMapper ===================== */

/// Yield exactly the row passed.
pub struct DummyMapper;

impl Mapper for DummyMapper {
    fn map(&self, row: Row) -> Result<Vec<Row>> {
        Ok(vec![row])
    }
}

/* ===================== Filter ===================== */

/// Keep only rows satisfying a predicate.
///
/// The predicate is fallible so that missing-column or wrong-type lookups
/// inside it fail the run like any built-in kernel would.
pub struct Filter {
    condition: Box<dyn Fn(&Row) -> Result<bool> + Send + Sync>,
}

impl Filter {
    /// Keep rows for which `condition` returns `true`.
    pub fn new(condition: impl Fn(&Row) -> Result<bool> + Send + Sync + 'static) -> Self {
        Self {
            condition: Box::new(condition),
        }
    }
}

impl Mapper for Filter {
    fn map(&self, row: Row) -> Result<Vec<Row>> {
        if (self.condition)(&row)? {
            Ok(vec![row])
        } else {
            Ok(Vec::new())
        }
    }
}

/* ===================== Project ===================== */

/// Emit a fresh row holding only the listed columns.
///
/// All listed columns must be present; anything else is dropped.
pub struct Project {
    columns: Vec<String>,
}

impl Project {
    /// Keep exactly `columns`.
    #[must_use]
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

impl Mapper for Project {
    fn map(&self, row: Row) -> Result<Vec<Row>> {
        let mut projected = Row::new();
        for column in &self.columns {
            projected.set(column.as_str(), row.get(column)?.clone());
        }
        Ok(vec![projected])
    }
}

/* ===================== ApplyFunction ===================== */

/// Store the result of an arbitrary function of the row in a column.
pub struct ApplyFunction {
    func: Box<dyn Fn(&Row) -> Result<Value> + Send + Sync>,
    result_column: String,
}

impl ApplyFunction {
    /// Store `func(row)` in `result_column`.
    pub fn new(
        func: impl Fn(&Row) -> Result<Value> + Send + Sync + 'static,
        result_column: impl Into<String>,
    ) -> Self {
        Self {
            func: Box::new(func),
            result_column: result_column.into(),
        }
    }
}

impl Mapper for ApplyFunction {
    fn map(&self, mut row: Row) -> Result<Vec<Row>> {
        let value = (self.func)(&row)?;
        row.set(self.result_column.as_str(), value);
        Ok(vec![row])
    }
}
