//! Arithmetic mappers over numeric columns.

use crate::mappers::Mapper;
use crate::row::{Row, Value};
use anyhow::Result;

/* ===================== Product ===================== */

/// Multiply the named columns and store the result.
///
/// Integer columns multiply to an integer; any float among the factors
/// promotes the product to a float.
pub struct Product {
    columns: Vec<String>,
    result_column: String,
}

impl Product {
    /// Multiply `columns` into `result_column`.
    #[must_use]
    pub fn new(columns: &[&str], result_column: impl Into<String>) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
            result_column: result_column.into(),
        }
    }
}

impl Mapper for Product {
    fn map(&self, mut row: Row) -> Result<Vec<Row>> {
        let mut product = Value::Int(1);
        for column in &self.columns {
            let value = row.get(column)?;
            product = match (&product, value) {
                (Value::Int(a), Value::Int(b)) => Value::Int(a * b),
                _ => Value::Float(product.as_f64()? * value.as_f64()?),
            };
        }
        row.set(self.result_column.as_str(), product);
        Ok(vec![row])
    }
}

/* ===================== Idf ===================== */

/// Store `ln(row[column_b] / row[column_a])` in the result column.
///
/// Note the divisor is the *first* constructor argument. Pipelines lean on
/// this: passing a global-frequency column first and a local-frequency column
/// second yields `ln(local / global)`, i.e. pointwise mutual information.
pub struct Idf {
    column_a: String,
    column_b: String,
    result_column: String,
}

impl Idf {
    /// Store `ln(row[column_b] / row[column_a])` in `result_column`.
    #[must_use]
    pub fn new(
        column_a: impl Into<String>,
        column_b: impl Into<String>,
        result_column: impl Into<String>,
    ) -> Self {
        Self {
            column_a: column_a.into(),
            column_b: column_b.into(),
            result_column: result_column.into(),
        }
    }
}

impl Mapper for Idf {
    fn map(&self, mut row: Row) -> Result<Vec<Row>> {
        let a = row.get(&self.column_a)?.as_f64()?;
        let b = row.get(&self.column_b)?.as_f64()?;
        row.set(self.result_column.as_str(), (b / a).ln());
        Ok(vec![row])
    }
}
