//! The unit of data flowing through a graph: [`Row`], an ordered mapping from
//! column name to a dynamically typed [`Value`].
//!
//! Rows are plain values. Operators produce new rows (or hand back the one they
//! were given); nothing in the engine shares a row between two consumers, so
//! kernels are free to mutate a row in place before yielding it.
//!
//! # Value semantics
//!
//! [`Value`] is a closed set of variants: integers, doubles, strings, and a
//! pair of doubles used for geographic coordinates. Numeric variants compare
//! *numerically* with each other (`Int(1) == Float(1.0)`), floats order
//! totally via `OrderedFloat`, and the remaining cross-type comparisons fall
//! back to a fixed variant rank so sorting any column is always well-defined.
//!
//! # Example
//! ```
//! use rowflow::{row, Value};
//!
//! let r = row! { "doc_id" => 1, "text" => "hello world" };
//! assert_eq!(r.get("doc_id").unwrap(), &Value::Int(1));
//! ```

use anyhow::{Result, anyhow, bail};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed cell value.
///
/// Serde representation is untagged: JSON integers become [`Value::Int`],
/// floats [`Value::Float`], strings [`Value::Str`], and two-element number
/// arrays [`Value::Coord`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Signed integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// A `(longitude, latitude)` pair of doubles.
    Coord(f64, f64),
}

impl Value {
    /// Numeric view of the value.
    ///
    /// # Errors
    /// Fails for non-numeric variants.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Int(v) => Ok(*v as f64),
            Value::Float(v) => Ok(*v),
            other => bail!("expected a numeric value, got {other:?}"),
        }
    }

    /// Integer view of the value.
    ///
    /// # Errors
    /// Fails unless the value is [`Value::Int`].
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Value::Int(v) => Ok(*v),
            other => bail!("expected an integer value, got {other:?}"),
        }
    }

    /// String view of the value.
    ///
    /// # Errors
    /// Fails unless the value is [`Value::Str`].
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Str(v) => Ok(v),
            other => bail!("expected a string value, got {other:?}"),
        }
    }

    /// Coordinate-pair view of the value.
    ///
    /// # Errors
    /// Fails unless the value is [`Value::Coord`].
    pub fn as_coord(&self) -> Result<(f64, f64)> {
        match self {
            Value::Coord(x, y) => Ok((*x, *y)),
            other => bail!("expected a coordinate pair, got {other:?}"),
        }
    }

    // Cross-type ordering fallback. Numeric variants share a rank; they never
    // reach the fallback because the numeric arms of `cmp` handle them.
    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) | Value::Float(_) => 0,
            Value::Str(_) => 1,
            Value::Coord(..) => 2,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            (Int(a), Float(b)) => OrderedFloat(*a as f64).cmp(&OrderedFloat(*b)),
            (Float(a), Int(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b as f64)),
            (Float(a), Float(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (Str(a), Str(b)) => a.cmp(b),
            (Coord(ax, ay), Coord(bx, by)) => OrderedFloat(*ax)
                .cmp(&OrderedFloat(*bx))
                .then_with(|| OrderedFloat(*ay).cmp(&OrderedFloat(*by))),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
            Value::Coord(x, y) => write!(f, "({x}, {y})"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<(f64, f64)> for Value {
    fn from((x, y): (f64, f64)) -> Self {
        Value::Coord(x, y)
    }
}

/// An ordered mapping from column name to [`Value`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    columns: BTreeMap<String, Value>,
}

impl Row {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a column.
    ///
    /// # Errors
    /// Fails if the row has no such column.
    pub fn get(&self, column: &str) -> Result<&Value> {
        self.columns
            .get(column)
            .ok_or_else(|| anyhow!("row has no column {column:?}"))
    }

    /// Look up a column, `None` when absent.
    #[must_use]
    pub fn try_get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Insert or replace a column.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Remove a column, returning its value if present.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.columns.remove(column)
    }

    /// Whether the row carries the column.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Iterate `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The tuple of this row's values under `keys`, in key order.
    ///
    /// This is the composite sort/group/join key used by the drivers.
    ///
    /// # Errors
    /// Fails if any key column is absent.
    pub fn key_tuple(&self, keys: &[String]) -> Result<Vec<Value>> {
        keys.iter().map(|k| self.get(k).cloned()).collect()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

/// Build a [`Row`] from `column => value` pairs.
///
/// ```
/// use rowflow::row;
///
/// let r = row! { "id" => 7, "text" => "seven" };
/// assert_eq!(r.len(), 2);
/// ```
#[macro_export]
macro_rules! row {
    ($($column:expr => $value:expr),* $(,)?) => {{
        let mut r = $crate::Row::new();
        $( r.set($column, $value); )*
        r
    }};
}
