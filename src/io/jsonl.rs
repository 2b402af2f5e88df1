//! JSON Lines row decoding.
//!
//! One self-delimited JSON object per line; keys are column names, values are
//! the [`Value`](crate::Value) types (integer, double, string, two-element
//! number array for coordinates).

use crate::row::Row;
use anyhow::{Context, Result};
use std::path::Path;

/// Decode one JSON object line into a [`Row`].
///
/// This is the stock parser to hand to
/// [`read_from_file`](crate::Graph::read_from_file).
///
/// # Errors
/// Fails if the line is not a JSON object of supported value types.
pub fn parse_row(line: &str) -> Result<Row> {
    serde_json::from_str(line).with_context(|| format!("decode JSON row from {line:?}"))
}

/// Read a whole JSONL file into memory.
///
/// Empty and whitespace-only lines are skipped.
///
/// # Errors
/// Fails if the file cannot be opened or any non-empty line fails to decode.
/// Errors include the line number.
pub fn read_rows_vec(path: impl AsRef<Path>) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row =
            parse_row(line).with_context(|| format!("parse line {} in {}", i + 1, path.display()))?;
        out.push(row);
    }
    Ok(out)
}
