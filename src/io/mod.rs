//! Reading rows from line-oriented files.
//!
//! A file reader yields one row per line, decoded by the parser attached to
//! the reader node ([`jsonl::parse_row`] is the stock choice). The file is
//! opened when the reader is evaluated and the handle lives exactly as long
//! as the stream; I/O and parse failures surface as stream errors carrying
//! the line number and path.

pub mod jsonl;

use crate::graph::LineParser;
use crate::stream::RowStream;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Open `path` and stream one parsed row per line.
///
/// # Errors
/// Fails immediately if the file cannot be opened; read and parse failures
/// surface as items of the returned stream.
pub(crate) fn read_rows(path: &Path, parser: LineParser) -> Result<RowStream> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let path = path.to_path_buf();
    let lines = BufReader::new(file).lines();
    Ok(Box::new(lines.enumerate().map(move |(i, line)| {
        let line = line.with_context(|| format!("read line {} in {}", i + 1, path.display()))?;
        parser(&line).with_context(|| format!("parse line {} in {}", i + 1, path.display()))
    })))
}
