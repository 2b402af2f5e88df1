//! Lazy row streams carried between nodes at runtime.
//!
//! A [`RowStream`] is a single-pass, forward-only iterator of fallible rows.
//! Errors flow inline as items; the runner stops at the first error when it
//! materializes the terminal stream, so a failure anywhere in the pipeline
//! surfaces as the failure of the whole run.
//!
//! Streams must not be assumed restartable. When a node's output feeds more
//! than one consumer, the runner buffers it and hands out independent cursors;
//! see [`crate::runner`].

use crate::row::{Row, Value};
use anyhow::Result;
use std::iter::Peekable;

/// A single-pass stream of rows produced by one node for one consumer.
pub type RowStream = Box<dyn Iterator<Item = Result<Row>>>;

/// Wrap an in-memory vector as a stream.
pub fn from_rows(rows: Vec<Row>) -> RowStream {
    Box::new(rows.into_iter().map(Ok))
}

/// A stream holding a single error.
pub fn from_error(err: anyhow::Error) -> RowStream {
    Box::new(std::iter::once(Err(err)))
}

/// Drain a stream into memory, stopping at the first error.
pub fn materialize(stream: RowStream) -> Result<Vec<Row>> {
    stream.collect()
}

/// Groups a stream into maximal runs of consecutive rows sharing the same
/// key tuple.
///
/// One group is held in memory at a time. The input is expected to be sorted
/// by `keys` for the runs to be true groups; that pre-condition is the
/// caller's (it is not detectable here without buffering the whole stream).
///
/// After yielding an error the iterator is fused.
pub(crate) struct KeyRuns {
    rows: Peekable<RowStream>,
    keys: Vec<String>,
    failed: bool,
}

impl KeyRuns {
    pub(crate) fn new(stream: RowStream, keys: Vec<String>) -> Self {
        Self {
            rows: stream.peekable(),
            keys,
            failed: false,
        }
    }

    fn fail(&mut self, err: anyhow::Error) -> Option<<Self as Iterator>::Item> {
        self.failed = true;
        Some(Err(err))
    }
}

impl Iterator for KeyRuns {
    type Item = Result<(Vec<Value>, Vec<Row>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let first = match self.rows.next()? {
            Ok(row) => row,
            Err(e) => return self.fail(e),
        };
        let key = match first.key_tuple(&self.keys) {
            Ok(key) => key,
            Err(e) => return self.fail(e),
        };
        let mut group = vec![first];
        loop {
            match self.rows.peek() {
                None => break,
                Some(Err(_)) => {
                    // Surface the error instead of a truncated group.
                    let e = self
                        .rows
                        .next()
                        .expect("peeked item present")
                        .expect_err("peeked item was an error");
                    return self.fail(e);
                }
                Some(Ok(row)) => match row.key_tuple(&self.keys) {
                    Err(e) => return self.fail(e),
                    Ok(next_key) if next_key == key => {
                        let row = self
                            .rows
                            .next()
                            .expect("peeked item present")
                            .expect("peeked item was a row");
                        group.push(row);
                    }
                    Ok(_) => break,
                },
            }
        }
        Some(Ok((key, group)))
    }
}
