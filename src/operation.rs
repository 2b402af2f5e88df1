//! Operation node kinds and the stream drivers that interpret them.
//!
//! This module defines:
//! - [`Operation`]: the node kinds the runner interprets -- `Map`, `Reduce`,
//!   `CountAll`, `Sort`, and `Join`. Readers carry no operation and are
//!   handled by the runner directly.
//! - The iterator-to-iterator **drivers** hosting the kernels: per-row
//!   flat-mapping for `Map`, consecutive-run grouping for `Reduce`, whole
//!   stream aggregation for `CountAll`, materializing stable sort for `Sort`,
//!   and the streaming sort-merge loop for `Join`.
//!
//! # Suspension points
//!
//! `Map` streams row-by-row with O(1) rows in flight. `Reduce` holds one
//! group at a time. `Sort` and `CountAll` materialize their input. `Join`
//! sorts both inputs (so both sides are materialized) and then merges in a
//! single forward pass, draining one joiner invocation's output at a time.
//!
//! # Pre-conditions
//!
//! `Reduce` requires its input pre-sorted by the grouping keys, and the
//! sort-merge loop relies on its internally sorted inputs. Feeding `Reduce`
//! an unsorted stream is not detected and silently produces one group per
//! maximal equal-key run.

use crate::joiners::Joiner;
use crate::mappers::Mapper;
use crate::reducers::Reducer;
use crate::row::{Row, Value};
use crate::stream::{self, KeyRuns, RowStream};
use anyhow::Result;
use std::cmp::Ordering;
use std::sync::Arc;

/// A node kind in the computation graph.
#[derive(Clone)]
pub enum Operation {
    /// Apply a per-row kernel to every row.
    Map(Arc<dyn Mapper>),
    /// Group a pre-sorted stream by a key tuple and reduce each group.
    Reduce {
        /// Group kernel.
        reducer: Arc<dyn Reducer>,
        /// Grouping columns; the input must be sorted by them.
        keys: Vec<String>,
    },
    /// Reduce the entire stream as a single group.
    CountAll {
        /// Group kernel, invoked once.
        reducer: Arc<dyn Reducer>,
        /// Key columns handed to the kernel (no grouping happens).
        keys: Vec<String>,
    },
    /// Stable sort by a key tuple; materializes the stream.
    Sort {
        /// Sort columns, compared lexicographically as a tuple.
        keys: Vec<String>,
    },
    /// Streaming sort-merge join of two inputs.
    Join {
        /// Join strategy.
        joiner: Arc<dyn Joiner>,
        /// Join-key columns.
        keys: Vec<String>,
    },
}

impl Operation {
    /// Drive this operation over a single input stream.
    ///
    /// `Join` is the one binary operation; the runner dispatches it through
    /// [`join_streams`] instead.
    pub(crate) fn apply_unary(&self, input: RowStream) -> RowStream {
        match self {
            Operation::Map(mapper) => map_stream(Arc::clone(mapper), input),
            Operation::Reduce { reducer, keys } => {
                reduce_stream(Arc::clone(reducer), keys.clone(), input)
            }
            Operation::CountAll { reducer, keys } => count_all_stream(reducer, keys, input),
            Operation::Sort { keys } => sort_stream(keys.clone(), input),
            Operation::Join { .. } => unreachable!("join is driven over two inputs"),
        }
    }
}

/// Lazy per-row expansion: each input row becomes the kernel's output rows.
fn map_stream(mapper: Arc<dyn Mapper>, input: RowStream) -> RowStream {
    Box::new(input.flat_map(move |item| match item.and_then(|row| mapper.map(row)) {
        Ok(rows) => rows.into_iter().map(Ok).collect::<Vec<_>>(),
        Err(e) => vec![Err(e)],
    }))
}

/// Group consecutive equal-key runs and concatenate the reducer's outputs.
fn reduce_stream(reducer: Arc<dyn Reducer>, keys: Vec<String>, input: RowStream) -> RowStream {
    let runs = KeyRuns::new(input, keys.clone());
    Box::new(runs.flat_map(move |item| {
        match item.and_then(|(_, group)| reducer.reduce(&keys, group)) {
            Ok(rows) => rows.into_iter().map(Ok).collect::<Vec<_>>(),
            Err(e) => vec![Err(e)],
        }
    }))
}

/// Hand the whole stream to the reducer as one group.
fn count_all_stream(reducer: &Arc<dyn Reducer>, keys: &[String], input: RowStream) -> RowStream {
    let result = stream::materialize(input).and_then(|rows| reducer.reduce(keys, rows));
    match result {
        Ok(rows) => stream::from_rows(rows),
        Err(e) => stream::from_error(e),
    }
}

/// Materializing stable sort by the key tuple.
fn sort_stream(keys: Vec<String>, input: RowStream) -> RowStream {
    match sort_rows(&keys, input) {
        Ok(rows) => stream::from_rows(rows),
        Err(e) => stream::from_error(e),
    }
}

fn sort_rows(keys: &[String], input: RowStream) -> Result<Vec<Row>> {
    let rows = stream::materialize(input)?;
    let mut decorated: Vec<(Vec<Value>, Row)> = rows
        .into_iter()
        .map(|row| Ok((row.key_tuple(keys)?, row)))
        .collect::<Result<_>>()?;
    decorated.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(decorated.into_iter().map(|(_, row)| row).collect())
}

/// Drive a sort-merge join over two input streams.
///
/// Both inputs are sorted by the join keys (stable), grouped into equal-key
/// runs, and merge-advanced: a key present on only one side is handed to the
/// joiner with the other side absent; equal keys are handed over together.
pub(crate) fn join_streams(
    joiner: Arc<dyn Joiner>,
    keys: Vec<String>,
    left: RowStream,
    right: RowStream,
) -> RowStream {
    let left = sort_stream(keys.clone(), left);
    let right = sort_stream(keys.clone(), right);
    Box::new(SortMergeJoin {
        left: KeyRuns::new(left, keys.clone()),
        right: KeyRuns::new(right, keys.clone()),
        joiner,
        keys,
        left_group: None,
        right_group: None,
        pending: Vec::new().into_iter(),
        started: false,
        failed: false,
    })
}

type KeyedGroup = (Vec<Value>, Vec<Row>);

/// The merge loop of the sort-merge join, as a pull-driven iterator.
///
/// Holds at most one group per side plus the not-yet-drained output of the
/// latest joiner invocation.
struct SortMergeJoin {
    left: KeyRuns,
    right: KeyRuns,
    joiner: Arc<dyn Joiner>,
    keys: Vec<String>,
    left_group: Option<KeyedGroup>,
    right_group: Option<KeyedGroup>,
    pending: std::vec::IntoIter<Row>,
    started: bool,
    failed: bool,
}

enum Advance {
    Left,
    Right,
    Both,
}

impl SortMergeJoin {
    fn fail(&mut self, err: anyhow::Error) -> Option<Result<Row>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl Iterator for SortMergeJoin {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            if !self.started {
                self.started = true;
                self.left_group = match self.left.next().transpose() {
                    Ok(group) => group,
                    Err(e) => return self.fail(e),
                };
                self.right_group = match self.right.next().transpose() {
                    Ok(group) => group,
                    Err(e) => return self.fail(e),
                };
            }
            let advance = match (&self.left_group, &self.right_group) {
                (None, None) => return None,
                (None, Some(_)) => Advance::Right,
                (Some(_), None) => Advance::Left,
                (Some((lk, _)), Some((rk, _))) => match lk.cmp(rk) {
                    Ordering::Less => Advance::Left,
                    Ordering::Greater => Advance::Right,
                    Ordering::Equal => Advance::Both,
                },
            };
            let produced = match advance {
                Advance::Left => {
                    let (_, group) = self.left_group.take().expect("left group present");
                    self.left_group = match self.left.next().transpose() {
                        Ok(next) => next,
                        Err(e) => return self.fail(e),
                    };
                    self.joiner.join(&self.keys, Some(&group), None)
                }
                Advance::Right => {
                    let (_, group) = self.right_group.take().expect("right group present");
                    self.right_group = match self.right.next().transpose() {
                        Ok(next) => next,
                        Err(e) => return self.fail(e),
                    };
                    self.joiner.join(&self.keys, None, Some(&group))
                }
                Advance::Both => {
                    let (_, lgroup) = self.left_group.take().expect("left group present");
                    let (_, rgroup) = self.right_group.take().expect("right group present");
                    self.left_group = match self.left.next().transpose() {
                        Ok(next) => next,
                        Err(e) => return self.fail(e),
                    };
                    self.right_group = match self.right.next().transpose() {
                        Ok(next) => next,
                        Err(e) => return self.fail(e),
                    };
                    self.joiner.join(&self.keys, Some(&lgroup), Some(&rgroup))
                }
            };
            match produced {
                Ok(rows) => self.pending = rows.into_iter(),
                Err(e) => return self.fail(e),
            }
        }
    }
}
