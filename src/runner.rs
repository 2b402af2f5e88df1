//! Graph evaluation: bindings, post-order traversal, and memoization.
//!
//! [`Bindings`] name the actual data behind each reader declared in the graph
//! -- an in-memory vector of rows or a file path, matching whether the reader
//! declared a parser. [`Graph::run`](crate::Graph::run) hands the terminal
//! node here.
//!
//! # Evaluation
//!
//! The runner walks the DAG depth-first in post-order. A pre-pass counts how
//! many consumers each node has in the running DAG; a node feeding more than
//! one consumer is materialized once into a shared buffer keyed by its
//! [`NodeId`], and every consumer receives an independent cursor over that
//! buffer. Single-consumer nodes stay lazy, so map chains keep one row in
//! flight. Readers are never memoized: each consumer re-reads its binding.
//!
//! Memo buffers live for the duration of one run and are dropped when it
//! returns. Execution is single-threaded and pull-driven throughout.

use crate::graph::Graph;
use crate::io;
use crate::node_id::NodeId;
use crate::operation::{Operation, join_streams};
use crate::row::Row;
use crate::stream::{self, RowStream};
use anyhow::{Result, anyhow, bail};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

/// Named data sources for one run.
#[derive(Default)]
pub struct Bindings {
    sources: HashMap<String, SourceData>,
}

enum SourceData {
    Rows(Vec<Row>),
    File(PathBuf),
}

impl Bindings {
    /// No bindings yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to an in-memory sequence of rows, consumed by readers
    /// declared with `read_from_iter`.
    #[must_use]
    pub fn rows(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.sources.insert(name.into(), SourceData::Rows(rows));
        self
    }

    /// Bind `name` to a file path, consumed by readers declared with
    /// `read_from_file`.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.sources
            .insert(name.into(), SourceData::File(path.into()));
        self
    }
}

/// Evaluate `graph` against `bindings` and materialize the terminal stream.
pub(crate) fn run(graph: &Graph, bindings: &Bindings) -> Result<Vec<Row>> {
    let mut consumers = HashMap::new();
    count_consumers(graph, &mut HashSet::new(), &mut consumers);
    let mut runner = Runner {
        bindings,
        consumers,
        memo: HashMap::new(),
    };
    let terminal = runner.evaluate(graph)?;
    stream::materialize(terminal)
}

// Number of DAG edges into each node from the terminal's reachable set; a
// node counted more than once is a fan-out point and gets buffered.
fn count_consumers(
    graph: &Graph,
    seen: &mut HashSet<NodeId>,
    consumers: &mut HashMap<NodeId, usize>,
) {
    if !seen.insert(graph.id()) {
        return;
    }
    for parent in graph.parents() {
        *consumers.entry(parent.id()).or_insert(0) += 1;
        count_consumers(parent, seen, consumers);
    }
}

struct Runner<'a> {
    bindings: &'a Bindings,
    consumers: HashMap<NodeId, usize>,
    memo: HashMap<NodeId, Arc<Vec<Row>>>,
}

impl Runner<'_> {
    fn evaluate(&mut self, graph: &Graph) -> Result<RowStream> {
        let id = graph.id();
        if let Some(rows) = self.memo.get(&id) {
            return Ok(cursor(Arc::clone(rows)));
        }
        let stream = self.produce(graph)?;
        let fan_out = self.consumers.get(&id).copied().unwrap_or(0) > 1;
        if fan_out && graph.operation().is_some() {
            let rows = Arc::new(stream::materialize(stream)?);
            self.memo.insert(id, Arc::clone(&rows));
            return Ok(cursor(rows));
        }
        Ok(stream)
    }

    fn produce(&mut self, graph: &Graph) -> Result<RowStream> {
        match graph.operation() {
            None => self.read(graph),
            Some(Operation::Join { joiner, keys }) => {
                let [left, right] = graph.parents() else {
                    bail!("join node must have exactly two parents");
                };
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(join_streams(Arc::clone(joiner), keys.clone(), left, right))
            }
            Some(operation) => {
                let parent = graph
                    .parents()
                    .first()
                    .ok_or_else(|| anyhow!("operation node is missing its input"))?;
                let input = self.evaluate(parent)?;
                Ok(operation.apply_unary(input))
            }
        }
    }

    fn read(&self, graph: &Graph) -> Result<RowStream> {
        let name = graph
            .source()
            .ok_or_else(|| anyhow!("graph has no data source to read from"))?;
        let source = self
            .bindings
            .sources
            .get(name)
            .ok_or_else(|| anyhow!("no binding named {name:?} was supplied to run"))?;
        match (source, graph.parser()) {
            (SourceData::Rows(rows), None) => Ok(stream::from_rows(rows.clone())),
            (SourceData::File(path), Some(parser)) => io::read_rows(path, Arc::clone(parser)),
            (SourceData::Rows(_), Some(_)) => {
                bail!("binding {name:?} must be a file path: the reader declared a parser")
            }
            (SourceData::File(_), None) => {
                bail!("binding {name:?} must be in-memory rows: the reader declared no parser")
            }
        }
    }
}

fn cursor(rows: Arc<Vec<Row>>) -> RowStream {
    Box::new(SharedCursor { rows, pos: 0 })
}

/// Independent reading position over a memoized buffer.
struct SharedCursor {
    rows: Arc<Vec<Row>>,
    pos: usize,
}

impl Iterator for SharedCursor {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.get(self.pos)?.clone();
        self.pos += 1;
        Some(Ok(row))
    }
}
