//! The immutable computation-graph value and its construction API.
//!
//! A [`Graph`] is a cheap handle (`Arc`) to one node of a DAG: an optional
//! [`Operation`], up to two parent graphs, and -- for readers -- the declared
//! data-source binding name plus an optional line parser. Every builder
//! method returns a **new** graph whose parent is the receiver; existing
//! nodes are never mutated, so a graph value can safely be the parent of any
//! number of downstream graphs (that sharing is what the runner memoizes).
//!
//! Construction is pure: no evaluation happens until [`Graph::run`], which
//! takes the [`Bindings`](crate::Bindings) naming the actual data sources.
//!
//! # Example
//! ```no_run
//! use rowflow::{Bindings, Count, Graph, LowerCase, Split, row};
//!
//! let counts = Graph::new()
//!     .read_from_iter("docs")
//!     .map(LowerCase::new("text"))
//!     .map(Split::new("text"))
//!     .sort(&["text"])
//!     .reduce(Count::new("count"), &["text"]);
//!
//! let rows = counts.run(Bindings::new().rows("docs", vec![
//!     row! { "text" => "To be OR not to be" },
//! ]))?;
//! # anyhow::Result::<()>::Ok(())
//! ```

use crate::joiners::Joiner;
use crate::mappers::Mapper;
use crate::node_id::NodeId;
use crate::operation::Operation;
use crate::reducers::Reducer;
use crate::row::Row;
use crate::runner::{self, Bindings};
use anyhow::Result;
use std::sync::Arc;

/// Parser turning one input line into a [`Row`], attached to file readers.
pub type LineParser = Arc<dyn Fn(&str) -> Result<Row> + Send + Sync>;

/// One node of a computation DAG; see the [module docs](self).
#[derive(Clone)]
pub struct Graph {
    node: Arc<GraphNode>,
}

pub(crate) struct GraphNode {
    id: NodeId,
    operation: Option<Operation>,
    parents: Vec<Graph>,
    source: Option<String>,
    parser: Option<LineParser>,
}

impl Graph {
    /// An empty graph. Extend it with a reader before running it.
    #[must_use]
    pub fn new() -> Self {
        Self::node(None, Vec::new(), None, None)
    }

    fn node(
        operation: Option<Operation>,
        parents: Vec<Graph>,
        source: Option<String>,
        parser: Option<LineParser>,
    ) -> Self {
        Self {
            node: Arc::new(GraphNode {
                id: NodeId::fresh(),
                operation,
                parents,
                source,
                parser,
            }),
        }
    }

    /// Declare a reader over an in-memory row source.
    ///
    /// `name` selects which binding supplied to [`Graph::run`] this reader
    /// consumes; several readers may share one name, each reading the binding
    /// independently.
    #[must_use]
    pub fn read_from_iter(&self, name: impl Into<String>) -> Graph {
        Self::node(None, Vec::new(), Some(name.into()), None)
    }

    /// Declare a reader over a file bound at run time, decoding one row per
    /// line with `parser`.
    #[must_use]
    pub fn read_from_file(
        &self,
        name: impl Into<String>,
        parser: impl Fn(&str) -> Result<Row> + Send + Sync + 'static,
    ) -> Graph {
        Self::node(None, Vec::new(), Some(name.into()), Some(Arc::new(parser)))
    }

    /// Extend with a per-row transform.
    #[must_use]
    pub fn map(&self, mapper: impl Mapper + 'static) -> Graph {
        self.extend(Operation::Map(Arc::new(mapper)))
    }

    /// Extend with a grouping reduction.
    ///
    /// The upstream stream must already be sorted by `keys`; this is a
    /// pre-condition, not checked at run time.
    #[must_use]
    pub fn reduce(&self, reducer: impl Reducer + 'static, keys: &[&str]) -> Graph {
        self.extend(Operation::Reduce {
            reducer: Arc::new(reducer),
            keys: owned(keys),
        })
    }

    /// Extend with a whole-stream reduction: the reducer is invoked once over
    /// every row, with `keys` passed through as the key columns.
    #[must_use]
    pub fn count(&self, reducer: impl Reducer + 'static, keys: &[&str]) -> Graph {
        self.extend(Operation::CountAll {
            reducer: Arc::new(reducer),
            keys: owned(keys),
        })
    }

    /// Extend with a stable sort by the tuple of `keys`.
    #[must_use]
    pub fn sort(&self, keys: &[&str]) -> Graph {
        self.extend(Operation::Sort { keys: owned(keys) })
    }

    /// Extend with a sort-merge join against `other` on `keys`, using the
    /// given strategy. The receiver is the left side.
    #[must_use]
    pub fn join(&self, joiner: impl Joiner + 'static, other: &Graph, keys: &[&str]) -> Graph {
        Self::node(
            Some(Operation::Join {
                joiner: Arc::new(joiner),
                keys: owned(keys),
            }),
            vec![self.clone(), other.clone()],
            None,
            None,
        )
    }

    /// Evaluate the graph against the given bindings and materialize the
    /// terminal stream.
    ///
    /// Shared sub-graphs are computed once per run; readers re-read their
    /// binding per consumer.
    ///
    /// # Errors
    /// Any failure -- missing binding, parse failure, missing column, type
    /// mismatch -- aborts the run; no partial output is returned.
    pub fn run(&self, bindings: Bindings) -> Result<Vec<Row>> {
        runner::run(self, &bindings)
    }

    fn extend(&self, operation: Operation) -> Graph {
        Self::node(Some(operation), vec![self.clone()], None, None)
    }

    pub(crate) fn id(&self) -> NodeId {
        self.node.id
    }

    pub(crate) fn operation(&self) -> Option<&Operation> {
        self.node.operation.as_ref()
    }

    pub(crate) fn parents(&self) -> &[Graph] {
        &self.node.parents
    }

    pub(crate) fn source(&self) -> Option<&str> {
        self.node.source.as_deref()
    }

    pub(crate) fn parser(&self) -> Option<&LineParser> {
        self.node.parser.as_ref()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

fn owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| (*k).to_owned()).collect()
}
