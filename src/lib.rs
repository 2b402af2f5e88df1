//! # Rowflow
//!
//! A **computational-graph library** for streams of structured records. Rows
//! are ordered mappings from string column names to dynamically typed values;
//! a [`Graph`] is an immutable DAG of operations over lazy row streams, built
//! declaratively and executed by supplying named data sources at run time.
//!
//! ## Key features
//!
//! - **Declarative construction** -- chain `map` / `reduce` / `count` / `sort`
//!   / `join` builders; every builder returns a new graph value, so sub-graphs
//!   compose and can feed any number of consumers.
//! - **Streaming operators** -- per-row mappers run with one row in flight; the
//!   group reducer holds one group at a time; the join is a streaming
//!   sort-merge with inner, outer, left, and right strategies.
//! - **Shared-work memoization** -- a sub-graph feeding several branches is
//!   materialized once per run and fanned out.
//! - **Dynamic rows** -- no schema; values are integers, doubles, strings, or
//!   coordinate pairs, compared with numeric cross-type semantics.
//!
//! ## Quick start
//!
//! ```no_run
//! use rowflow::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! // Build a word count graph
//! let graph = Graph::new()
//!     .read_from_iter("docs")
//!     .map(FilterPunctuation::new("text"))
//!     .map(LowerCase::new("text"))
//!     .map(Split::new("text"))
//!     .sort(&["text"])
//!     .reduce(Count::new("count"), &["text"]);
//!
//! // Execute it against concrete data
//! let rows = graph.run(Bindings::new().rows("docs", vec![
//!     row! { "doc_id" => 1, "text" => "hello, hello world" },
//! ]))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core concepts
//!
//! ### `Graph`
//!
//! A [`Graph`] is a plain immutable value describing one node of the DAG.
//! Builders never mutate the receiver; sharing a graph as the parent of two
//! downstream graphs is how diamond-shaped pipelines (TF-IDF, PMI) are
//! expressed. Readers declared with [`read_from_iter`](Graph::read_from_iter)
//! or [`read_from_file`](Graph::read_from_file) name their data source; the
//! actual rows or file path arrive through [`Bindings`] at
//! [`run`](Graph::run) time.
//!
//! ### Kernels
//!
//! Operations host pluggable kernels: [`Mapper`]s transform single rows
//! ([`LowerCase`], [`Split`], [`Project`], the [`Filter`] /
//! [`ApplyFunction`] escape hatches, …), [`Reducer`]s aggregate groups
//! ([`Count`], [`Sum`], [`Average`], [`TopN`], [`TermFrequency`], …), and
//! [`Joiner`]s decide what each aligned pair of equal-key groups produces.
//! All three are open traits; implement them for custom behavior.
//!
//! ### Execution
//!
//! [`Graph::run`] evaluates the DAG depth-first, single-threaded and
//! pull-driven, and returns the fully materialized terminal rows. `Reduce`
//! requires input pre-sorted by its keys -- append [`sort`](Graph::sort)
//! upstream; `Join` sorts its own inputs. Every failure (missing binding,
//! parse error, missing column, type mismatch) aborts the run.
//!
//! ## Recipes
//!
//! The [`recipes`] module packages complete pipelines -- word count, TF-IDF,
//! pointwise mutual information, and per-edge average speed from GPS traces --
//! as reusable graph constructors parameterized by column names.
//!
//! ## Module overview
//!
//! - [`row`] -- `Row`, `Value`, and the `row!` literal macro
//! - [`graph`] -- the `Graph` value and construction API
//! - [`operation`] -- operation node kinds and their stream drivers
//! - [`mappers`] / [`reducers`] / [`joiners`] -- the kernel families
//! - [`runner`] -- bindings and the memoizing evaluator
//! - [`io`] -- line-oriented file reading, JSONL row decoding
//! - [`recipes`] -- ready-made pipelines
//! - [`testing`] -- row assertions and fixtures

pub mod graph;
pub mod io;
pub mod joiners;
pub mod mappers;
pub mod node_id;
pub mod operation;
pub mod recipes;
pub mod reducers;
pub mod row;
pub mod runner;
pub mod stream;
pub mod testing;

// General re-exports
pub use graph::{Graph, LineParser};
pub use joiners::{InnerJoiner, Joiner, LeftJoiner, OuterJoiner, RightJoiner, Suffixes};
pub use mappers::{
    ApplyFunction, DummyMapper, Filter, FilterPunctuation, Idf, LowerCase, Mapper, Product,
    Project, Split,
};
pub use node_id::NodeId;
pub use operation::Operation;
pub use reducers::{Average, Count, FirstReducer, Reducer, RowsCounter, Sum, TermFrequency, TopN};
pub use row::{Row, Value};
pub use runner::Bindings;
pub use stream::RowStream;
