//! A minimal computation-graph engine.
//!
//! Nodes form a DAG wired immutably at construction time.
//! [`ComputationGraph::topological_sort`] produces an evaluation order for
//! the subgraph reachable from the fed inputs (Kahn's Algorithm), and
//! [`Engine::forward_pass`] evaluates every node in that order and returns
//! the output node's value.
//!
//! ```
//! use dagflow::{ComputationGraph, Engine, Ledger, NodeMetadata, Value};
//! use std::collections::HashMap;
//!
//! let mut g = ComputationGraph::new();
//! let a = g.new_input(NodeMetadata::named("a"));
//! let b = g.new_input(NodeMetadata::named("b"));
//! let sum = g.new_add(a, b, NodeMetadata::named("sum"));
//!
//! let feed = HashMap::from([(a, Value::Scalar(5.0)), (b, Value::Scalar(10.0))]);
//! let mut ledger = Ledger::new();
//! let order = g.topological_sort(&feed, &mut ledger).unwrap();
//! let out = Engine::new(&g).forward_pass(sum, &order, &mut ledger).unwrap();
//! assert_eq!(out, Value::Scalar(15.0));
//! ```
//!
//! Evaluation is single-threaded and synchronous; one pass is in flight at a
//! time over a given ledger.

pub mod compute;
pub mod display;
pub mod graph;

pub use compute::{ComputationError, Engine, Ledger, Value};
pub use display::format_trace;
pub use graph::{ComputationGraph, NodeId, NodeKind, NodeMetadata};
