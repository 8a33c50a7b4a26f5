//! ledger.rs
//! Value slots for one evaluation, plus the error taxonomy.

use thiserror::Error;

use crate::compute::value::Value;
use crate::graph::node::NodeId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("cycle detected: only {emitted} of {discovered} reachable nodes could be ordered")]
    CycleDetected { emitted: usize, discovered: usize },
    #[error("node '{name}' is not an input and cannot be fed")]
    NotAnInput { name: String },
    #[error("input '{name}' was never fed a value")]
    UnfedInput { name: String },
    #[error("no value for node '{name}'; the evaluation order did not cover it")]
    MissingValue { name: String },
    #[error("node '{name}' expects {expected} predecessors, found {actual}")]
    ParentCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("shape mismatch in {op}: {msg}")]
    ShapeMismatch { op: &'static str, msg: String },
}

/// Dense value slots, indexed by `NodeId`.
///
/// The graph skeleton never holds computed values; one `Ledger` holds the
/// mutable state of one evaluation. It survives across passes, which is what
/// lets a re-run skip re-feeding unchanged inputs.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    values: Vec<Option<Value>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_capacity(&mut self, size: usize) {
        if self.values.len() < size {
            self.values.resize(size, None);
        }
    }

    #[inline(always)]
    pub fn get(&self, node_id: NodeId) -> Option<&Value> {
        self.values.get(node_id.index())?.as_ref()
    }

    #[inline(always)]
    pub fn insert(&mut self, node_id: NodeId, value: Value) {
        let idx = node_id.index();
        if idx >= self.values.len() {
            self.values.resize(idx + 1, None);
        }
        self.values[idx] = Some(value);
    }

    pub fn invalidate(&mut self, node_ids: impl IntoIterator<Item = NodeId>) {
        for id in node_ids {
            if let Some(slot) = self.values.get_mut(id.index()) {
                *slot = None;
            }
        }
    }
}
