//! A synchronous, single-threaded forward-pass driver.

use smallvec::SmallVec;

use crate::compute::kernel;
use crate::compute::ledger::{ComputationError, Ledger};
use crate::compute::value::Value;
use crate::graph::{ComputationGraph, NodeId, NodeKind};

pub struct Engine<'a> {
    graph: &'a ComputationGraph,
}

impl<'a> Engine<'a> {
    pub fn new(graph: &'a ComputationGraph) -> Self {
        Self { graph }
    }

    /// Evaluates every node in `order`, in that order with no skipping, then
    /// returns the output node's value.
    ///
    /// `order` is normally the sorter's output, but any sequence that places
    /// every predecessor before its successors is accepted. One evaluation is
    /// in flight at a time per ledger; the mutable borrow makes a concurrent
    /// second pass unrepresentable.
    pub fn forward_pass(
        &self,
        output: NodeId,
        order: &[NodeId],
        ledger: &mut Ledger,
    ) -> Result<Value, ComputationError> {
        for &id in order {
            let value = self.evaluate(id, ledger)?;
            ledger.insert(id, value);
        }
        ledger
            .get(output)
            .cloned()
            .ok_or_else(|| ComputationError::MissingValue {
                name: self.graph.meta(output).name.clone(),
            })
    }

    /// Computes one node's value from its predecessors' current values.
    fn evaluate(&self, id: NodeId, ledger: &Ledger) -> Result<Value, ComputationError> {
        match self.graph.kind(id) {
            // The one kind whose value originates outside the predecessor
            // chain: the sorter fed it, or a previous pass left it in place.
            NodeKind::Input => {
                ledger
                    .get(id)
                    .cloned()
                    .ok_or_else(|| ComputationError::UnfedInput {
                        name: self.graph.meta(id).name.clone(),
                    })
            }
            kind => {
                let vals = self.parent_values(id, kind, ledger)?;
                match kind {
                    NodeKind::Add => kernel::add(vals[0], vals[1]),
                    NodeKind::Linear => kernel::add(&kernel::dot(vals[0], vals[1])?, vals[2]),
                    NodeKind::Sigmoid => Ok(kernel::sigmoid(vals[0])),
                    NodeKind::Input => unreachable!(),
                }
            }
        }
    }

    fn parent_values<'l>(
        &self,
        id: NodeId,
        kind: NodeKind,
        ledger: &'l Ledger,
    ) -> Result<SmallVec<[&'l Value; 3]>, ComputationError> {
        let parents = self.graph.parents(id);
        if parents.len() != kind.arity() {
            return Err(ComputationError::ParentCountMismatch {
                name: self.graph.meta(id).name.clone(),
                expected: kind.arity(),
                actual: parents.len(),
            });
        }
        let mut vals = SmallVec::new();
        for &pid in parents {
            let value = ledger.get(pid).ok_or_else(|| {
                let name = self.graph.meta(pid).name.clone();
                match self.graph.kind(pid) {
                    NodeKind::Input => ComputationError::UnfedInput { name },
                    _ => ComputationError::MissingValue { name },
                }
            })?;
            vals.push(value);
        }
        Ok(vals)
    }
}
