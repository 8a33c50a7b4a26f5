//! dag.rs
//! Wraps the low-level GraphRegistry with the typed node constructors and the
//! topological sorter.

use std::collections::{HashMap, VecDeque};

use crate::compute::ledger::{ComputationError, Ledger};
use crate::compute::value::Value;

use super::node::{NodeId, NodeKind, NodeMetadata};
use super::storage::{Children, GraphRegistry};

/// The graph skeleton: node kinds, names, and wiring.
///
/// Holds no computed values; those live in a [`Ledger`]. Nodes are created
/// once and wired immutably, then evaluated any number of times by re-running
/// the sort/forward pair.
#[derive(Debug, Clone, Default)]
pub struct ComputationGraph {
    pub(crate) store: GraphRegistry,
}

impl ComputationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node whose value is injected through the feed mapping.
    pub fn new_input(&mut self, meta: NodeMetadata) -> NodeId {
        self.store.add_node(NodeKind::Input, &[], meta)
    }

    /// Elementwise sum of `x` and `y`.
    pub fn new_add(&mut self, x: NodeId, y: NodeId, meta: NodeMetadata) -> NodeId {
        self.store.add_node(NodeKind::Add, &[x, y], meta)
    }

    /// Affine transform: `dot(inputs, weights) + bias`. Shape compatibility
    /// between the three operands is the caller's precondition.
    pub fn new_linear(
        &mut self,
        inputs: NodeId,
        weights: NodeId,
        bias: NodeId,
        meta: NodeMetadata,
    ) -> NodeId {
        self.store.add_node(NodeKind::Linear, &[inputs, weights, bias], meta)
    }

    /// Elementwise logistic function of `pred`.
    pub fn new_sigmoid(&mut self, pred: NodeId, meta: NodeMetadata) -> NodeId {
        self.store.add_node(NodeKind::Sigmoid, &[pred], meta)
    }

    // --- Accessors ---

    pub fn node_count(&self) -> usize {
        self.store.count()
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.store.kinds[id.index()]
    }

    pub fn meta(&self, id: NodeId) -> &NodeMetadata {
        &self.store.meta[id.index()]
    }

    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        self.store.get_parents(id)
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.store.children(id)
    }

    // --- Graph Algorithms ---

    /// Returns an evaluation order for the subgraph reachable from the fed
    /// inputs, using Kahn's Algorithm, writing each fed value into the ledger
    /// at the moment its input is emitted (exactly once per input).
    ///
    /// Ready nodes drain FIFO and the fed inputs are seeded in ascending id
    /// order, so the emitted order is deterministic for a given graph and
    /// feed. Every reachable node appears exactly once, every predecessor
    /// strictly before its successors.
    ///
    /// A feed key that is not an `Input` node is rejected with
    /// [`ComputationError::NotAnInput`]. If the reachable subgraph contains a
    /// cycle the ready queue drains early and the call fails with
    /// [`ComputationError::CycleDetected`] instead of returning a truncated
    /// order.
    pub fn topological_sort(
        &self,
        feed: &HashMap<NodeId, Value>,
        ledger: &mut Ledger,
    ) -> Result<Vec<NodeId>, ComputationError> {
        let count = self.store.count();
        let mut discovered = vec![false; count];
        let mut remaining_in = vec![0usize; count];

        let mut inputs: Vec<NodeId> = feed.keys().copied().collect();
        inputs.sort_unstable();
        for &id in &inputs {
            if self.kind(id) != NodeKind::Input {
                return Err(ComputationError::NotAnInput {
                    name: self.meta(id).name.clone(),
                });
            }
            discovered[id.index()] = true;
        }

        // 1. Discovery: BFS over child links from the fed inputs. Incoming
        // edges are counted per occurrence, so duplicate parents are two
        // edges; edges from undiscovered nodes (e.g. an unfed input) do not
        // exist as far as this pass is concerned.
        let mut reachable = inputs.len();
        let mut queue: VecDeque<NodeId> = inputs.iter().copied().collect();
        while let Some(node) = queue.pop_front() {
            for child in self.children(node) {
                let idx = child.index();
                remaining_in[idx] += 1;
                if !discovered[idx] {
                    discovered[idx] = true;
                    reachable += 1;
                    queue.push_back(child);
                }
            }
        }

        // 2. Drain the ready queue.
        ledger.ensure_capacity(count);
        let mut ready: VecDeque<NodeId> = inputs.into();
        let mut order = Vec::with_capacity(reachable);
        while let Some(node) = ready.pop_front() {
            if let Some(value) = feed.get(&node) {
                ledger.insert(node, value.clone());
            }
            order.push(node);
            for child in self.children(node) {
                let idx = child.index();
                remaining_in[idx] -= 1;
                if remaining_in[idx] == 0 {
                    ready.push_back(child);
                }
            }
        }

        if order.len() != reachable {
            return Err(ComputationError::CycleDetected {
                emitted: order.len(),
                discovered: reachable,
            });
        }

        Ok(order)
    }
}
