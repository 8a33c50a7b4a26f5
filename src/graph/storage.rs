//! storage.rs
//! Dense Columnar Layout: CSR parent lists plus a linked-list child adjacency.

use std::collections::HashSet;

use crate::graph::node::{NodeId, NodeKind, NodeMetadata};

const NO_EDGE: u32 = u32::MAX;

/// Columnar node storage.
///
/// Topology is wired in exactly one place: [`GraphRegistry::add_node`]. It
/// records the predecessor list verbatim and appends one child back-reference
/// per predecessor occurrence, synchronously, before the new id is returned.
/// Parent ranges are never touched again; the child adjacency is append-only.
#[derive(Debug, Clone, Default)]
pub struct GraphRegistry {
    pub kinds: Vec<NodeKind>,
    pub meta: Vec<NodeMetadata>,

    // Dense Topology (CSR)
    pub parents_flat: Vec<NodeId>,
    pub parents_ranges: Vec<(u32, u32)>, // (start, count)

    // Adjacency List (Children)
    pub first_child: Vec<u32>,
    pub child_targets: Vec<NodeId>,
    pub next_child: Vec<u32>,

    // Uniqueness of display names
    pub used_names: HashSet<String>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.kinds.len()
    }

    /// Appends a node, wiring every edge it participates in.
    ///
    /// Duplicate entries in `parents` are legal and produce one child edge
    /// each, so `Add(a, a)` counts as two edges out of `a`.
    pub fn add_node(&mut self, kind: NodeKind, parents: &[NodeId], mut meta: NodeMetadata) -> NodeId {
        let id = NodeId::new(self.kinds.len());

        // --- Unique Name Enforcement ---
        // Display names must stay unambiguous in traces and error messages.
        let base = meta.name.clone();
        let mut candidate = base.clone();
        let mut counter = 1;
        while self.used_names.contains(&candidate) {
            candidate = format!("{}_{}", base, counter);
            counter += 1;
        }
        self.used_names.insert(candidate.clone());
        meta.name = candidate;

        // 1. Parents (CSR append)
        let start = self.parents_flat.len() as u32;
        let count = parents.len() as u32;
        self.parents_flat.extend_from_slice(parents);
        self.parents_ranges.push((start, count));

        // 2. Children (Adjacency List append)
        self.first_child.push(NO_EDGE);
        for &parent in parents {
            let p_idx = parent.index();
            let head = self.first_child[p_idx];
            let new_edge = self.child_targets.len() as u32;
            self.child_targets.push(id);
            self.next_child.push(head);
            self.first_child[p_idx] = new_edge;
        }

        // 3. Metadata
        self.kinds.push(kind);
        self.meta.push(meta);

        id
    }

    #[inline(always)]
    pub fn get_parents(&self, id: NodeId) -> &[NodeId] {
        let (start, count) = self.parents_ranges[id.index()];
        &self.parents_flat[start as usize..(start + count) as usize]
    }

    /// Iterates the successors of `id`, one item per edge occurrence.
    ///
    /// The adjacency list prepends, so children come out in reverse
    /// construction order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            store: self,
            edge: self.first_child[id.index()],
        }
    }
}

/// Linked-list traversal over one node's outgoing edges.
pub struct Children<'a> {
    store: &'a GraphRegistry,
    edge: u32,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.edge == NO_EDGE {
            return None;
        }
        let target = self.store.child_targets[self.edge as usize];
        self.edge = self.store.next_child[self.edge as usize];
        Some(target)
    }
}
