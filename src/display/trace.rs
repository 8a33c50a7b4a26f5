//! Formatted audit traces of a node's upstream computation.

use std::collections::HashMap;
use std::fmt::Write;

use crate::compute::ledger::Ledger;
use crate::compute::value::Value;
use crate::graph::{ComputationGraph, NodeId, NodeKind};

/// Renders the upstream tree of `target`, annotated with the values the last
/// pass left in `ledger`. Re-visited nodes print a `(Ref to LN)`
/// back-reference instead of recursing.
pub fn format_trace(graph: &ComputationGraph, ledger: &Ledger, target: NodeId) -> String {
    let mut tracer = Tracer {
        graph,
        ledger,
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    if target.index() < graph.node_count() {
        let name = &graph.meta(target).name;
        let _ = writeln!(tracer.output, "AUDIT TRACE for node '{}':", name);
        let _ = writeln!(tracer.output, "--------------------------------------------------");
        tracer.trace_node(target, 1, "");
    } else {
        let _ = writeln!(tracer.output, "Error: Invalid Node ID {:?}", target);
    }
    tracer.output
}

struct Tracer<'a> {
    graph: &'a ComputationGraph,
    ledger: &'a Ledger,
    visited_at_level: HashMap<NodeId, usize>,
    output: String,
}

impl Tracer<'_> {
    fn trace_node(&mut self, node_id: NodeId, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(&node_id) {
            let _ = writeln!(self.output, "{}-> (Ref to L{})", prefix, first_seen);
            return;
        }
        self.visited_at_level.insert(node_id, level);

        let name = &self.graph.meta(node_id).name;
        let line_header = format!("[L{}] {}{}", level, name, self.format_value(node_id));

        match self.graph.kind(node_id) {
            NodeKind::Input => {
                let _ = writeln!(self.output, "{}{} -> Input", prefix, line_header);
            }
            kind => {
                let parents = self.graph.parents(node_id);
                let formula = self.format_formula(kind, parents);
                let _ = writeln!(self.output, "{}{} = {}", prefix, line_header, formula);
                self.recurse_parents(prefix, parents, level);
            }
        }
    }

    fn recurse_parents(&mut self, prefix: &str, parents: &[NodeId], level: usize) {
        let stem = build_child_stem(prefix);
        for (i, &parent) in parents.iter().enumerate() {
            let connector = if i == parents.len() - 1 { "`--" } else { "|--" };
            let full_prefix = format!("{}{}", stem, connector);
            self.trace_node(parent, level + 1, &full_prefix);
        }
    }

    fn format_formula(&self, kind: NodeKind, parents: &[NodeId]) -> String {
        let name = |i: usize| self.graph.meta(parents[i]).name.as_str();
        match kind {
            NodeKind::Add => format!("{} + {}", name(0), name(1)),
            NodeKind::Linear => format!("dot({}, {}) + {}", name(0), name(1), name(2)),
            NodeKind::Sigmoid => format!("sigmoid({})", name(0)),
            NodeKind::Input => String::new(),
        }
    }

    fn format_value(&self, id: NodeId) -> String {
        match self.ledger.get(id) {
            Some(Value::Scalar(s)) => format!("[{:.3}]", s),
            Some(Value::Vector(v)) => {
                if v.len() == 1 {
                    format!("[{:.3}]", v[0])
                } else {
                    format!("[{:.3}, ...]", v[0])
                }
            }
            Some(Value::Matrix(m)) => format!("[{}x{}]", m.nrows(), m.ncols()),
            None => "[?]".to_string(),
        }
    }
}

fn build_child_stem(current_prefix: &str) -> String {
    current_prefix.replace("`--", "   ").replace("|--", "|  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Engine;
    use crate::graph::NodeMetadata;

    #[test]
    fn trace_renders_formulas_and_back_references() {
        let mut g = ComputationGraph::new();
        let a = g.new_input(NodeMetadata::named("a"));
        let dbl = g.new_add(a, a, NodeMetadata::named("dbl"));
        let act = g.new_sigmoid(dbl, NodeMetadata::named("act"));

        let feed = HashMap::from([(a, Value::Scalar(0.0))]);
        let mut ledger = Ledger::new();
        let order = g.topological_sort(&feed, &mut ledger).expect("sort failed");
        Engine::new(&g)
            .forward_pass(act, &order, &mut ledger)
            .expect("pass failed");

        let trace = format_trace(&g, &ledger, act);
        assert!(trace.contains("AUDIT TRACE for node 'act'"));
        assert!(trace.contains("sigmoid(dbl)"));
        assert!(trace.contains("a + a"));
        assert!(trace.contains("-> Input"));
        // `a` appears twice as a parent; the second visit is a back-reference.
        assert!(trace.contains("(Ref to L"));
    }

    #[test]
    fn unevaluated_nodes_print_a_placeholder_value() {
        let mut g = ComputationGraph::new();
        let a = g.new_input(NodeMetadata::named("a"));
        let s = g.new_sigmoid(a, NodeMetadata::named("s"));

        let ledger = Ledger::new();
        let trace = format_trace(&g, &ledger, s);
        assert!(trace.contains("s[?]"));
    }
}
