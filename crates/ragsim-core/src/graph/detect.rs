//! Deadlock detection for the allocation graph.
//!
//! A deadlock, under the single-instance-resource assumption, is exactly a
//! directed cycle in the process/resource bipartite digraph: every cycle
//! necessarily alternates a waiting process and a held resource. The detector
//! therefore runs a plain cycle search over the mixed graph, ignoring edge
//! kinds — the model has already guaranteed at insertion time that every edge
//! is a well-formed request or allocation.
//!
//! # Algorithm
//!
//! Depth-first search with an explicit frame stack (recursion depth would be
//! bounded by the node count, but an owned stack avoids the question
//! entirely). Roots are scanned in node-insertion order; successors in
//! edge-insertion order; both orders are pure functions of the mutation
//! history, so repeated calls on an unchanged graph return identical results.
//! A back-edge to a node on the current path yields the cycle as the path
//! suffix starting at that node, and the search stops at the first cycle
//! found — it reports *a* deadlock, not all of them. Nodes fully explored
//! without finding a cycle stay memoized in `visited` and are never
//! re-entered, bounding the whole search at O(V + E).
//!
//! # Known limitation (by design)
//!
//! Resource instance counts are ignored: a cycle through a resource with
//! `instances > 1` is still reported as a deadlock even though the spare
//! instances could allow progress. The model carries the count as
//! descriptive metadata only; see
//! `detects_cycle_through_multi_instance_resource` in the tests below, which
//! pins this as documented behavior.

use std::collections::HashSet;

use petgraph::stable_graph::NodeIndex;
use serde::Serialize;

use crate::graph::AllocationGraph;
use crate::newtypes::NodeId;

/// The outcome of one detection pass over a graph snapshot.
///
/// Transient: recomputed on every call, never persisted. `cycle` lists the
/// nodes of one discovered cycle in traversal order, without repeating the
/// first node at the end — consumers treat it as wrapping. Empty when no
/// deadlock exists. The reported cycle is not guaranteed to be the shortest
/// or first-formed one, only deterministic for a fixed mutation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlockReport {
    /// Whether the graph contains a deadlock (equivalently: `cycle` is
    /// non-empty).
    pub deadlocked: bool,
    /// One discovered cycle, in traversal order, wrapping at the end.
    pub cycle: Vec<NodeId>,
}

impl DeadlockReport {
    fn safe() -> Self {
        Self {
            deadlocked: false,
            cycle: Vec::new(),
        }
    }
}

/// Runs one deadlock detection pass over the current graph snapshot.
///
/// Stateless and infallible: the model enforces structural invariants at
/// mutation time, so there is nothing left here to fail on. Calling this
/// twice with no intervening mutation yields identical reports.
pub fn detect_deadlock(graph: &AllocationGraph) -> DeadlockReport {
    let mut visited: HashSet<NodeIndex> = HashSet::new();

    for root in graph.node_indices() {
        if visited.contains(&root) {
            continue;
        }
        if let Some(cycle) = search_from(graph, root, &mut visited) {
            let cycle: Vec<NodeId> = cycle
                .into_iter()
                .filter_map(|idx| graph.node_weight(idx))
                .map(|node| node.id.clone())
                .collect();
            return DeadlockReport {
                deadlocked: true,
                cycle,
            };
        }
    }

    DeadlockReport::safe()
}

/// DFS from `root`, returning the first cycle reachable from it, if any.
///
/// `visited` is shared across roots: a node proven acyclic-from is never
/// re-explored, neither as a later root nor via another path. `path` and
/// `on_path` are local to this call and track the current DFS chain; a
/// successor already on the chain is a back-edge, and the chain suffix from
/// that successor onward is the cycle.
fn search_from(
    graph: &AllocationGraph,
    root: NodeIndex,
    visited: &mut HashSet<NodeIndex>,
) -> Option<Vec<NodeIndex>> {
    let mut path: Vec<NodeIndex> = Vec::new();
    let mut on_path: HashSet<NodeIndex> = HashSet::new();

    // Frame: (node, pre-computed successors, next child index).
    let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();

    visited.insert(root);
    path.push(root);
    on_path.insert(root);
    stack.push((root, graph.successors(root), 0));

    while let Some(frame) = stack.last_mut() {
        let (node, children, child_idx) = frame;
        let node = *node;

        if *child_idx >= children.len() {
            // Every successor explored without a cycle: backtrack. The node
            // stays in `visited` permanently.
            stack.pop();
            path.pop();
            on_path.remove(&node);
            continue;
        }

        let child = children[*child_idx];
        *child_idx += 1;

        if on_path.contains(&child) {
            // Back-edge to an ancestor: the path suffix from `child` is a
            // simple cycle.
            if let Some(pos) = path.iter().position(|&n| n == child) {
                return Some(path[pos..].to_vec());
            }
            continue;
        }

        if visited.contains(&child) {
            continue;
        }

        visited.insert(child);
        path.push(child);
        on_path.insert(child);
        stack.push((child, graph.successors(child), 0));
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]

    use super::*;
    use crate::newtypes::NodeId;

    fn id(s: &str) -> NodeId {
        NodeId::try_from(s).expect("valid id")
    }

    fn cycle_ids(report: &DeadlockReport) -> Vec<&str> {
        report.cycle.iter().map(|n| &**n).collect()
    }

    /// Asserts that `report.cycle` is some rotation of `expected` and that
    /// every consecutive (wrapping) pair is connected by an edge in `g`.
    fn assert_cycle_rotation(g: &AllocationGraph, report: &DeadlockReport, expected: &[&str]) {
        let got = cycle_ids(report);
        assert_eq!(got.len(), expected.len(), "cycle length; got {got:?}");

        let start = expected
            .iter()
            .position(|&e| Some(e) == got.first().copied())
            .unwrap_or_else(|| panic!("cycle {got:?} is not a rotation of {expected:?}"));
        for (i, node) in got.iter().enumerate() {
            assert_eq!(
                *node,
                expected[(start + i) % expected.len()],
                "cycle {got:?} is not a rotation of {expected:?}"
            );
        }

        for (i, from) in got.iter().enumerate() {
            let to = got[(i + 1) % got.len()];
            assert!(
                g.adjacency_of(from).iter().any(|t| &***t == to),
                "missing edge {from} -> {to} in reported cycle {got:?}"
            );
        }
    }

    #[test]
    fn empty_graph_is_safe() {
        let g = AllocationGraph::new();
        let report = detect_deadlock(&g);
        assert!(!report.deadlocked);
        assert!(report.cycle.is_empty());
    }

    #[test]
    fn edgeless_graph_is_safe() {
        let mut g = AllocationGraph::new();
        g.add_process(id("P1")).expect("add");
        g.add_resource(id("R1"), 1).expect("add");
        assert!(!detect_deadlock(&g).deadlocked);
    }

    #[test]
    fn minimal_cycle_is_detected() {
        // P1 requests R1 while R1 is held by P1.
        let mut g = AllocationGraph::new();
        g.add_process(id("P1")).expect("add");
        g.add_resource(id("R1"), 1).expect("add");
        g.add_edge("P1", "R1").expect("request");
        g.add_edge("R1", "P1").expect("allocation");

        let report = detect_deadlock(&g);
        assert!(report.deadlocked);
        assert_cycle_rotation(&g, &report, &["P1", "R1"]);
    }

    #[test]
    fn acyclic_allocation_chain_is_safe() {
        // P1 waits for R1, which is held by P2; P2 holds but waits for nothing.
        let mut g = AllocationGraph::new();
        g.add_process(id("P1")).expect("add");
        g.add_process(id("P2")).expect("add");
        g.add_resource(id("R1"), 1).expect("add");
        g.add_edge("P1", "R1").expect("request");
        g.add_edge("R1", "P2").expect("allocation");

        let report = detect_deadlock(&g);
        assert!(!report.deadlocked);
        assert!(report.cycle.is_empty());
    }

    #[test]
    fn four_node_hold_and_wait_cycle_is_detected() {
        // Classic circular wait: P1 -> R1 -> P2 -> R2 -> P1.
        let mut g = AllocationGraph::new();
        g.add_process(id("P1")).expect("add");
        g.add_process(id("P2")).expect("add");
        g.add_resource(id("R1"), 1).expect("add");
        g.add_resource(id("R2"), 1).expect("add");
        g.add_edge("P1", "R1").expect("P1 requests R1");
        g.add_edge("R1", "P2").expect("R1 held by P2");
        g.add_edge("P2", "R2").expect("P2 requests R2");
        g.add_edge("R2", "P1").expect("R2 held by P1");

        let report = detect_deadlock(&g);
        assert!(report.deadlocked);
        assert_cycle_rotation(&g, &report, &["P1", "R1", "P2", "R2"]);
    }

    #[test]
    fn cycle_excludes_lead_in_path() {
        // P0 -> R0 -> P1 -> R1 -> back to P1: only the P1/R1 loop is the
        // cycle; the lead-in from P0 must not appear in the report.
        let mut g = AllocationGraph::new();
        g.add_process(id("P0")).expect("add");
        g.add_resource(id("R0"), 1).expect("add");
        g.add_process(id("P1")).expect("add");
        g.add_resource(id("R1"), 1).expect("add");
        g.add_edge("P0", "R0").expect("edge");
        g.add_edge("R0", "P1").expect("edge");
        g.add_edge("P1", "R1").expect("edge");
        g.add_edge("R1", "P1").expect("edge");

        let report = detect_deadlock(&g);
        assert!(report.deadlocked);
        assert_cycle_rotation(&g, &report, &["P1", "R1"]);
    }

    #[test]
    fn first_cycle_in_insertion_order_wins() {
        // Two disjoint cycles; the root scan starts at P1, so the P1/R1
        // cycle is reported and the P2/R2 one is never reached.
        let mut g = AllocationGraph::new();
        g.add_process(id("P1")).expect("add");
        g.add_resource(id("R1"), 1).expect("add");
        g.add_process(id("P2")).expect("add");
        g.add_resource(id("R2"), 1).expect("add");
        g.add_edge("P1", "R1").expect("edge");
        g.add_edge("R1", "P1").expect("edge");
        g.add_edge("P2", "R2").expect("edge");
        g.add_edge("R2", "P2").expect("edge");

        let report = detect_deadlock(&g);
        assert!(report.deadlocked);
        assert_cycle_rotation(&g, &report, &["P1", "R1"]);
    }

    #[test]
    fn detection_is_idempotent_without_mutation() {
        let mut g = AllocationGraph::new();
        g.add_process(id("P1")).expect("add");
        g.add_process(id("P2")).expect("add");
        g.add_resource(id("R1"), 1).expect("add");
        g.add_resource(id("R2"), 1).expect("add");
        g.add_edge("P1", "R1").expect("edge");
        g.add_edge("R1", "P2").expect("edge");
        g.add_edge("P2", "R2").expect("edge");
        g.add_edge("R2", "P1").expect("edge");

        let first = detect_deadlock(&g);
        let second = detect_deadlock(&g);
        assert_eq!(first, second);
        assert!(first.deadlocked);
    }

    #[test]
    fn removing_an_edge_breaks_the_deadlock() {
        let mut g = AllocationGraph::new();
        g.add_process(id("P1")).expect("add");
        g.add_resource(id("R1"), 1).expect("add");
        g.add_edge("P1", "R1").expect("edge");
        g.add_edge("R1", "P1").expect("edge");
        assert!(detect_deadlock(&g).deadlocked);

        assert!(g.remove_edge("R1", "P1"));
        let report = detect_deadlock(&g);
        assert!(!report.deadlocked);
        assert!(report.cycle.is_empty());
    }

    #[test]
    fn clear_then_detect_is_safe() {
        let mut g = AllocationGraph::new();
        g.add_process(id("P1")).expect("add");
        g.add_resource(id("R1"), 1).expect("add");
        g.add_edge("P1", "R1").expect("edge");
        g.add_edge("R1", "P1").expect("edge");
        g.clear();

        let report = detect_deadlock(&g);
        assert!(!report.deadlocked);
        assert!(report.cycle.is_empty());
    }

    /// Documented behavior, not a bug: the detector is a pure cycle test and
    /// ignores instance counts, so a cycle through a multi-instance resource
    /// is reported as a deadlock even though the spare instances could allow
    /// progress. Correct only under the single-instance assumption.
    #[test]
    fn detects_cycle_through_multi_instance_resource() {
        let mut g = AllocationGraph::new();
        g.add_process(id("P1")).expect("add");
        g.add_resource(id("R1"), 4).expect("add");
        g.add_edge("P1", "R1").expect("edge");
        g.add_edge("R1", "P1").expect("edge");

        let report = detect_deadlock(&g);
        assert!(report.deadlocked);
        assert_cycle_rotation(&g, &report, &["P1", "R1"]);
    }

    #[test]
    fn report_serializes_for_presentation() {
        let mut g = AllocationGraph::new();
        g.add_process(id("P1")).expect("add");
        g.add_resource(id("R1"), 1).expect("add");
        g.add_edge("P1", "R1").expect("edge");
        g.add_edge("R1", "P1").expect("edge");

        let value = serde_json::to_value(detect_deadlock(&g)).expect("serialize");
        assert_eq!(value["deadlocked"], serde_json::json!(true));
        let cycle = value["cycle"].as_array().expect("cycle array");
        assert_eq!(cycle.len(), 2);
    }
}
