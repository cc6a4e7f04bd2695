//! Property-based tests for the allocation graph and the deadlock detector.
//!
//! Generates random edge/removal sequences over a fixed pool of five
//! processes and five single-instance resources, then checks the invariants
//! the mutation surface and the detector promise regardless of history:
//! edge-kind purity, duplicate-edge rejection, detection idempotence, and
//! well-formedness of any reported cycle.
#![allow(clippy::expect_used)]

use proptest::prelude::*;
use ragsim_core::{AllocationGraph, EdgeKind, GraphError, NodeId, NodeKind, detect_deadlock};

const POOL: usize = 10; // P0..P4 then R0..R4

fn nid(s: &str) -> NodeId {
    NodeId::try_from(s).expect("valid NodeId")
}

/// Name of pool slot `i`: processes in the first half, resources in the second.
fn name(i: usize) -> String {
    if i < POOL / 2 {
        format!("P{i}")
    } else {
        format!("R{}", i - POOL / 2)
    }
}

/// One step of a random mutation history.
#[derive(Debug, Clone)]
enum Op {
    /// Attempt `add_edge(from, to)`; rejections are ignored, like a user
    /// clicking an invalid pair.
    Edge(usize, usize),
    /// Attempt `remove_edge(from, to)`; absence is a no-op.
    Remove(usize, usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..POOL, 0..POOL).prop_map(|(a, b)| Op::Edge(a, b)),
        1 => (0..POOL, 0..POOL).prop_map(|(a, b)| Op::Remove(a, b)),
    ]
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arb_op(), 0..60)
}

/// Builds the pool and applies `ops`, ignoring rejections.
fn build(ops: &[Op]) -> AllocationGraph {
    let mut g = AllocationGraph::new();
    for i in 0..POOL / 2 {
        g.add_process(nid(&format!("P{i}"))).expect("add process");
        g.add_resource(nid(&format!("R{i}")), 1).expect("add resource");
    }
    for op in ops {
        match op {
            Op::Edge(a, b) => {
                g.add_edge(&name(*a), &name(*b)).ok();
            }
            Op::Remove(a, b) => {
                g.remove_edge(&name(*a), &name(*b));
            }
        }
    }
    g
}

fn arb_kind() -> impl Strategy<Value = NodeKind> {
    prop_oneof![
        Just(NodeKind::Process),
        (1u32..100).prop_map(|instances| NodeKind::Resource { instances }),
    ]
}

proptest! {
    /// Edge kind is a pure function of the endpoint kinds: `Some` exactly
    /// when the kinds differ, with the mapping fixed by direction.
    #[test]
    fn edge_kind_purity(from in arb_kind(), to in arb_kind()) {
        let derived = EdgeKind::between(from, to);
        match (from.is_process(), to.is_process()) {
            (true, false) => prop_assert_eq!(derived, Some(EdgeKind::Request)),
            (false, true) => prop_assert_eq!(derived, Some(EdgeKind::Allocation)),
            (true, true) | (false, false) => prop_assert_eq!(derived, None),
        }
    }

    /// Re-adding any existing edge is rejected as a duplicate and leaves the
    /// edge list untouched.
    #[test]
    fn duplicate_edges_never_change_the_graph(ops in arb_ops()) {
        let mut g = build(&ops);
        let existing: Vec<(String, String)> = g
            .edges()
            .map(|e| (e.from.to_string(), e.to.to_string()))
            .collect();

        for (from, to) in &existing {
            let err = g.add_edge(from, to).expect_err("duplicate must be rejected");
            prop_assert!(
                matches!(err, GraphError::DuplicateEdge { .. }),
                "duplicate must be rejected with GraphError::DuplicateEdge"
            );
        }

        let after: Vec<(String, String)> = g
            .edges()
            .map(|e| (e.from.to_string(), e.to.to_string()))
            .collect();
        prop_assert_eq!(existing, after);
    }

    /// Detection is a pure function of the graph snapshot: repeated calls
    /// with no intervening mutation return identical reports.
    #[test]
    fn detection_is_idempotent(ops in arb_ops()) {
        let g = build(&ops);
        let first = detect_deadlock(&g);
        let second = detect_deadlock(&g);
        prop_assert_eq!(first, second);
    }

    /// Any reported cycle is well-formed: `deadlocked` mirrors non-emptiness,
    /// every consecutive (wrapping) pair is a real edge, and the bipartite
    /// connection rules force the cycle to alternate process/resource, so its
    /// length is even and at least 2.
    #[test]
    fn reported_cycles_are_well_formed(ops in arb_ops()) {
        let g = build(&ops);
        let report = detect_deadlock(&g);
        prop_assert_eq!(report.deadlocked, !report.cycle.is_empty());

        if report.deadlocked {
            let n = report.cycle.len();
            prop_assert!(n >= 2);
            prop_assert_eq!(n % 2, 0, "bipartite cycles alternate kinds");

            for (i, from) in report.cycle.iter().enumerate() {
                let to = &report.cycle[(i + 1) % n];
                prop_assert!(
                    g.adjacency_of(from).into_iter().any(|t| t == to),
                    "missing edge {} -> {} in reported cycle",
                    from,
                    to
                );

                let from_kind = g.node(from).expect("cycle node exists").kind;
                let to_kind = g.node(to).expect("cycle node exists").kind;
                prop_assert_ne!(
                    from_kind.is_process(),
                    to_kind.is_process(),
                    "consecutive cycle nodes must differ in kind"
                );
            }
        }
    }

    /// `clear` always produces the empty, deadlock-free graph.
    #[test]
    fn clear_resets_any_history(ops in arb_ops()) {
        let mut g = build(&ops);
        g.clear();
        prop_assert_eq!(g.node_count(), 0);
        prop_assert_eq!(g.edge_count(), 0);
        let report = detect_deadlock(&g);
        prop_assert!(!report.deadlocked);
        prop_assert!(report.cycle.is_empty());
    }
}
