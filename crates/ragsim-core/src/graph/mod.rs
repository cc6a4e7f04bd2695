//! The allocation graph model: authoritative owner of nodes and edges.
//!
//! Wraps a petgraph [`StableDiGraph`] with typed [`Node`] weights and a
//! `HashMap<String, NodeIndex>` for O(1) lookup of nodes by identifier.
//! Structural invariants are enforced here at mutation time, which keeps the
//! detector in the [`detect`] submodule free of type-checking concerns:
//!
//! - node identifiers are unique;
//! - resources carry at least one instance;
//! - every edge connects a process to a resource or a resource to a process,
//!   never two nodes of the same kind;
//! - at most one edge exists per ordered `(from, to)` pair.
//!
//! Nodes are never removed (edges are, plus a whole-graph [`clear`]), so
//! ascending `NodeIndex` order is node-insertion order. Edge indices are
//! reused by `StableDiGraph` after removal, so each edge additionally carries
//! a monotonic sequence number and the read views sort on it to recover
//! edge-insertion order.
//!
//! [`clear`]: AllocationGraph::clear

pub mod detect;

pub use detect::{DeadlockReport, detect_deadlock};

use std::collections::HashMap;
use std::fmt;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use crate::enums::{EdgeKind, NodeKind};
use crate::newtypes::NodeId;
use crate::structures::{Edge, Node};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejection reasons for graph mutations.
///
/// All variants are ordinary, recoverable outcomes: the caller is expected to
/// surface them to the end user, not to treat them as fatal. The graph is
/// left untouched whenever a mutation is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node with this identifier already exists.
    DuplicateId(NodeId),
    /// A resource node was given a zero instance count.
    InvalidInstanceCount {
        /// Identifier of the rejected node.
        id: NodeId,
        /// The offending count (always 0; the field type rules out negatives).
        instances: u32,
    },
    /// An edge operation referenced an identifier with no matching node.
    UnknownNode(String),
    /// The edge would connect two nodes of the same kind.
    SameKindConnection {
        /// Source node identifier.
        from: NodeId,
        /// Target node identifier.
        to: NodeId,
        /// The kind shared by both endpoints.
        kind: &'static str,
    },
    /// The exact ordered edge already exists; multiplicity is forbidden.
    DuplicateEdge {
        /// Source node identifier.
        from: NodeId,
        /// Target node identifier.
        to: NodeId,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::DuplicateId(id) => {
                write!(f, "duplicate node ID: {id:?}")
            }
            GraphError::InvalidInstanceCount { id, instances } => {
                write!(
                    f,
                    "resource {id:?} must have at least 1 instance, got {instances}"
                )
            }
            GraphError::UnknownNode(id) => {
                write!(f, "unknown node: {id:?}")
            }
            GraphError::SameKindConnection { from, to, kind } => {
                write!(
                    f,
                    "invalid edge {from:?} -> {to:?}: both nodes are of kind {kind}"
                )
            }
            GraphError::DuplicateEdge { from, to } => {
                write!(f, "edge already exists from {from:?} to {to:?}")
            }
        }
    }
}

impl std::error::Error for GraphError {}

// ---------------------------------------------------------------------------
// AllocationGraph
// ---------------------------------------------------------------------------

/// Edge weight stored in the petgraph slab: the public record plus the
/// insertion sequence number used to recover deterministic edge order.
#[derive(Debug, Clone)]
struct EdgeSlot {
    edge: Edge,
    seq: u64,
}

/// A mutable resource-allocation graph for one logical session.
///
/// The graph is the exclusive owner of its nodes and edges; readers only ever
/// see `&`-views, and the borrow checker guarantees the frozen-snapshot
/// requirement of [`detect_deadlock`] (no mutation can interleave with a
/// traversal). Construct independent instances freely — there is no global
/// state.
#[derive(Debug, Default)]
pub struct AllocationGraph {
    graph: StableDiGraph<Node, EdgeSlot>,
    id_to_index: HashMap<String, NodeIndex>,
    next_seq: u64,
}

impl AllocationGraph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // -- mutation -----------------------------------------------------------

    /// Inserts a node.
    ///
    /// On success the node count grows by one and no other node changes.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicateId`] — a node with this identifier exists.
    /// - [`GraphError::InvalidInstanceCount`] — a resource with 0 instances.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.id_to_index.contains_key(&*node.id) {
            return Err(GraphError::DuplicateId(node.id.clone()));
        }
        if let NodeKind::Resource { instances } = node.kind {
            if instances == 0 {
                return Err(GraphError::InvalidInstanceCount {
                    id: node.id.clone(),
                    instances,
                });
            }
        }

        let key = node.id.to_string();
        let idx = self.graph.add_node(node);
        self.id_to_index.insert(key, idx);
        Ok(())
    }

    /// Inserts a process node with an empty metadata slot.
    ///
    /// # Errors
    ///
    /// See [`AllocationGraph::add_node`].
    pub fn add_process(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.add_node(Node::new(id, NodeKind::Process))
    }

    /// Inserts a resource node with the given instance count.
    ///
    /// # Errors
    ///
    /// See [`AllocationGraph::add_node`].
    pub fn add_resource(&mut self, id: NodeId, instances: u32) -> Result<(), GraphError> {
        self.add_node(Node::new(id, NodeKind::Resource { instances }))
    }

    /// Inserts the directed edge `from -> to`, deriving its kind from the
    /// endpoint kinds, and returns the derived kind.
    ///
    /// # Errors
    ///
    /// - [`GraphError::UnknownNode`] — either identifier has no node.
    /// - [`GraphError::SameKindConnection`] — both endpoints share a kind.
    /// - [`GraphError::DuplicateEdge`] — the exact ordered pair exists; the
    ///   second insertion is a rejected no-op, not a fatal condition.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<EdgeKind, GraphError> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;

        // Live indices always have weights; nodes are never removed.
        let (from_id, from_kind) = match self.graph.node_weight(from_idx) {
            Some(n) => (n.id.clone(), n.kind),
            None => return Err(GraphError::UnknownNode(from.to_owned())),
        };
        let (to_id, to_kind) = match self.graph.node_weight(to_idx) {
            Some(n) => (n.id.clone(), n.kind),
            None => return Err(GraphError::UnknownNode(to.to_owned())),
        };

        let Some(kind) = EdgeKind::between(from_kind, to_kind) else {
            return Err(GraphError::SameKindConnection {
                from: from_id,
                to: to_id,
                kind: from_kind.as_str(),
            });
        };

        if self.graph.find_edge(from_idx, to_idx).is_some() {
            return Err(GraphError::DuplicateEdge {
                from: from_id,
                to: to_id,
            });
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.graph.add_edge(
            from_idx,
            to_idx,
            EdgeSlot {
                edge: Edge {
                    from: from_id,
                    to: to_id,
                    kind,
                },
                seq,
            },
        );
        Ok(kind)
    }

    /// Removes the edge `from -> to` if present and reports whether a removal
    /// occurred. Absence (of either node or of the edge) is an idempotent
    /// no-op, not an error. Remaining edges keep their relative order.
    pub fn remove_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.id_to_index.get(from), self.id_to_index.get(to))
        else {
            return false;
        };
        match self.graph.find_edge(from_idx, to_idx) {
            Some(edge_idx) => {
                self.graph.remove_edge(edge_idx);
                true
            }
            None => false,
        }
    }

    /// Resets to the empty graph: no nodes, no edges.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.id_to_index.clear();
        self.next_seq = 0;
    }

    // -- read-only views ----------------------------------------------------

    /// Returns the number of nodes currently in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges currently in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if a node with this identifier exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    /// Looks up a node by identifier.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.id_to_index
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
    }

    /// Iterates over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        let mut slots: Vec<&EdgeSlot> = self.graph.edge_weights().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| &slot.edge)
    }

    /// Returns the targets of all out-edges of `id`, in edge-insertion order.
    ///
    /// An identifier with no matching node has no out-edges, so the adjacency
    /// of an unknown id is empty.
    pub fn adjacency_of(&self, id: &str) -> Vec<&NodeId> {
        let Some(&idx) = self.id_to_index.get(id) else {
            return Vec::new();
        };
        let mut slots: Vec<&EdgeSlot> = self.graph.edges(idx).map(|e| e.weight()).collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| &slot.edge.to).collect()
    }

    // -- crate-internal traversal support ------------------------------------

    /// Node indices in insertion order, for the detector's root scan.
    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// The node weight for a live index.
    pub(crate) fn node_weight(&self, idx: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(idx)
    }

    /// Successor indices of `idx` in edge-insertion order.
    pub(crate) fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<(u64, NodeIndex)> = self
            .graph
            .edges(idx)
            .map(|e| (e.weight().seq, e.target()))
            .collect();
        out.sort_by_key(|&(seq, _)| seq);
        out.into_iter().map(|(_, target)| target).collect()
    }

    fn index_of(&self, id: &str) -> Result<NodeIndex, GraphError> {
        self.id_to_index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(id.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
