//! Domain records handed out by the graph's read-only views.

use serde::{Deserialize, Serialize};

use crate::enums::{EdgeKind, NodeKind};
use crate::newtypes::NodeId;

/// Opaque key/value map for presentation-owned node metadata.
///
/// The core stores this slot verbatim and never interprets it; a presentation
/// adapter may use it for layout positions, colors, or anything else.
pub type DynMap = serde_json::Map<String, serde_json::Value>;

/// A single node in the allocation graph.
///
/// `id` is the sole key and is immutable after creation. The resource
/// instance count lives inside [`NodeKind::Resource`]; the `kind` tag and its
/// fields are flattened into the node object on serialization
/// (`{"id":"R1","kind":"resource","instances":2}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node within the graph.
    pub id: NodeId,

    /// Node category, with the instance count for resources.
    #[serde(flatten)]
    pub kind: NodeKind,

    /// Presentation-owned metadata (see [`DynMap`]).
    #[serde(default, skip_serializing_if = "DynMap::is_empty")]
    pub meta: DynMap,
}

impl Node {
    /// Creates a node with an empty metadata slot.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            meta: DynMap::new(),
        }
    }
}

/// A directed edge of the allocation graph.
///
/// Only `Serialize` is derived: edges enter the graph exclusively through
/// [`AllocationGraph::add_edge`](crate::graph::AllocationGraph::add_edge),
/// which derives the kind from the endpoint kinds, so a deserialized edge
/// with a forged kind has no way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Source node identifier.
    pub from: NodeId,
    /// Target node identifier.
    pub to: NodeId,
    /// Derived kind: request (process → resource) or allocation (resource → process).
    pub kind: EdgeKind,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::try_from(s).expect("valid id")
    }

    #[test]
    fn node_serializes_with_flattened_kind() {
        let node = Node::new(id("R1"), NodeKind::Resource { instances: 2 });
        let value = serde_json::to_value(&node).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({ "id": "R1", "kind": "resource", "instances": 2 })
        );
    }

    #[test]
    fn node_round_trips_meta() {
        let mut node = Node::new(id("P1"), NodeKind::Process);
        node.meta
            .insert("x".to_owned(), serde_json::json!(120.5));
        node.meta
            .insert("y".to_owned(), serde_json::json!(80.0));

        let json = serde_json::to_string(&node).expect("serialize");
        let back: Node = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, node);
    }

    #[test]
    fn edge_serializes_kind_string() {
        let edge = Edge {
            from: id("P1"),
            to: id("R1"),
            kind: EdgeKind::Request,
        };
        let value = serde_json::to_value(&edge).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({ "from": "P1", "to": "R1", "kind": "request" })
        );
    }
}
