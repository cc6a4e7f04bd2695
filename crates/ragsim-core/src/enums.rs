//! Node and edge kind enums for the resource-allocation graph.
//!
//! Both enums serialize to/from `snake_case` JSON. [`NodeKind`] carries the
//! resource instance count inside its `Resource` variant rather than as an
//! optional field on the node, so a process can never hold a meaningless
//! instance count.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two node categories of the bipartite allocation graph.
///
/// The instance count on [`NodeKind::Resource`] is descriptive metadata for
/// display: the deadlock detector treats every resource as single-instance
/// (see [`detect_deadlock`](crate::graph::detect::detect_deadlock)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// An active computation that may hold or wait for resources.
    Process,
    /// An allocatable unit with one or more interchangeable instances.
    Resource {
        /// Number of interchangeable instances; must be at least 1.
        instances: u32,
    },
}

impl NodeKind {
    /// Returns the `snake_case` string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Process => "process",
            NodeKind::Resource { .. } => "resource",
        }
    }

    /// Returns `true` for [`NodeKind::Process`].
    pub fn is_process(&self) -> bool {
        matches!(self, NodeKind::Process)
    }

    /// Returns `true` for [`NodeKind::Resource`].
    pub fn is_resource(&self) -> bool {
        matches!(self, NodeKind::Resource { .. })
    }

    /// Returns the instance count for resources, `None` for processes.
    pub fn instances(&self) -> Option<u32> {
        match self {
            NodeKind::Process => None,
            NodeKind::Resource { instances } => Some(*instances),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two directed edge categories, derived from the endpoint kinds.
///
/// An edge kind is never set independently: [`EdgeKind::between`] is the only
/// way to obtain one, so a malformed connection (process to process, resource
/// to resource) cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Process → Resource: the process is waiting for the resource.
    Request,
    /// Resource → Process: the resource is currently held by the process.
    Allocation,
}

impl EdgeKind {
    /// Derives the edge kind connecting `from` to `to`.
    ///
    /// Returns `None` when both endpoints have the same kind; such an edge is
    /// structurally invalid and must be rejected at insertion time.
    pub fn between(from: NodeKind, to: NodeKind) -> Option<EdgeKind> {
        match (from, to) {
            (NodeKind::Process, NodeKind::Resource { .. }) => Some(EdgeKind::Request),
            (NodeKind::Resource { .. }, NodeKind::Process) => Some(EdgeKind::Allocation),
            (NodeKind::Process, NodeKind::Process)
            | (NodeKind::Resource { .. }, NodeKind::Resource { .. }) => None,
        }
    }

    /// Returns the `snake_case` string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Request => "request",
            EdgeKind::Allocation => "allocation",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
