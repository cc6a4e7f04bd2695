#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod enums;
pub mod graph;
pub mod newtypes;
pub mod structures;

pub use enums::{EdgeKind, NodeKind};
pub use graph::{AllocationGraph, DeadlockReport, GraphError, detect_deadlock};
pub use newtypes::{NewtypeError, NodeId};
pub use structures::{DynMap, Edge, Node};

/// Returns the current version of the ragsim-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
