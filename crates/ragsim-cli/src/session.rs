//! Session state: one allocation graph plus the log the original UI kept.
//!
//! The session is the presentation side of the core: it applies parsed
//! script commands to an [`AllocationGraph`], turns every outcome (including
//! rejections) into a log line, and never aborts — a rejected mutation is a
//! message to the user, not a failure of the run.
use ragsim_core::{AllocationGraph, DeadlockReport, EdgeKind, NodeId, detect_deadlock};
use serde::Serialize;

use crate::script::ScriptCommand;

/// Node and edge counters by kind, for the `stats` subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Number of process nodes.
    pub processes: usize,
    /// Number of resource nodes.
    pub resources: usize,
    /// Number of request edges (process → resource).
    pub requests: usize,
    /// Number of allocation edges (resource → process).
    pub allocations: usize,
}

impl SessionStats {
    /// Computes the counters from a graph snapshot.
    pub fn from_graph(graph: &AllocationGraph) -> Self {
        let processes = graph.nodes().filter(|n| n.kind.is_process()).count();
        let resources = graph.node_count() - processes;
        let requests = graph
            .edges()
            .filter(|e| e.kind == EdgeKind::Request)
            .count();
        let allocations = graph.edge_count() - requests;
        Self {
            processes,
            resources,
            requests,
            allocations,
        }
    }
}

/// One scripted simulation session.
#[derive(Debug, Default)]
pub struct Session {
    graph: AllocationGraph,
    log: Vec<String>,
    last_report: Option<DeadlockReport>,
}

impl Session {
    /// Creates a session over an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies every command in order, logging each outcome.
    pub fn apply_all(&mut self, commands: &[ScriptCommand]) {
        for command in commands {
            self.apply(command);
        }
    }

    /// Applies one command, appending the outcome to the log.
    ///
    /// Mutation rejections are logged verbatim and the session continues.
    pub fn apply(&mut self, command: &ScriptCommand) {
        match command {
            ScriptCommand::AddProcess { id } => match NodeId::try_from(id.as_str()) {
                Ok(node_id) => match self.graph.add_process(node_id) {
                    Ok(()) => self.log.push(format!("Process \"{id}\" added")),
                    Err(err) => self.log.push(err.to_string()),
                },
                Err(err) => self.log.push(err.to_string()),
            },
            ScriptCommand::AddResource { id, instances } => {
                match NodeId::try_from(id.as_str()) {
                    Ok(node_id) => match self.graph.add_resource(node_id, *instances) {
                        Ok(()) => self.log.push(format!("Resource \"{id}\" added")),
                        Err(err) => self.log.push(err.to_string()),
                    },
                    Err(err) => self.log.push(err.to_string()),
                }
            }
            ScriptCommand::AddEdge { from, to } => match self.graph.add_edge(from, to) {
                Ok(EdgeKind::Request) => {
                    self.log.push(format!("Request edge added: {from} -> {to}"));
                }
                Ok(EdgeKind::Allocation) => {
                    self.log
                        .push(format!("Allocation edge added: {from} -> {to}"));
                }
                Err(err) => self.log.push(err.to_string()),
            },
            ScriptCommand::RemoveEdge { from, to } => {
                if self.graph.remove_edge(from, to) {
                    self.log.push(format!("Removed edge: {from} -> {to}"));
                } else {
                    self.log.push(format!("No edge from {from} to {to}"));
                }
            }
            ScriptCommand::Detect => {
                let report = detect_deadlock(&self.graph);
                if report.deadlocked {
                    let cycle = report
                        .cycle
                        .iter()
                        .map(|id| id.as_ref())
                        .collect::<Vec<&str>>()
                        .join(" -> ");
                    self.log.push(format!("DEADLOCK DETECTED in cycle: {cycle}"));
                } else {
                    self.log.push("System is deadlock-free".to_owned());
                }
                self.last_report = Some(report);
            }
            ScriptCommand::Clear => {
                self.graph.clear();
                self.last_report = None;
                self.log.push("System cleared.".to_owned());
            }
        }
    }

    /// Read access to the underlying graph.
    pub fn graph(&self) -> &AllocationGraph {
        &self.graph
    }

    /// The accumulated log lines, oldest first.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// The report produced by the most recent `detect` command, if any
    /// (cleared by `clear`).
    pub fn last_report(&self) -> Option<&DeadlockReport> {
        self.last_report.as_ref()
    }

    /// Current counters by kind.
    pub fn stats(&self) -> SessionStats {
        SessionStats::from_graph(&self.graph)
    }
}
