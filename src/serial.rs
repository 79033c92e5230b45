//! Monotonic identifier generation for nodes.

use crate::graph::Graph;
use crate::types::NodeId;

/// 1-indexed auto-incrementing id counter.
///
/// Behaves like a database serial column: ids are issued in strictly
/// increasing order and never reused, so they double as insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serial {
    next: NodeId,
}

impl Serial {
    /// Start a sequence at the given value.
    pub fn new(start: NodeId) -> Self {
        log::debug!("Initializing serial to {}", start);
        Self { next: start }
    }

    /// Seed from a graph so newly issued ids never collide with loaded ones.
    pub fn from_graph(graph: &Graph) -> Self {
        let start = graph.nodes().map(|(uid, _)| uid).max().map_or(1, |m| m + 1);
        Self::new(start)
    }

    /// Issue the next id and advance the sequence.
    pub fn next(&mut self) -> NodeId {
        let curr = self.next;
        self.next += 1;
        curr
    }

    /// The next id to be issued, without consuming it.
    pub fn current(&self) -> NodeId {
        self.next
    }

    /// Restart the sequence at 1. Test isolation only.
    pub fn reset(&mut self) {
        self.next = 1;
    }
}

impl Default for Serial {
    fn default() -> Self {
        Self::new(1)
    }
}
