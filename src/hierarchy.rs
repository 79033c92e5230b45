//! Depth-first hierarchy listing over the whole graph.
//!
//! Produces a reproducible linear order of nodes for display, annotated
//! with nesting depth. Roots (nodes without predecessors) are visited in
//! ascending uid order; descendants follow in depth-first, edge-insertion
//! order. Every successor edge is traversed so reachability bookkeeping
//! stays correct, but only `parent_of` edges emit an entry: a node hanging
//! off an already-visited subtree via `related_to` or `precedes` is neither
//! re-emitted nor shown as a child.
//!
//! Each node is emitted at most once, even when reachable through several
//! parent paths (diamonds). The first discovery wins.

use crate::graph::Graph;
use crate::types::NodeId;
use std::collections::HashSet;

/// Start a hierarchy traversal over the graph.
pub fn hierarchy(graph: &Graph) -> Hierarchy<'_> {
    Hierarchy {
        graph,
        roots: graph.roots().collect::<Vec<_>>().into_iter(),
        stack: Vec::new(),
        ancestors: Vec::new(),
        visited: HashSet::new(),
    }
}

/// One DFS frame: a node and the index of its next unexplored successor.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    child: usize,
}

/// Lazy iterator of `(uid, depth)` pairs. Consumed once; not restartable.
pub struct Hierarchy<'g> {
    graph: &'g Graph,
    roots: std::vec::IntoIter<NodeId>,
    stack: Vec<Frame>,
    ancestors: Vec<NodeId>,
    visited: HashSet<NodeId>,
}

impl Iterator for Hierarchy<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(&Frame { node: src, child }) = self.stack.last() else {
                // Between components: open the next root at depth 0.
                let root = self.roots.next()?;
                if self.visited.insert(root) {
                    self.ancestors.clear();
                    self.ancestors.push(root);
                    self.stack.push(Frame { node: root, child: 0 });
                    return Some((root, 0));
                }
                continue;
            };

            let succs = self.graph.successors(src);
            let mut i = child;
            while i < succs.len() && self.visited.contains(&succs[i]) {
                i += 1;
            }
            if i == succs.len() {
                self.stack.pop();
                continue;
            }

            let dst = succs[i];
            if let Some(frame) = self.stack.last_mut() {
                frame.child = i + 1;
            }
            self.visited.insert(dst);

            // Unwind: siblings and returns from a deep excursion leave stale
            // frames on the ancestor stack until the edge source resurfaces.
            while self.ancestors.last().is_some_and(|&a| a != src) {
                self.ancestors.pop();
            }
            let depth = self.ancestors.len();
            self.ancestors.push(dst);

            let emit = self
                .graph
                .edge(src, dst)
                .is_some_and(|data| data.kind.is_hierarchical());
            self.stack.push(Frame { node: dst, child: 0 });
            if emit {
                return Some((dst, depth));
            }
        }
    }
}
