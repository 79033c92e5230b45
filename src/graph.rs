//! In-memory directed graph of nodes and typed edges.

use crate::types::{Attrs, EdgeData, EdgeKind, NodeId};
use std::collections::{BTreeMap, HashMap};

/// Errors that can occur during graph operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Node not found.
    NodeNotFound(NodeId),
    /// Edge not found.
    EdgeNotFound(NodeId, NodeId),
    /// A node with this uid already exists.
    DuplicateNode(NodeId),
    /// Edge creation referenced at least one missing endpoint.
    EndpointsMissing { src: NodeId, dst: NodeId },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::NodeNotFound(uid) => write!(f, "node {} not found", uid),
            GraphError::EdgeNotFound(src, dst) => write!(f, "edge ({}, {}) not found", src, dst),
            GraphError::DuplicateNode(uid) => write!(f, "node {} already exists", uid),
            GraphError::EndpointsMissing { src, dst } => {
                write!(f, "cannot create edge ({}, {}): node(s) not found", src, dst)
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Simple directed graph: at most one edge per ordered (src, dst) pair.
///
/// Nodes map uid to an open attribute bag; edges carry an [`EdgeData`].
/// Successor lists preserve edge-insertion order, which the hierarchy
/// traversal depends on. Node iteration is ascending-uid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<NodeId, Attrs>,
    edges: HashMap<(NodeId, NodeId), EdgeData>,
    out: BTreeMap<NodeId, Vec<NodeId>>,
    inc: BTreeMap<NodeId, Vec<NodeId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, uid: NodeId) -> bool {
        self.nodes.contains_key(&uid)
    }

    /// Insert a node under an explicit uid.
    pub fn add_node(&mut self, uid: NodeId, attrs: Attrs) -> Result<(), GraphError> {
        if self.nodes.contains_key(&uid) {
            return Err(GraphError::DuplicateNode(uid));
        }
        self.nodes.insert(uid, attrs);
        Ok(())
    }

    pub fn node(&self, uid: NodeId) -> Option<&Attrs> {
        self.nodes.get(&uid)
    }

    pub fn node_mut(&mut self, uid: NodeId) -> Option<&mut Attrs> {
        self.nodes.get_mut(&uid)
    }

    /// Remove a node and every edge incident to it, in both directions.
    pub fn remove_node(&mut self, uid: NodeId) -> Result<Attrs, GraphError> {
        let attrs = self.nodes.remove(&uid).ok_or(GraphError::NodeNotFound(uid))?;
        for succ in self.out.remove(&uid).unwrap_or_default() {
            self.edges.remove(&(uid, succ));
            if let Some(preds) = self.inc.get_mut(&succ) {
                preds.retain(|&p| p != uid);
            }
        }
        for pred in self.inc.remove(&uid).unwrap_or_default() {
            self.edges.remove(&(pred, uid));
            if let Some(succs) = self.out.get_mut(&pred) {
                succs.retain(|&s| s != uid);
            }
        }
        Ok(attrs)
    }

    /// Insert or overwrite the edge (src, dst).
    ///
    /// Endpoint existence is the caller's responsibility (the Store layer
    /// checks before delegating here). Re-adding an existing pair replaces
    /// its data without duplicating adjacency entries.
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId, kind: EdgeKind, attrs: Attrs) {
        let key = (src, dst);
        if !self.edges.contains_key(&key) {
            self.out.entry(src).or_default().push(dst);
            self.inc.entry(dst).or_default().push(src);
        }
        self.edges.insert(key, EdgeData::new(kind, attrs));
    }

    pub fn edge(&self, src: NodeId, dst: NodeId) -> Option<&EdgeData> {
        self.edges.get(&(src, dst))
    }

    /// Merge attributes into an existing edge.
    pub fn update_edge(&mut self, src: NodeId, dst: NodeId, attrs: Attrs) -> Result<(), GraphError> {
        let data = self
            .edges
            .get_mut(&(src, dst))
            .ok_or(GraphError::EdgeNotFound(src, dst))?;
        data.attrs.extend(attrs);
        Ok(())
    }

    pub fn remove_edge(&mut self, src: NodeId, dst: NodeId) -> Result<EdgeData, GraphError> {
        let data = self
            .edges
            .remove(&(src, dst))
            .ok_or(GraphError::EdgeNotFound(src, dst))?;
        if let Some(succs) = self.out.get_mut(&src) {
            succs.retain(|&s| s != dst);
        }
        if let Some(preds) = self.inc.get_mut(&dst) {
            preds.retain(|&p| p != src);
        }
        Ok(data)
    }

    /// Successor uids in edge-insertion order.
    pub fn successors(&self, uid: NodeId) -> &[NodeId] {
        self.out.get(&uid).map_or(&[], Vec::as_slice)
    }

    /// Predecessor uids in edge-insertion order.
    pub fn predecessors(&self, uid: NodeId) -> &[NodeId] {
        self.inc.get(&uid).map_or(&[], Vec::as_slice)
    }

    /// Nodes with no incoming edge of any type, ascending by uid.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .keys()
            .copied()
            .filter(|&uid| self.predecessors(uid).is_empty())
    }

    /// All nodes, ascending by uid.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Attrs)> {
        self.nodes.iter().map(|(&uid, attrs)| (uid, attrs))
    }

    /// All edges in deterministic order: source uid ascending, then
    /// edge-insertion order within each source.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeData)> {
        self.out.iter().flat_map(move |(&src, succs)| {
            succs
                .iter()
                .filter_map(move |&dst| self.edges.get(&(src, dst)).map(|data| (src, dst, data)))
        })
    }
}
