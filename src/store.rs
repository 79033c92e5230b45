//! High-level node/edge API over the graph, with persistence wiring.

use crate::graph::{Graph, GraphError};
use crate::hierarchy::{self, Hierarchy};
use crate::query::NodeFilter;
use crate::serial::Serial;
use crate::storage;
use crate::types::{self, Attrs, EdgeKind, NodeId};
use eyre::{Context, Result};
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// The main lattice store: graph, id counter, and optional backing file.
///
/// Every mutating call commits to memory first and then persists when the
/// store is file-backed. A failed write surfaces as an error but the
/// in-memory change is not rolled back.
pub struct Store {
    graph: Graph,
    serial: Serial,
    path: Option<PathBuf>,
}

impl Store {
    /// Open a file-backed store, loading the graph if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let graph = storage::load(&path).context("Failed to load graph")?;
        let serial = Serial::from_graph(&graph);
        Ok(Self {
            graph,
            serial,
            path: Some(path),
        })
    }

    /// A store with no backing file; mutations stay in memory.
    pub fn in_memory() -> Self {
        Self {
            graph: Graph::new(),
            serial: Serial::default(),
            path: None,
        }
    }

    /// Read access to the underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The next uid that will be issued.
    pub fn next_uid(&self) -> NodeId {
        self.serial.current()
    }

    /// Write the graph out if the store is file-backed.
    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.path {
            storage::save(path, &self.graph)?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        self.save().context("Failed to persist graph")
    }

    // -------------------------------------------------------------------------
    // Node API
    // -------------------------------------------------------------------------

    /// Create a node from user attributes; returns the freshly issued uid.
    pub fn create_node(&mut self, attrs: Attrs) -> Result<NodeId> {
        types::check_node_attrs(&attrs)?;
        let uid = self.serial.next();
        debug!("Node.create uid={} attrs={:?}", uid, attrs);

        let mut stored = attrs;
        stored.insert("uid".to_string(), Value::from(uid));
        // Unreachable through this API: the serial never repeats.
        self.graph.add_node(uid, stored)?;

        self.persist()?;
        Ok(uid)
    }

    /// A node's attributes, or `None` if it does not exist.
    pub fn node(&self, uid: NodeId) -> Option<&Attrs> {
        self.graph.node(uid)
    }

    /// Full replace: the node's attribute set becomes exactly `attrs` plus
    /// its uid.
    pub fn update_node(&mut self, uid: NodeId, attrs: Attrs) -> Result<()> {
        types::check_node_attrs(&attrs)?;
        debug!("Node.update uid={}", uid);

        let node = self.graph.node_mut(uid).ok_or(GraphError::NodeNotFound(uid))?;
        let mut stored = attrs;
        stored.insert("uid".to_string(), Value::from(uid));
        *node = stored;

        self.persist()
    }

    /// Partial merge: a `null` value deletes that key, anything else sets it.
    pub fn patch_node(&mut self, uid: NodeId, attrs: Attrs) -> Result<()> {
        types::check_node_attrs(&attrs)?;
        debug!("Node.patch uid={}", uid);

        let node = self.graph.node_mut(uid).ok_or(GraphError::NodeNotFound(uid))?;
        for (key, value) in attrs {
            if value.is_null() {
                node.remove(&key);
            } else {
                node.insert(key, value);
            }
        }

        self.persist()
    }

    /// Delete a node; all incident edges go with it.
    pub fn delete_node(&mut self, uid: NodeId) -> Result<()> {
        debug!("Node.delete uid={}", uid);
        self.graph.remove_node(uid)?;
        self.persist()
    }

    /// Depth-annotated listing of the whole graph.
    pub fn hierarchy(&self) -> Hierarchy<'_> {
        hierarchy::hierarchy(&self.graph)
    }

    /// Nodes matching a filter, ascending by uid.
    pub fn find(&self, filter: &NodeFilter) -> Vec<(NodeId, &Attrs)> {
        self.graph
            .nodes()
            .filter(|(_, attrs)| filter.matches(attrs))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Edge API
    // -------------------------------------------------------------------------

    /// Create (or overwrite) the edge (src, dst); both endpoints must exist.
    ///
    /// Returns the stored edge as a full attribute view including `src`,
    /// `dst`, and `type`.
    pub fn create_edge(
        &mut self,
        src: NodeId,
        dst: NodeId,
        kind: EdgeKind,
        attrs: Attrs,
    ) -> Result<Attrs> {
        types::check_edge_attrs(&attrs)?;
        if !self.graph.contains(src) || !self.graph.contains(dst) {
            return Err(GraphError::EndpointsMissing { src, dst }.into());
        }
        debug!("Edge.create ({}, {}) type={}", src, dst, kind);

        self.graph.add_edge(src, dst, kind, attrs);
        self.persist()?;

        Ok(self
            .graph
            .edge(src, dst)
            .map(|data| data.to_attrs(src, dst))
            .unwrap_or_default())
    }

    /// An edge's full attribute view, or `None` if it does not exist.
    pub fn edge(&self, src: NodeId, dst: NodeId) -> Option<Attrs> {
        self.graph.edge(src, dst).map(|data| data.to_attrs(src, dst))
    }

    /// Merge attributes into an existing edge.
    pub fn update_edge(&mut self, src: NodeId, dst: NodeId, attrs: Attrs) -> Result<()> {
        types::check_edge_attrs(&attrs)?;
        debug!("Edge.update ({}, {})", src, dst);
        self.graph.update_edge(src, dst, attrs)?;
        self.persist()
    }

    /// Delete an edge; deleting an absent edge is an error, not a no-op.
    pub fn delete_edge(&mut self, src: NodeId, dst: NodeId) -> Result<()> {
        debug!("Edge.delete ({}, {})", src, dst);
        self.graph.remove_edge(src, dst)?;
        self.persist()
    }
}
