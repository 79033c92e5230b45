//! Shared test infrastructure for lattice integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use lattice::{attrs, Attrs, EdgeKind, NodeId, Store};
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with a file-backed store and automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store: Store,
}

impl TestEnv {
    /// Create a new test environment with an empty file-backed store.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Store::open(Self::graph_path_in(&temp_dir)).expect("Failed to open store");
        Self { temp_dir, store }
    }

    fn graph_path_in(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join("graph.json")
    }

    /// The backing file path.
    pub fn graph_path(&self) -> PathBuf {
        Self::graph_path_in(&self.temp_dir)
    }

    /// Reopen the store from disk, dropping all in-memory state.
    pub fn reopen(&mut self) {
        self.store = Store::open(self.graph_path()).expect("Failed to reopen store");
    }

    /// Create a named node.
    pub fn create(&mut self, name: &str) -> NodeId {
        self.store
            .create_node(attrs([("name", json!(name))]))
            .expect("Failed to create node")
    }

    /// Create a named node with extra attributes.
    pub fn create_with(&mut self, name: &str, extra: Attrs) -> NodeId {
        let mut a = extra;
        a.insert("name".to_string(), json!(name));
        self.store.create_node(a).expect("Failed to create node")
    }

    /// Create a named node nested under a parent.
    pub fn create_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        let uid = self.create(name);
        self.parent(parent, uid);
        uid
    }

    /// Add a parent_of edge.
    pub fn parent(&mut self, src: NodeId, dst: NodeId) {
        self.store
            .create_edge(src, dst, EdgeKind::ParentOf, Attrs::new())
            .expect("Failed to add parent edge");
    }

    /// Add an edge of the given kind.
    pub fn link(&mut self, src: NodeId, dst: NodeId, kind: EdgeKind) {
        self.store
            .create_edge(src, dst, kind, Attrs::new())
            .expect("Failed to add edge");
    }

    /// Collect the hierarchy as (uid, depth) pairs.
    pub fn listing(&self) -> Vec<(NodeId, usize)> {
        self.store.hierarchy().collect()
    }

    /// Assert a node exists and return a clone of its attributes.
    pub fn node(&self, uid: NodeId) -> Attrs {
        self.store
            .node(uid)
            .unwrap_or_else(|| panic!("Expected node {} to exist", uid))
            .clone()
    }

    /// Total node count.
    pub fn node_count(&self) -> usize {
        self.store.graph().len()
    }

    /// Total edge count.
    pub fn edge_count(&self) -> usize {
        self.store.graph().edge_count()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
