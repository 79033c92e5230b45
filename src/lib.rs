//! Lattice: a personal knowledge graph of thoughts and actions.
//!
//! Nodes carry open attribute maps and are connected by typed directed
//! edges (`parent_of`, `related_to`, `precedes`). The graph persists as a
//! single JSON file and is driven from a CLI or an interactive shell.
//!
//! # Example
//!
//! ```
//! use lattice::{attrs, EdgeKind, NodeFilter, Store};
//! use serde_json::json;
//!
//! let mut store = Store::in_memory();
//!
//! let home = store.create_node(attrs([("name", json!("home"))])).unwrap();
//! let garden = store.create_node(attrs([("name", json!("garden"))])).unwrap();
//! store.create_edge(home, garden, EdgeKind::ParentOf, Default::default()).unwrap();
//!
//! // Depth-annotated listing: garden nests under home.
//! let listed: Vec<_> = store.hierarchy().collect();
//! assert_eq!(listed, vec![(home, 0), (garden, 1)]);
//!
//! // Basic filtering.
//! let hits = store.find(&NodeFilter::new().name_contains("gard"));
//! assert_eq!(hits.len(), 1);
//! ```

mod graph;
mod hierarchy;
mod serial;
mod storage;
mod store;
mod types;

pub mod display;
pub mod parse;
pub mod query;

// Re-export public API
pub use graph::{Graph, GraphError};
pub use hierarchy::{hierarchy, Hierarchy};
pub use query::NodeFilter;
pub use serial::Serial;
pub use store::Store;
pub use types::{
    attrs, check_edge_attrs, check_node_attrs, node_name, AttrError, Attrs, EdgeData, EdgeKind,
    NodeId, UnknownEdgeKind, RESERVED_EDGE_KEYS, RESERVED_NODE_KEYS,
};
