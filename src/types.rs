//! Core data types for the lattice graph.

use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Unique node identifier, issued by [`crate::Serial`].
pub type NodeId = u64;

/// Open attribute map carried by every node and edge.
///
/// A `BTreeMap` keeps iteration (and therefore rendering and serialization)
/// in sorted-key order.
pub type Attrs = BTreeMap<String, Value>;

/// Node attribute keys managed by the system.
pub const RESERVED_NODE_KEYS: &[&str] = &["uid"];

/// Edge attribute keys managed by the system.
pub const RESERVED_EDGE_KEYS: &[&str] = &["src", "dst", "type"];

/// Build an attribute map from literal pairs.
pub fn attrs<const N: usize>(pairs: [(&str, Value); N]) -> Attrs {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Relationship types between nodes.
///
/// The set is closed: unknown names are rejected at the API and CLI
/// boundaries rather than stored as free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// dst is a child of src in the display hierarchy.
    ParentOf,

    /// Informational link, no hierarchy semantics.
    RelatedTo,

    /// src comes before dst in time or sequence.
    Precedes,
}

impl EdgeKind {
    /// Canonical wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::ParentOf => "parent_of",
            EdgeKind::RelatedTo => "related_to",
            EdgeKind::Precedes => "precedes",
        }
    }

    /// Returns true if this edge type defines the display hierarchy.
    pub fn is_hierarchical(&self) -> bool {
        matches!(self, EdgeKind::ParentOf)
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an edge type outside the known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEdgeKind(pub String);

impl std::fmt::Display for UnknownEdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown edge type '{}': expected parent_of, related_to, or precedes",
            self.0
        )
    }
}

impl std::error::Error for UnknownEdgeKind {}

impl FromStr for EdgeKind {
    type Err = UnknownEdgeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent_of" | "parent" => Ok(EdgeKind::ParentOf),
            "related_to" | "related" => Ok(EdgeKind::RelatedTo),
            "precedes" => Ok(EdgeKind::Precedes),
            _ => Err(UnknownEdgeKind(s.to_string())),
        }
    }
}

/// Data stored for a single directed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    /// Relationship type.
    pub kind: EdgeKind,

    /// Open attribute map, exclusive of the reserved keys.
    pub attrs: Attrs,
}

impl EdgeData {
    pub fn new(kind: EdgeKind, attrs: Attrs) -> Self {
        Self { kind, attrs }
    }

    /// Full attribute view including the system-managed keys.
    pub fn to_attrs(&self, src: NodeId, dst: NodeId) -> Attrs {
        let mut full = self.attrs.clone();
        full.insert("src".to_string(), Value::from(src));
        full.insert("dst".to_string(), Value::from(dst));
        full.insert("type".to_string(), Value::from(self.kind.as_str()));
        full
    }
}

/// Validation errors for user-supplied attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrError {
    /// A system-managed key appeared in user attributes.
    ReservedKey(String),
}

impl std::fmt::Display for AttrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrError::ReservedKey(key) => {
                write!(f, "attribute '{}' is reserved and cannot be set directly", key)
            }
        }
    }
}

impl std::error::Error for AttrError {}

/// Reject user attributes that touch system-managed node keys.
pub fn check_node_attrs(attrs: &Attrs) -> Result<(), AttrError> {
    check_reserved(attrs, RESERVED_NODE_KEYS)
}

/// Reject user attributes that touch system-managed edge keys.
pub fn check_edge_attrs(attrs: &Attrs) -> Result<(), AttrError> {
    check_reserved(attrs, RESERVED_EDGE_KEYS)
}

fn check_reserved(attrs: &Attrs, reserved: &[&str]) -> Result<(), AttrError> {
    for key in reserved {
        if attrs.contains_key(*key) {
            return Err(AttrError::ReservedKey((*key).to_string()));
        }
    }
    Ok(())
}

/// Best-effort name lookup for display.
pub fn node_name(attrs: &Attrs) -> &str {
    attrs
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<no name>")
}
