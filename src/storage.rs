//! Persistence gateway: the graph as a single JSON document on disk.

use crate::graph::Graph;
use crate::types::{Attrs, EdgeKind, NodeId};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One node on disk.
#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: NodeId,
    attributes: Attrs,
}

/// One edge on disk. The relationship type travels inside `attributes`
/// under the `type` key.
#[derive(Debug, Serialize, Deserialize)]
struct EdgeRecord {
    source: NodeId,
    target: NodeId,
    attributes: Attrs,
}

/// The whole persisted graph: a node list and an edge list.
#[derive(Debug, Serialize, Deserialize)]
struct GraphDoc {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

/// Load a graph from `path`.
///
/// A missing file yields an empty graph; malformed JSON or dangling edge
/// references are errors for this invocation.
pub fn load(path: &Path) -> Result<Graph> {
    if !path.exists() {
        log::debug!("No graph file at {}; starting empty", path.display());
        return Ok(Graph::new());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph file {}", path.display()))?;
    let doc: GraphDoc = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse graph file {}", path.display()))?;

    let mut graph = Graph::new();
    for record in doc.nodes {
        graph
            .add_node(record.id, record.attributes)
            .with_context(|| format!("Duplicate node in graph file {}", path.display()))?;
    }
    for record in doc.edges {
        if !graph.contains(record.source) || !graph.contains(record.target) {
            eyre::bail!(
                "Edge ({}, {}) in {} references a missing node",
                record.source,
                record.target,
                path.display()
            );
        }
        let mut attrs = record.attributes;
        let kind_value = attrs.remove("type");
        let kind = match kind_value.as_ref().and_then(|v| v.as_str()) {
            Some(name) => name
                .parse::<EdgeKind>()
                .with_context(|| format!("Bad edge type in {}", path.display()))?,
            None => eyre::bail!(
                "Edge ({}, {}) in {} has no type",
                record.source,
                record.target,
                path.display()
            ),
        };
        graph.add_edge(record.source, record.target, kind, attrs);
    }

    log::debug!("Loaded {} ({} nodes)", path.display(), graph.len());
    Ok(graph)
}

/// Save the graph to `path` as a whole-file rewrite.
///
/// Writes a sibling temp file and renames it into place so a crash
/// mid-write never leaves a truncated document behind. Edges serialize in
/// the graph's deterministic order, so successor insertion order survives
/// a round-trip.
pub fn save(path: &Path, graph: &Graph) -> Result<()> {
    let doc = GraphDoc {
        nodes: graph
            .nodes()
            .map(|(uid, attrs)| NodeRecord {
                id: uid,
                attributes: attrs.clone(),
            })
            .collect(),
        edges: graph
            .edges()
            .map(|(src, dst, data)| {
                let mut attributes = data.attrs.clone();
                attributes.insert("type".to_string(), data.kind.as_str().into());
                EdgeRecord {
                    source: src,
                    target: dst,
                    attributes,
                }
            })
            .collect(),
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&doc).context("Failed to serialize graph")?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)
        .with_context(|| format!("Failed to write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace graph file {}", path.display()))?;

    log::debug!("Saved {} ({} nodes)", path.display(), graph.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::attrs;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        graph
            .add_node(1, attrs([("uid", json!(1)), ("name", json!("errands"))]))
            .unwrap();
        graph
            .add_node(2, attrs([("uid", json!(2)), ("name", json!("groceries")), ("done", json!(false))]))
            .unwrap();
        graph.add_edge(1, 2, EdgeKind::ParentOf, attrs([("note", json!("weekly"))]));
        graph
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");

        let graph = sample_graph();
        save(&path, &graph).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, graph);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let graph = load(&dir.path().join("absent.json")).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_edge_to_missing_node_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(
            &path,
            r#"{"nodes": [{"id": 1, "attributes": {}}],
                "edges": [{"source": 1, "target": 9, "attributes": {"type": "related_to"}}]}"#,
        )
        .unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_unknown_edge_type_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(
            &path,
            r#"{"nodes": [{"id": 1, "attributes": {}}, {"id": 2, "attributes": {}}],
                "edges": [{"source": 1, "target": 2, "attributes": {"type": "follows"}}]}"#,
        )
        .unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("graph.json");
        save(&path, &sample_graph()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_replaces_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");

        save(&path, &sample_graph()).unwrap();
        save(&path, &Graph::new()).unwrap();

        let loaded = load(&path).unwrap();
        assert!(loaded.is_empty());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_successor_order_survives_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");

        let mut graph = Graph::new();
        for uid in 1..=4 {
            graph.add_node(uid, Attrs::new()).unwrap();
        }
        graph.add_edge(1, 3, EdgeKind::ParentOf, Attrs::new());
        graph.add_edge(1, 2, EdgeKind::ParentOf, Attrs::new());
        graph.add_edge(1, 4, EdgeKind::ParentOf, Attrs::new());

        save(&path, &graph).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.successors(1), &[3, 2, 4]);
    }
}
