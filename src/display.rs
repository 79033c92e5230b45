//! Formatting helpers for nodes and hierarchy listings.
//!
//! Plain text only; callers add color at the terminal boundary.

use crate::graph::Graph;
use crate::hierarchy::hierarchy;
use crate::types::{node_name, Attrs, NodeId};

const INDENT: &str = "  ";

/// One line per listed node: "{indent}{uid}) {name}".
pub fn hierarchy_lines(graph: &Graph) -> Vec<String> {
    hierarchy(graph)
        .map(|(uid, depth)| {
            let name = graph.node(uid).map(node_name).unwrap_or("<no name>");
            format!("{}{}) {}", INDENT.repeat(depth), uid, name)
        })
        .collect()
}

/// Multi-line detail view: "[uid] name" header, then one attribute per line.
pub fn node_detail(uid: NodeId, attrs: &Attrs) -> String {
    let mut out = format!("[{}] {}", uid, node_name(attrs));
    for (key, value) in attrs {
        if key == "uid" || key == "name" {
            continue;
        }
        out.push_str(&format!("\n{}{}: {}", INDENT, key, render_value(value)));
    }
    out
}

/// One attribute per line for an edge's full view.
pub fn edge_detail(attrs: &Attrs) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!("{}{}: {}", INDENT, key, render_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strings render bare; everything else as JSON.
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
