use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::{fs, path::Path};

use crate::{
    node_id::NodeId,
    types::{Edge, Graph},
};

#[derive(Serialize)]
struct GraphDocument<'a> {
    graph: JsonGraph<'a>,
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    directed: bool,
    nodes: Vec<JsonNode<'a>>,
    edges: &'a [Edge],
}

#[derive(Serialize)]
struct JsonNode<'a> {
    id: &'a NodeId,
}

/// Renders the graph as `{"graph": {"directed": true, "nodes": [..], "edges": [..]}}`,
/// pretty-printed with two-space indentation.
pub fn serialize_graph(graph: &Graph) -> Result<String> {
    let doc = GraphDocument {
        graph: JsonGraph {
            directed: true,
            nodes: graph.nodes.iter().map(|id| JsonNode { id }).collect(),
            edges: &graph.edges,
        },
    };
    serde_json::to_string_pretty(&doc).context("Failed to serialize graph")
}

/// Writes the document, replacing whatever is at `path`.
pub fn write_graph(path: &Path, text: &str) -> Result<()> {
    debug!("Writing {} bytes to {}", text.len(), path.display());
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
