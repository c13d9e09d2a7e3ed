use serde::Serialize;
use std::{collections::HashSet, path::PathBuf};

use crate::node_id::NodeId;

/// "`source` imports `target`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    /// Every endpoint of `edges`, once, in order of first appearance.
    pub nodes: Vec<NodeId>,
    /// One entry per import; repeated pairs are kept.
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn from_edges(edges: Vec<Edge>) -> Self {
        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut nodes = Vec::new();
        for edge in &edges {
            for id in [&edge.source, &edge.target] {
                if seen.insert(id) {
                    nodes.push(id.clone());
                }
            }
        }
        Graph { nodes, edges }
    }
}

#[derive(Debug, Clone)]
pub struct ExportResult {
    pub graph: Graph,
    pub json: String,
    /// Where the graph was written, `None` when it went to stdout.
    pub output: Option<PathBuf>,
    pub files_analyzed: usize,
    pub files_graphed: usize,
}
