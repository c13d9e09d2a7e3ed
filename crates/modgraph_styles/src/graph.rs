use log::{debug, info, trace};
use modgraph_core::{Program, extract_import_paths};
use path_clean::clean;
use std::path::Path;

use crate::{
    filter::GraphFilter,
    node_id::{NodeId, RelPath},
    types::{Edge, Graph},
};

/// Builds the import graph of the program's in-scope files.
///
/// Node identifiers are paths relative to the directory of
/// `project_root_file`; files outside that directory are skipped. Also
/// returns the number of files that passed the filters.
pub fn build_graph(
    program: &Program,
    project_root_file: &Path,
    filter: &GraphFilter,
) -> (Graph, usize) {
    let root_dir = project_root_file.parent().unwrap_or(Path::new(""));
    info!("Building graph relative to {}", root_dir.display());

    let mut edges: Vec<Edge> = Vec::new();
    let mut files_graphed = 0;

    for source_file in program.source_files() {
        let file = &source_file.path;
        let rel = RelPath::between(root_dir, file);
        if rel.is_outside() {
            trace!("Skipping file outside project root: {}", file.display());
            continue;
        }
        if !filter.includes_file(file) {
            trace!("Skipping out-of-scope file: {}", file.display());
            continue;
        }
        files_graphed += 1;

        let source = NodeId::from(&rel);
        let dir = file.parent().unwrap_or(root_dir);
        let before = edges.len();

        for specifier in extract_import_paths(source_file) {
            if !filter.keeps_import(&specifier) {
                trace!("Dropping import '{}' in {}", specifier, file.display());
                continue;
            }
            let target_path = clean(dir.join(&specifier));
            let target = NodeId::from(&RelPath::between(root_dir, &target_path));
            trace!("Edge {} -> {} ('{}')", source, target, specifier);
            edges.push(Edge { source: source.clone(), target });
        }
        debug!("{} contributes {} edges", source, edges.len() - before);
    }

    let graph = Graph::from_edges(edges);
    info!(
        "Graph has {} nodes and {} edges from {} files",
        graph.nodes.len(),
        graph.edges.len(),
        files_graphed
    );
    (graph, files_graphed)
}
