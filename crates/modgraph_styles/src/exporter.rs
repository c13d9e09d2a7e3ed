use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use modgraph_core::{build_program, load_config};

use crate::{
    config::Config,
    graph::build_graph,
    serializer::{serialize_graph, write_graph},
    types::ExportResult,
};

/// Loads the project, builds its styles graph and writes it out.
///
/// Nothing is written when the config cannot be loaded or names no files.
pub fn run_graph_export(cfg: &Config) -> Result<ExportResult> {
    info!("Starting graph export for {}", cfg.project.display());

    let parsed = load_config(&cfg.project, cfg.on_config_error)?;
    for diagnostic in &parsed.diagnostics {
        warn!("{}", diagnostic);
    }

    let Some(project_root_file) = parsed.file_names.first() else {
        return Err(anyhow!(
            "No project root file: {} does not include any source files",
            parsed.config_path.display()
        ));
    };
    debug!("Project root file: {}", project_root_file.display());

    let program = build_program(&parsed.file_names, &parsed.options)?;
    let files_analyzed = program.source_files().len();
    info!("Program has {} source files", files_analyzed);

    let filter = cfg.filter();
    let (graph, files_graphed) = build_graph(&program, project_root_file, &filter);
    let json = serialize_graph(&graph)?;

    let output = if cfg.stdout {
        None
    } else {
        write_graph(&cfg.output, &json)?;
        info!("Wrote graph to {}", cfg.output.display());
        Some(cfg.output.clone())
    };

    Ok(ExportResult { graph, json, output, files_analyzed, files_graphed })
}
