use anyhow::Result;
use log::{debug, info, trace};
use rayon::prelude::*;
use std::{collections::HashSet, path::PathBuf};

use crate::{
    config::CompilerOptions,
    parser::parse_source_file,
    resolver::{resolve_relative, type_root_entries},
    types::{Program, SourceFile, TopLevelNode},
};

/// Parses every project file, plus the files they import and the entry
/// files of automatically included type packages.
///
/// Files are parsed in waves: the root files and type entries first, then
/// whatever the previous wave imports. Within a wave files keep their
/// discovery order, so the result does not depend on thread scheduling.
pub fn build_program(file_names: &[PathBuf], options: &CompilerOptions) -> Result<Program> {
    info!("Building program from {} root files", file_names.len());

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut pending: Vec<PathBuf> = Vec::new();
    for path in file_names.iter().cloned().chain(type_root_entries(options)) {
        if seen.insert(path.clone()) {
            pending.push(path);
        }
    }

    let mut files: Vec<SourceFile> = Vec::new();
    let mut wave = 0;
    while !pending.is_empty() {
        debug!(
            "Parsing wave {} ({} files, {} threads)",
            wave,
            pending.len(),
            rayon::current_num_threads()
        );
        let parsed: Vec<SourceFile> =
            pending.par_iter().map(|path| parse_source_file(path)).collect::<Result<_>>()?;

        let mut next: Vec<PathBuf> = Vec::new();
        if !options.no_resolve {
            for file in &parsed {
                let decls = file.children().iter().filter_map(TopLevelNode::as_import_declaration);
                for decl in decls {
                    let request = decl.specifier.text();
                    if let Some(resolved) = resolve_relative(&file.path, &request, options)
                        && seen.insert(resolved.clone())
                    {
                        trace!("Following import '{}' to {}", request, resolved.display());
                        next.push(resolved);
                    }
                }
            }
        }

        files.extend(parsed);
        pending = next;
        wave += 1;
    }

    info!("Program contains {} source files", files.len());
    Ok(Program { files })
}
