use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use modgraph_styles::Config;
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "modgraph")]
#[command(about = "Export module dependency graphs of TypeScript projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Export the import graph of the styles modules as JSON
    Styles(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Styles(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!(
                "Exporting styles graph of {} (using {} threads)",
                cfg.project.display(),
                num_threads
            );
            debug!(
                "Filter: scope={:?}, exclude_paths={:?}, exclude_imports={:?}",
                cfg.scope, cfg.exclude_paths, cfg.exclude_imports
            );

            let result = modgraph_styles::run_graph_export(&cfg)?;
            let elapsed_ms = start.elapsed().as_millis();

            match &result.output {
                None => {
                    writeln!(stdout, "{}", result.json)?;
                }
                Some(path) => {
                    writeln!(
                        stdout,
                        "{} Wrote {} nodes and {} edges to {}",
                        "✓".green(),
                        result.graph.nodes.len().to_string().cyan(),
                        result.graph.edges.len().to_string().cyan(),
                        path.display().to_string().bold()
                    )?;
                    writeln!(
                        stdout,
                        "\n{} Finished in {}ms on {} files, {} in scope (using {} threads).",
                        "●".bright_blue(),
                        elapsed_ms.to_string().cyan(),
                        result.files_analyzed.to_string().cyan(),
                        result.files_graphed.to_string().cyan(),
                        num_threads.to_string().cyan()
                    )?;
                }
            }
            stdout.flush()?;

            Ok(())
        }
    }
}
