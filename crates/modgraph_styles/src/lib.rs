//! Styles dependency graph export for TypeScript projects.
//!
//! This crate loads a project through `modgraph_core`, keeps the files under
//! a path scope (`styles/` by default) and writes the relative imports between
//! them as a directed graph in JSON.
//!
//! # Examples
//!
//! ```no_run
//! use modgraph_styles::{Config, run_graph_export};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     project: std::path::PathBuf::from("/path/to/material-ui/tsconfig.json"),
//!     ..Config::default()
//! };
//!
//! let result = run_graph_export(&cfg)?;
//! println!("{} nodes, {} edges", result.graph.nodes.len(), result.graph.edges.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod exporter;
mod filter;
mod graph;
mod node_id;
mod serializer;
mod types;

// Re-export public API
pub use config::Config;
pub use exporter::run_graph_export;
pub use filter::GraphFilter;
pub use graph::build_graph;
pub use node_id::{NodeId, RelPath};
pub use serializer::{serialize_graph, write_graph};
pub use types::{Edge, ExportResult, Graph};
