//! TypeScript project front-end for modgraph.
//!
//! This crate turns a `tsconfig.json` into a parsed program:
//! - Loading project configs (comments, `extends`, include/exclude expansion)
//! - Parsing every project file with oxc and following relative imports
//! - Extracting the module specifiers of top-level import declarations

mod config;
mod constants;
mod error;
mod imports;
mod jsonc;
mod parser;
mod program;
mod resolver;
mod types;

// Re-export public API
pub use config::{CompilerOptions, OnConfigError, ParsedConfig, load_config};
pub use constants::{DECLARATION_SUFFIX, JS_EXTENSIONS, TS_EXTENSIONS};
pub use error::{ConfigDiagnostic, ConfigError};
pub use imports::extract_import_paths;
pub use parser::{parse_source_file, parse_source_text};
pub use program::build_program;
pub use resolver::resolve_relative;
pub use types::{ImportDeclaration, ModuleSpecifier, Program, SourceFile, Span, TopLevelNode};
