use clap::Parser;
use modgraph_core::OnConfigError;
use std::path::PathBuf;

use crate::filter::GraphFilter;

#[derive(Debug, Clone, Parser)]
#[command(name = "styles")]
#[command(about = "Export the import graph of a project's styles modules as JSON")]
pub struct Config {
    /// Path to the project's tsconfig.json
    #[arg(long, default_value = "tsconfig.json")]
    pub project: PathBuf,

    /// File the graph is written to
    #[arg(long, default_value = "mui-graph.json")]
    pub output: PathBuf,

    /// Only files whose path contains this string are graphed
    #[arg(long, default_value = "styles/")]
    pub scope: String,

    /// Skip files whose path contains this string (repeatable)
    #[arg(long = "exclude-path", default_values_t = ["overrides".to_string()])]
    pub exclude_paths: Vec<String>,

    /// Skip imports whose specifier contains this string (repeatable)
    #[arg(long = "exclude-import", default_values_t = ["StandardProps".to_string()])]
    pub exclude_imports: Vec<String>,

    /// How to treat an unreadable or invalid tsconfig
    #[arg(long, value_enum, default_value_t = OnConfigError::Fail)]
    pub on_config_error: OnConfigError,

    /// Print the graph to stdout instead of writing the output file
    #[arg(long)]
    pub stdout: bool,
}

impl Default for Config {
    fn default() -> Self {
        let filter = GraphFilter::default();
        Config {
            project: PathBuf::from("tsconfig.json"),
            output: PathBuf::from("mui-graph.json"),
            scope: filter.scope,
            exclude_paths: filter.excluded_paths,
            exclude_imports: filter.excluded_imports,
            on_config_error: OnConfigError::default(),
            stdout: false,
        }
    }
}

impl Config {
    pub fn filter(&self) -> GraphFilter {
        GraphFilter {
            scope: self.scope.clone(),
            excluded_paths: self.exclude_paths.clone(),
            excluded_imports: self.exclude_imports.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_match_default() {
        let cfg = Config::try_parse_from(["styles"]).unwrap();
        let default = Config::default();
        assert_eq!(cfg.project, default.project);
        assert_eq!(cfg.output, default.output);
        assert_eq!(cfg.filter(), GraphFilter::default());
        assert_eq!(cfg.on_config_error, OnConfigError::Fail);
        assert!(!cfg.stdout);
    }

    #[test]
    fn test_repeated_excludes_replace_defaults() {
        let cfg = Config::try_parse_from([
            "styles",
            "--exclude-path",
            "legacy",
            "--exclude-path",
            "__tests__",
            "--exclude-import",
            "Internal",
            "--on-config-error",
            "ignore",
            "--stdout",
        ])
        .unwrap();
        assert_eq!(cfg.exclude_paths, vec!["legacy", "__tests__"]);
        assert_eq!(cfg.exclude_imports, vec!["Internal"]);
        assert_eq!(cfg.on_config_error, OnConfigError::Ignore);
        assert!(cfg.stdout);
    }

    #[test]
    fn test_unknown_on_config_error_rejected() {
        assert!(Config::try_parse_from(["styles", "--on-config-error", "maybe"]).is_err());
    }
}
