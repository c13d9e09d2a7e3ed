use std::path::Path;

/// Which files and imports make it into the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphFilter {
    /// A file is graphed only if its absolute path contains this.
    pub scope: String,
    /// A file is dropped if its absolute path contains any of these.
    pub excluded_paths: Vec<String>,
    /// An import is dropped if its specifier contains any of these.
    pub excluded_imports: Vec<String>,
}

impl Default for GraphFilter {
    fn default() -> Self {
        GraphFilter {
            scope: "styles/".to_string(),
            excluded_paths: vec!["overrides".to_string()],
            excluded_imports: vec!["StandardProps".to_string()],
        }
    }
}

impl GraphFilter {
    pub fn includes_file(&self, path: &Path) -> bool {
        // Match against '/' separators on every platform
        let path = path.to_string_lossy().replace('\\', "/");
        path.contains(&self.scope) && !self.excluded_paths.iter().any(|p| path.contains(p.as_str()))
    }

    /// Only relative specifiers are kept; package imports never become edges.
    pub fn keeps_import(&self, specifier: &str) -> bool {
        specifier.starts_with('.')
            && !self.excluded_imports.iter().any(|e| specifier.contains(e.as_str()))
    }
}
