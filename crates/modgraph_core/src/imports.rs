use log::trace;

use crate::types::SourceFile;

/// Collects the module specifier of every top-level `import` declaration,
/// in document order and without deduplication.
///
/// Nested scopes are not visited, and `export .. from` re-exports are not
/// import declarations.
pub fn extract_import_paths(source_file: &SourceFile) -> Vec<String> {
    let mut paths = Vec::new();
    source_file.for_each_child(|node| {
        if let Some(decl) = node.as_import_declaration() {
            let text = decl.specifier.text();
            trace!("Found import '{}' in {}", text, source_file.path.display());
            paths.push(text);
        }
    });
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source_text;
    use std::path::Path;

    fn extract(src: &str) -> Vec<String> {
        let file = parse_source_text(Path::new("/project/styles/test.ts"), src.to_string());
        extract_import_paths(&file)
    }

    #[test]
    fn test_import_forms() {
        let paths = extract(
            "import foo from './foo';\n\
             import { bar } from \"../bar\";\n\
             import * as ns from './ns';\n\
             import './side-effect';\n\
             import type { T } from './types';\n",
        );
        assert_eq!(paths, vec!["./foo", "../bar", "./ns", "./side-effect", "./types"]);
    }

    #[test]
    fn test_duplicates_kept() {
        let paths = extract("import a from './a';\nimport { b } from './a';");
        assert_eq!(paths, vec!["./a", "./a"]);
    }

    #[test]
    fn test_nested_and_dynamic_imports_ignored() {
        let paths = extract(
            "if (x) { require('./r'); }\n\
             const lazy = () => import('./lazy');\n\
             export { y } from './reexport';\n\
             export * from './all';\n\
             import z from 'package';\n",
        );
        assert_eq!(paths, vec!["package"]);
    }

    #[test]
    fn test_module_declaration_imports_not_top_level() {
        let paths = extract("declare module 'm' {\n  import { x } from './inner';\n}\n");
        assert!(paths.is_empty());
    }

    #[test]
    fn test_no_imports() {
        assert!(extract("const x = 42;").is_empty());
    }
}
