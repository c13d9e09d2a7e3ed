//! File extension tables shared by config expansion and module resolution.
//!
//! Declaration files (`.d.ts`) carry the `ts` extension as far as
//! [`std::path::Path::extension`] is concerned, so they are matched through
//! [`DECLARATION_SUFFIX`] rather than an entry of their own.

/// Extensions picked up by `include` wildcards.
pub const TS_EXTENSIONS: &[&str] = &[
    "ts",  // TypeScript (and .d.ts)
    "tsx", // TypeScript with JSX
    "mts", // TypeScript module
    "cts", // TypeScript CommonJS
];

/// Additional extensions picked up when `allowJs` is set.
pub const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

/// Suffix of a type-declaration-only module.
pub const DECLARATION_SUFFIX: &str = ".d.ts";

/// Suffixes tried, in priority order, when resolving an extensionless relative import.
pub const RESOLVE_SUFFIXES: &[&str] = &[".ts", ".tsx", ".d.ts"];

/// Suffixes tried after [`RESOLVE_SUFFIXES`] when `allowJs` is set.
pub const RESOLVE_JS_SUFFIXES: &[&str] = &[".js", ".jsx"];

/// Index files tried, in priority order, when an import names a directory.
pub const INDEX_FILES: &[&str] = &["index.ts", "index.tsx", "index.d.ts"];

/// Index files tried after [`INDEX_FILES`] when `allowJs` is set.
pub const JS_INDEX_FILES: &[&str] = &["index.js", "index.jsx"];

/// Directories excluded when a config does not specify `exclude`.
pub const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// Include pattern used when a config specifies neither `files` nor `include`.
pub const DEFAULT_INCLUDE: &str = "**/*";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_files_follow_resolve_suffixes() {
        assert_eq!(INDEX_FILES.len(), RESOLVE_SUFFIXES.len());
        for suffix in RESOLVE_SUFFIXES {
            let expected = format!("index{}", suffix);
            assert!(INDEX_FILES.contains(&expected.as_str()), "INDEX_FILES missing '{}'", expected);
        }
        for suffix in RESOLVE_JS_SUFFIXES {
            let expected = format!("index{}", suffix);
            assert!(JS_INDEX_FILES.contains(&expected.as_str()));
        }
    }

    #[test]
    fn test_declaration_suffix_is_typescript() {
        let ext = DECLARATION_SUFFIX.rsplit('.').next().unwrap();
        assert!(TS_EXTENSIONS.contains(&ext));
        assert!(!JS_EXTENSIONS.contains(&ext));
    }
}
