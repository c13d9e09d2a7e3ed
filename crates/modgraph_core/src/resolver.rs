use log::trace;
use path_clean::clean;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::CompilerOptions,
    constants::{INDEX_FILES, JS_INDEX_FILES, RESOLVE_JS_SUFFIXES, RESOLVE_SUFFIXES},
};

/// Resolves a relative import the way the TypeScript compiler does for
/// program construction. Bare specifiers are never resolved.
pub fn resolve_relative(
    from_file: &Path,
    request: &str,
    options: &CompilerOptions,
) -> Option<PathBuf> {
    let relative = request.starts_with("./")
        || request.starts_with("../")
        || request == "."
        || request == "..";
    if !relative {
        return None;
    }
    let base = from_file.parent()?;
    let p = clean(base.join(request));
    trace!("Resolving '{}' from {} as {}", request, from_file.display(), p.display());
    resolve_file(&p, options).or_else(|| resolve_directory(&p, options))
}

fn suffixes(options: &CompilerOptions) -> Vec<&'static str> {
    let mut s = RESOLVE_SUFFIXES.to_vec();
    if options.allow_js {
        s.extend_from_slice(RESOLVE_JS_SUFFIXES);
    }
    s
}

fn resolve_file(p: &Path, options: &CompilerOptions) -> Option<PathBuf> {
    let ext = p.extension().and_then(|e| e.to_str());

    // Explicit TypeScript extension, including './foo.d.ts'
    if matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts")) && p.is_file() {
        return Some(p.to_path_buf());
    }

    // ESM-style './foo.js' pointing at './foo.ts'
    if matches!(ext, Some("js") | Some("jsx") | Some("mjs") | Some("cjs")) {
        let stem = p.with_extension("");
        for suffix in RESOLVE_SUFFIXES {
            let candidate = PathBuf::from(format!("{}{}", stem.display(), suffix));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        if options.allow_js && p.is_file() {
            return Some(p.to_path_buf());
        }
    }

    for suffix in suffixes(options) {
        let candidate = PathBuf::from(format!("{}{}", p.display(), suffix));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn resolve_directory(dir: &Path, options: &CompilerOptions) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }
    if let Some(entry) = package_types_entry(dir) {
        return Some(entry);
    }
    let mut index_files = INDEX_FILES.to_vec();
    if options.allow_js {
        index_files.extend_from_slice(JS_INDEX_FILES);
    }
    index_files.into_iter().map(|f| dir.join(f)).find(|candidate| candidate.is_file())
}

/// The declaration entry named by a package.json `types`/`typings` field.
pub(crate) fn package_types_entry(dir: &Path) -> Option<PathBuf> {
    let pkg_json = dir.join("package.json");
    let txt = fs::read_to_string(&pkg_json).ok()?;
    let v = serde_json::from_str::<serde_json::Value>(&txt).ok()?;
    let entry = ["types", "typings"].iter().find_map(|key| v.get(*key).and_then(|x| x.as_str()))?;
    let p = clean(dir.join(entry));
    if p.is_file() {
        return Some(p);
    }
    let with_dts = PathBuf::from(format!("{}.d.ts", p.display()));
    with_dts.is_file().then_some(with_dts)
}

/// Entry files of automatically included type packages.
pub fn type_root_entries(options: &CompilerOptions) -> Vec<PathBuf> {
    let roots: Vec<PathBuf> = match (&options.type_roots, &options.config_file_path) {
        (Some(roots), _) => roots.clone(),
        (None, Some(config)) => config
            .parent()
            .map(|dir| dir.ancestors().map(|a| a.join("node_modules").join("@types")).collect())
            .unwrap_or_default(),
        (None, None) => vec![],
    };

    let mut entries = Vec::new();
    for root in roots.iter().filter(|r| r.is_dir()) {
        let mut packages: Vec<PathBuf> = match &options.types {
            Some(types) => types.iter().map(|t| root.join(t)).filter(|p| p.is_dir()).collect(),
            None => match fs::read_dir(root) {
                Ok(rd) => rd
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.is_dir())
                    .filter(|p| {
                        !p.file_name().is_some_and(|n| n.to_string_lossy().starts_with('.'))
                    })
                    .collect(),
                Err(_) => vec![],
            },
        };
        packages.sort();

        for pkg in packages {
            let entry = package_types_entry(&pkg).or_else(|| {
                let index = pkg.join("index.d.ts");
                index.is_file().then_some(index)
            });
            match entry {
                Some(entry) => {
                    trace!("Type package {} -> {}", pkg.display(), entry.display());
                    entries.push(entry);
                }
                None => trace!("Type package without entry: {}", pkg.display()),
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_resolve_extensionless() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let from = create_test_file(root, "src/a.ts", "");
        let b = create_test_file(root, "src/b.d.ts", "");
        let opts = CompilerOptions::default();
        assert_eq!(resolve_relative(&from, "./b", &opts), Some(b));
    }

    #[test]
    fn test_ts_preferred_over_declaration() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let from = create_test_file(root, "a.ts", "");
        let b = create_test_file(root, "b.ts", "");
        create_test_file(root, "b.d.ts", "");
        assert_eq!(resolve_relative(&from, "./b", &CompilerOptions::default()), Some(b));
    }

    #[test]
    fn test_js_extension_maps_to_ts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let from = create_test_file(root, "a.ts", "");
        let b = create_test_file(root, "b.ts", "");
        assert_eq!(resolve_relative(&from, "./b.js", &CompilerOptions::default()), Some(b));
    }

    #[test]
    fn test_directory_index_and_package_types() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let from = create_test_file(root, "a.ts", "");
        let index = create_test_file(root, "styles/index.d.ts", "");
        create_test_file(root, "lib/package.json", r#"{ "types": "./dist/lib" }"#);
        let lib = create_test_file(root, "lib/dist/lib.d.ts", "");
        let opts = CompilerOptions::default();
        assert_eq!(resolve_relative(&from, "./styles", &opts), Some(index));
        assert_eq!(resolve_relative(&from, "./lib", &opts), Some(lib));
    }

    #[test]
    fn test_js_only_with_allow_js() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let from = create_test_file(root, "a.ts", "");
        let b = create_test_file(root, "b.js", "");
        assert_eq!(resolve_relative(&from, "./b", &CompilerOptions::default()), None);
        let opts = CompilerOptions { allow_js: true, ..Default::default() };
        assert_eq!(resolve_relative(&from, "./b", &opts), Some(b));
    }

    #[test]
    fn test_bare_specifier_not_resolved() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let from = create_test_file(root, "a.ts", "");
        create_test_file(root, "node_modules/react/index.d.ts", "");
        assert_eq!(resolve_relative(&from, "react", &CompilerOptions::default()), None);
    }

    #[test]
    fn test_type_root_entries() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let config = create_test_file(root, "app/tsconfig.json", "{}");
        let react = create_test_file(root, "node_modules/@types/react/index.d.ts", "");
        create_test_file(
            root,
            "node_modules/@types/node/package.json",
            r#"{ "typings": "main.d.ts" }"#,
        );
        let node = create_test_file(root, "node_modules/@types/node/main.d.ts", "");

        let opts = CompilerOptions { config_file_path: Some(config.clone()), ..Default::default() };
        assert_eq!(type_root_entries(&opts), vec![node, react.clone()]);

        let only_react = CompilerOptions {
            config_file_path: Some(config),
            types: Some(vec!["react".to_string()]),
            ..Default::default()
        };
        assert_eq!(type_root_entries(&only_react), vec![react]);
    }
}
