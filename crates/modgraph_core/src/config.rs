use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use log::{debug, info, trace, warn};
use path_clean::clean;
use serde_json::{Map, Value};
use std::{
    collections::HashSet,
    ffi::OsStr,
    fs,
    path::{Component, Path, PathBuf},
};

use crate::{
    constants::{
        DECLARATION_SUFFIX, DEFAULT_EXCLUDES, DEFAULT_INCLUDE, JS_EXTENSIONS, TS_EXTENSIONS,
    },
    error::{ConfigDiagnostic, ConfigError},
    jsonc,
};

/// What to do when a project config is malformed or unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OnConfigError {
    /// Abort with a [`ConfigError`].
    #[default]
    Fail,
    /// Log the diagnostics and carry on with whatever could be read.
    Ignore,
}

/// Compiler options that affect which files make up a program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilerOptions {
    pub allow_js: bool,
    pub no_resolve: bool,
    pub out_dir: Option<PathBuf>,
    pub type_roots: Option<Vec<PathBuf>>,
    pub types: Option<Vec<String>>,
    pub config_file_path: Option<PathBuf>,
}

impl CompilerOptions {
    /// Extensions a wildcard include may pick up.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        let mut exts = TS_EXTENSIONS.to_vec();
        if self.allow_js {
            exts.extend_from_slice(JS_EXTENSIONS);
        }
        exts
    }
}

#[derive(Debug, Clone)]
pub struct ParsedConfig {
    pub config_path: PathBuf,
    pub file_names: Vec<PathBuf>,
    pub options: CompilerOptions,
    /// Problems that were let through under [`OnConfigError::Ignore`].
    pub diagnostics: Vec<ConfigDiagnostic>,
}

/// Reads a tsconfig file and resolves it into a list of project files.
pub fn load_config(config_path: &Path, on_error: OnConfigError) -> Result<ParsedConfig> {
    let config_path = config_path
        .canonicalize()
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    info!("Loading project config: {}", config_path.display());

    let mut ignored = Vec::new();
    let value = match read_config_file(&config_path)? {
        Ok(value) => value,
        Err(diagnostic) => match on_error {
            OnConfigError::Fail => return Err(ConfigError::Parse { diagnostic }.into()),
            OnConfigError::Ignore => {
                warn!("Ignoring config parse error: {}", diagnostic);
                ignored.push(diagnostic);
                Value::Object(Map::new())
            }
        },
    };

    let mut diagnostics = Vec::new();
    let mut chain = vec![config_path.clone()];
    let raw = RawConfig::read(&value, &config_path, &mut diagnostics, &mut chain)?;
    let options = CompilerOptions::from_raw(&raw.compiler_options, &config_path, &mut diagnostics);
    let file_names = expand_file_names(&raw, &options, &config_path, &mut diagnostics);

    if !diagnostics.is_empty() {
        match on_error {
            OnConfigError::Fail => return Err(ConfigError::Resolution { diagnostics }.into()),
            OnConfigError::Ignore => {
                for d in &diagnostics {
                    warn!("Ignoring config error: {}", d);
                }
            }
        }
    }

    ignored.extend(diagnostics);
    info!("Resolved {} project files", file_names.len());
    Ok(ParsedConfig { config_path, file_names, options, diagnostics: ignored })
}

/// Outer error: the file could not be read. Inner error: it is not JSON.
fn read_config_file(path: &Path) -> Result<std::result::Result<Value, ConfigDiagnostic>> {
    trace!("Reading config file: {}", path.display());
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str::<Value>(&jsonc::to_plain_json(&text))
        .map_err(|e| ConfigDiagnostic::new(path, e.to_string()).at(e.line(), e.column())))
}

/// A list of `files`/`include`/`exclude` entries and the directory they are
/// relative to.
#[derive(Debug, Clone)]
struct Specs {
    base: PathBuf,
    patterns: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct RawConfig {
    files: Option<Specs>,
    include: Option<Specs>,
    exclude: Option<Specs>,
    compiler_options: Map<String, Value>,
}

const PATH_OPTIONS: &[&str] = &["outDir", "baseUrl", "rootDir", "declarationDir"];

impl RawConfig {
    fn read(
        value: &Value,
        path: &Path,
        diagnostics: &mut Vec<ConfigDiagnostic>,
        chain: &mut Vec<PathBuf>,
    ) -> Result<RawConfig> {
        let Some(obj) = value.as_object() else {
            diagnostics.push(ConfigDiagnostic::new(
                path,
                "The root value of a config file must be an object.",
            ));
            return Ok(RawConfig::default());
        };
        let dir = path.parent().unwrap_or(Path::new("/")).to_path_buf();

        let mut merged = RawConfig::default();
        for spec in extends_specs(obj.get("extends"), path, diagnostics) {
            if let Some(base) = read_extended(&spec, &dir, path, diagnostics, chain)? {
                merged = merged.overlay(base);
            }
        }

        let own = RawConfig {
            files: read_specs(obj, "files", &dir, path, diagnostics),
            include: read_specs(obj, "include", &dir, path, diagnostics),
            exclude: read_specs(obj, "exclude", &dir, path, diagnostics),
            compiler_options: read_compiler_options(obj, &dir, path, diagnostics),
        };
        Ok(merged.overlay(own))
    }

    fn overlay(self, top: RawConfig) -> RawConfig {
        let mut compiler_options = self.compiler_options;
        compiler_options.extend(top.compiler_options);
        RawConfig {
            files: top.files.or(self.files),
            include: top.include.or(self.include),
            exclude: top.exclude.or(self.exclude),
            compiler_options,
        }
    }
}

fn extends_specs(
    value: Option<&Value>,
    path: &Path,
    diagnostics: &mut Vec<ConfigDiagnostic>,
) -> Vec<String> {
    match value {
        None => vec![],
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => {
            items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
        }
        Some(_) => {
            diagnostics.push(ConfigDiagnostic::new(
                path,
                "'extends' requires a value of type string or Array.",
            ));
            vec![]
        }
    }
}

fn read_extended(
    spec: &str,
    dir: &Path,
    path: &Path,
    diagnostics: &mut Vec<ConfigDiagnostic>,
    chain: &mut Vec<PathBuf>,
) -> Result<Option<RawConfig>> {
    let Some(base_path) = resolve_extends(spec, dir) else {
        diagnostics.push(ConfigDiagnostic::new(path, format!("File '{}' not found.", spec)));
        return Ok(None);
    };
    if chain.contains(&base_path) {
        let cycle: Vec<String> =
            chain.iter().chain([&base_path]).map(|p| p.display().to_string()).collect();
        diagnostics.push(ConfigDiagnostic::new(
            path,
            format!("Circularity detected while resolving configuration: {}", cycle.join(" -> ")),
        ));
        return Ok(None);
    }
    debug!("Config {} extends {}", path.display(), base_path.display());

    let value = match read_config_file(&base_path)? {
        Ok(value) => value,
        Err(diagnostic) => {
            diagnostics.push(diagnostic);
            return Ok(None);
        }
    };
    chain.push(base_path.clone());
    let raw = RawConfig::read(&value, &base_path, diagnostics, chain);
    chain.pop();
    raw.map(Some)
}

fn resolve_extends(spec: &str, dir: &Path) -> Option<PathBuf> {
    let with_json = |p: PathBuf| -> Option<PathBuf> {
        if p.is_file() {
            return Some(p);
        }
        let json = PathBuf::from(format!("{}.json", p.display()));
        json.is_file().then_some(json)
    };

    if spec.starts_with("./") || spec.starts_with("../") || Path::new(spec).is_absolute() {
        return with_json(clean(dir.join(spec)));
    }

    // Package config, e.g. "@tsconfig/node18/tsconfig.json" or "@tsconfig/strictest"
    for ancestor in dir.ancestors() {
        let candidate = ancestor.join("node_modules").join(spec);
        trace!("Checking extends candidate: {:?}", candidate);
        if candidate.is_dir() {
            let nested = candidate.join("tsconfig.json");
            if nested.is_file() {
                return Some(nested);
            }
        } else if let Some(found) = with_json(candidate) {
            return Some(found);
        }
    }
    None
}

fn read_specs(
    obj: &Map<String, Value>,
    key: &str,
    dir: &Path,
    path: &Path,
    diagnostics: &mut Vec<ConfigDiagnostic>,
) -> Option<Specs> {
    let value = obj.get(key)?;
    let Some(items) = value.as_array() else {
        diagnostics.push(ConfigDiagnostic::new(
            path,
            format!("'{}' requires a value of type Array.", key),
        ));
        return None;
    };

    let mut patterns = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(s) => patterns.push(s.to_string()),
            None => diagnostics.push(ConfigDiagnostic::new(
                path,
                format!("'{}' entries must be strings, found {}.", key, item),
            )),
        }
    }
    Some(Specs { base: dir.to_path_buf(), patterns })
}

fn read_compiler_options(
    obj: &Map<String, Value>,
    dir: &Path,
    path: &Path,
    diagnostics: &mut Vec<ConfigDiagnostic>,
) -> Map<String, Value> {
    let Some(value) = obj.get("compilerOptions") else {
        return Map::new();
    };
    let Some(options) = value.as_object() else {
        diagnostics.push(ConfigDiagnostic::new(
            path,
            "'compilerOptions' requires a value of type object.",
        ));
        return Map::new();
    };

    // Path options are relative to the config that declares them
    let absolutize = |s: &str| Value::String(clean(dir.join(s)).to_string_lossy().to_string());
    let mut options = options.clone();
    for key in PATH_OPTIONS {
        if let Some(Value::String(s)) = options.get(*key) {
            let abs = absolutize(s);
            options.insert(key.to_string(), abs);
        }
    }
    if let Some(Value::Array(roots)) = options.get("typeRoots") {
        let abs: Vec<Value> =
            roots.iter().map(|r| r.as_str().map(absolutize).unwrap_or(r.clone())).collect();
        options.insert("typeRoots".to_string(), Value::Array(abs));
    }
    options
}

impl CompilerOptions {
    fn from_raw(
        raw: &Map<String, Value>,
        config_path: &Path,
        diagnostics: &mut Vec<ConfigDiagnostic>,
    ) -> CompilerOptions {
        let mut bool_option = |key: &str| match raw.get(key) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                diagnostics.push(ConfigDiagnostic::new(
                    config_path,
                    format!("Compiler option '{}' requires a value of type boolean.", key),
                ));
                false
            }
        };
        let allow_js = bool_option("allowJs");
        let no_resolve = bool_option("noResolve");

        let path_option = |key: &str| raw.get(key).and_then(Value::as_str).map(PathBuf::from);
        let string_list = |key: &str| {
            raw.get(key).and_then(Value::as_array).map(|items| {
                items.iter().filter_map(Value::as_str).map(str::to_string).collect::<Vec<_>>()
            })
        };

        CompilerOptions {
            allow_js,
            no_resolve,
            out_dir: path_option("outDir"),
            type_roots: string_list("typeRoots")
                .map(|roots| roots.into_iter().map(PathBuf::from).collect()),
            types: string_list("types"),
            config_file_path: Some(config_path.to_path_buf()),
        }
    }
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A glob split into the literal directory it starts at and the wildcard
/// remainder, which is matched against paths relative to that directory.
#[derive(Debug, Clone)]
struct SpecPattern {
    base: PathBuf,
    rest: Option<Pattern>,
    wildcard_last: bool,
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

impl SpecPattern {
    fn new(base: &Path, spec: &str, as_include: bool) -> Option<SpecPattern> {
        let full = clean(base.join(spec));
        let mut literal = PathBuf::new();
        let mut rest: Vec<String> = Vec::new();
        for component in full.components() {
            let part = component.as_os_str().to_string_lossy();
            if rest.is_empty() && !has_wildcard(&part) {
                literal.push(component.as_os_str());
            } else {
                rest.push(part.to_string());
            }
        }

        if as_include && rest.is_empty() {
            // "src" means "src/**/*"; "src/a.ts" names a single file
            if literal.is_dir() {
                rest.push("**".to_string());
                rest.push("*".to_string());
            } else {
                let name = literal.file_name()?.to_string_lossy().to_string();
                literal.pop();
                rest.push(Pattern::escape(&name));
            }
        }

        let wildcard_last = rest.last().is_some_and(|s| has_wildcard(s));
        let rest = if rest.is_empty() { None } else { Pattern::new(&rest.join("/")).ok() };
        Some(SpecPattern { base: literal, rest, wildcard_last })
    }

    fn relative(&self, path: &Path) -> Option<Vec<String>> {
        let rel = path.strip_prefix(&self.base).ok()?;
        Some(
            rel.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().to_string()),
                    _ => None,
                })
                .collect(),
        )
    }

    fn matches_file(&self, path: &Path) -> bool {
        match (&self.rest, self.relative(path)) {
            (Some(pattern), Some(rel)) => pattern.matches_with(&rel.join("/"), MATCH_OPTIONS),
            _ => false,
        }
    }

    /// Excludes match the path itself or any of its ancestors.
    fn excludes(&self, path: &Path) -> bool {
        let Some(rel) = self.relative(path) else {
            return false;
        };
        match &self.rest {
            None => true,
            Some(pattern) => (1..=rel.len())
                .any(|n| pattern.matches_with(&rel[..n].join("/"), MATCH_OPTIONS)),
        }
    }
}

fn expand_file_names(
    raw: &RawConfig,
    options: &CompilerOptions,
    config_path: &Path,
    diagnostics: &mut Vec<ConfigDiagnostic>,
) -> Vec<PathBuf> {
    let config_dir = config_path.parent().unwrap_or(Path::new("/")).to_path_buf();
    let extensions = options.supported_extensions();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut file_names: Vec<PathBuf> = Vec::new();

    if let Some(files) = &raw.files {
        if files.patterns.is_empty() && raw.include.is_none() {
            diagnostics.push(ConfigDiagnostic::new(
                config_path,
                "The 'files' list in config file is empty.",
            ));
        }
        for spec in &files.patterns {
            let path = clean(files.base.join(spec));
            if !path.is_file() {
                diagnostics.push(ConfigDiagnostic::new(
                    config_path,
                    format!("File '{}' not found.", path.display()),
                ));
                continue;
            }
            if seen.insert(path.clone()) {
                trace!("Listed file: {}", path.display());
                file_names.push(path);
            }
        }
    }

    let include = match (&raw.include, &raw.files) {
        (Some(include), _) => Some(include.clone()),
        (None, None) => {
            Some(Specs { base: config_dir.clone(), patterns: vec![DEFAULT_INCLUDE.to_string()] })
        }
        (None, Some(_)) => None,
    };
    let exclude = raw.exclude.clone().unwrap_or_else(|| {
        let mut patterns: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
        if let Some(out_dir) = &options.out_dir {
            patterns.push(out_dir.to_string_lossy().to_string());
        }
        Specs { base: config_dir.clone(), patterns }
    });

    let excludes: Vec<SpecPattern> =
        exclude.patterns.iter().filter_map(|s| SpecPattern::new(&exclude.base, s, false)).collect();
    debug!("Compiled {} exclude patterns", excludes.len());

    let mut matched: Vec<PathBuf> = Vec::new();
    if let Some(include) = &include {
        for spec in &include.patterns {
            let Some(pattern) = SpecPattern::new(&include.base, spec, true) else {
                continue;
            };
            trace!("Expanding include '{}' from {}", spec, pattern.base.display());
            for path in walk_include(&pattern, &excludes) {
                if pattern.wildcard_last && !has_supported_extension(&path, &extensions) {
                    continue;
                }
                if seen.insert(path.clone()) {
                    matched.push(path);
                }
            }
        }
    }
    file_names.extend(drop_lower_priority(matched));

    if file_names.is_empty() {
        let list = |s: Option<&Specs>| {
            serde_json::to_string(&s.map(|s| s.patterns.clone()).unwrap_or_default())
                .unwrap_or_default()
        };
        diagnostics.push(ConfigDiagnostic::new(
            config_path,
            format!(
                "No inputs were found in config file '{}'. \
                 Specified 'include' paths were '{}' and 'exclude' paths were '{}'.",
                config_path.display(),
                list(include.as_ref()),
                list(Some(&exclude)),
            ),
        ));
    }
    file_names
}

/// Files under the pattern's base that match it, files before subdirectories,
/// alphabetical, hidden and excluded entries skipped.
fn walk_include(pattern: &SpecPattern, excludes: &[SpecPattern]) -> Vec<PathBuf> {
    if !pattern.base.is_dir() {
        return vec![];
    }
    let excludes = excludes.to_vec();
    let base = pattern.base.clone();
    let walker = WalkBuilder::new(&pattern.base)
        .standard_filters(false)
        .hidden(true)
        .sort_by_file_path(|a, b| a.is_dir().cmp(&b.is_dir()).then_with(|| a.cmp(b)))
        .filter_entry(move |entry| {
            let path = entry.path();
            if entry.depth() > 0
                && entry.file_type().is_some_and(|ft| ft.is_dir())
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
                && DEFAULT_EXCLUDES.contains(&name)
                && !base.components().any(|c| c.as_os_str() == OsStr::new(name))
            {
                return false;
            }
            !excludes.iter().any(|e| e.excludes(path))
        })
        .build();

    walker
        .filter_map(|res| res.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| pattern.matches_file(path))
        .collect()
}

fn has_supported_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|ext| extensions.contains(&ext))
}

fn is_declaration(path: &Path) -> bool {
    path.to_string_lossy().ends_with(DECLARATION_SUFFIX)
}

/// `a.d.ts` and `a.js` are dropped when `a.ts` or `a.tsx` was also matched.
fn drop_lower_priority(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let implementation_key = |p: &Path| -> Option<PathBuf> {
        let ext = p.extension()?.to_str()?;
        (matches!(ext, "ts" | "tsx") && !is_declaration(p)).then(|| p.with_extension(""))
    };
    let implemented: HashSet<PathBuf> =
        files.iter().filter_map(|p| implementation_key(p)).collect();

    files
        .into_iter()
        .filter(|p| {
            let key = if is_declaration(p) {
                let s = p.to_string_lossy();
                PathBuf::from(&s[..s.len() - DECLARATION_SUFFIX.len()])
            } else if has_supported_extension(p, JS_EXTENSIONS) {
                p.with_extension("")
            } else {
                return true;
            };
            let keep = !implemented.contains(&key);
            if !keep {
                trace!("Dropping {} in favour of its implementation file", p.display());
            }
            keep
        })
        .collect()
}
