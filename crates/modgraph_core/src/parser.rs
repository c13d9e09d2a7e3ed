use anyhow::{Context, Result};
use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::{ImportDeclaration as OxcImportDeclaration, Statement};
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::{GetSpan, SourceType};
use std::{fs, path::Path};

use crate::types::{ImportDeclaration, ModuleSpecifier, SourceFile, Span, TopLevelNode};

/// Reads and parses one file. Syntax errors are recorded on the returned
/// [`SourceFile`]; only I/O failures are errors.
pub fn parse_source_file(file: &Path) -> Result<SourceFile> {
    trace!("Parsing source file: {}", file.display());
    let text =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(parse_source_text(file, text))
}

pub fn parse_source_text(file: &Path, text: String) -> SourceFile {
    let (nodes, parse_errors) = lower_program(file, &text);
    trace!("Lowered {} top-level nodes from {}", nodes.len(), file.display());
    SourceFile { path: file.to_path_buf(), text, nodes, parse_errors }
}

fn lower_program(file: &Path, text: &str) -> (Vec<TopLevelNode>, Vec<String>) {
    let st = source_type_for(file);
    let allocator = Allocator::default();
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(&allocator, text, st).parse();

    let parse_errors: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    if !parse_errors.is_empty() {
        debug!(
            "{} parse errors in {} (panicked: {})",
            parse_errors.len(),
            file.display(),
            panicked
        );
    }

    let nodes = program
        .body
        .iter()
        .map(|stmt| match stmt {
            Statement::ImportDeclaration(decl) => TopLevelNode::Import(lower_import(decl, text)),
            other => TopLevelNode::Other { span: span_of(other.span()) },
        })
        .collect();
    (nodes, parse_errors)
}

fn lower_import(decl: &OxcImportDeclaration, text: &str) -> ImportDeclaration {
    let span = span_of(decl.source.span);
    let raw = text.get(span.start as usize..span.end as usize).map(str::to_string);
    ImportDeclaration {
        specifier: ModuleSpecifier { raw, value: decl.source.value.to_string(), span },
        span: span_of(decl.span),
    }
}

fn span_of(span: oxc_span::Span) -> Span {
    Span { start: span.start, end: span.end }
}

fn source_type_for(path: &Path) -> SourceType {
    // from_path understands .d.ts, .mts and friends
    SourceType::from_path(path).unwrap_or_else(|_| {
        let ext = path.extension().and_then(|e| e.to_str());
        SourceType::default()
            .with_jsx(matches!(ext, Some("tsx") | Some("jsx")))
            .with_typescript(true)
            .with_module(true)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let file_path = dir.join(name);
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn imports(file: &SourceFile) -> Vec<&ImportDeclaration> {
        file.children().iter().filter_map(TopLevelNode::as_import_declaration).collect()
    }

    #[test]
    fn test_top_level_nodes_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_test_file(
            temp_dir.path(),
            "test.ts",
            "import a from './a';\nconst x = 1;\nimport './b';\n",
        );
        let parsed = parse_source_file(&file).unwrap();
        let kinds: Vec<bool> =
            parsed.children().iter().map(|n| n.as_import_declaration().is_some()).collect();
        assert_eq!(kinds, vec![true, false, true]);
        assert!(parsed.parse_errors.is_empty());
    }

    #[test]
    fn test_specifier_raw_keeps_quotes() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_test_file(temp_dir.path(), "test.ts", "import { x } from \"../foo\";");
        let parsed = parse_source_file(&file).unwrap();
        let decls = imports(&parsed);
        assert_eq!(decls[0].specifier.raw.as_deref(), Some("\"../foo\""));
        assert_eq!(decls[0].specifier.value, "../foo");
    }

    #[test]
    fn test_type_only_import_is_an_import() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_test_file(
            temp_dir.path(),
            "test.ts",
            "import type { Props } from './StandardProps';\nimport { y } from './y';",
        );
        let parsed = parse_source_file(&file).unwrap();
        let decls = imports(&parsed);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].specifier.text(), "./StandardProps");
    }

    #[test]
    fn test_declaration_file_parses() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_test_file(
            temp_dir.path(),
            "withStyles.d.ts",
            "import { Theme } from './createTheme';\n\
             export declare function withStyles(): Theme;\n",
        );
        let parsed = parse_source_file(&file).unwrap();
        assert!(parsed.parse_errors.is_empty());
        assert_eq!(imports(&parsed).len(), 1);
    }

    #[test]
    fn test_escaped_specifier_is_decoded() {
        let temp_dir = TempDir::new().unwrap();
        let file =
            create_test_file(temp_dir.path(), "test.ts", "import { x } from './caf\\u00e9';");
        let parsed = parse_source_file(&file).unwrap();
        let decls = imports(&parsed);
        assert_eq!(decls[0].specifier.raw.as_deref(), Some("'./caf\\u00e9'"));
        assert_eq!(decls[0].specifier.text(), "./café");
    }

    #[test]
    fn test_syntax_errors_are_recorded_not_returned() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_test_file(temp_dir.path(), "broken.ts", "import { from ;;; {{");
        let parsed = parse_source_file(&file).unwrap();
        assert!(!parsed.parse_errors.is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(parse_source_file(&temp_dir.path().join("nope.ts")).is_err());
    }

    #[test]
    fn test_tsx_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_test_file(
            temp_dir.path(),
            "Button.tsx",
            "import React from 'react';\nexport const B = () => <div />;\n",
        );
        let parsed = parse_source_file(&file).unwrap();
        assert!(parsed.parse_errors.is_empty());
        assert_eq!(imports(&parsed)[0].specifier.text(), "react");
    }
}
