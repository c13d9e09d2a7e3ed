use std::path::PathBuf;

/// Byte range into a file's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

/// The module specifier of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpecifier {
    /// Verbatim source text of the literal, quotes included. `None` when the
    /// literal's span does not address the file's text.
    pub raw: Option<String>,
    /// The parsed string value, escapes decoded.
    pub value: String,
    pub span: Span,
}

impl ModuleSpecifier {
    /// The module name the import refers to. Falls back to the unquoted
    /// source text when the parser produced no value.
    pub fn text(&self) -> String {
        if !self.value.is_empty() {
            return self.value.clone();
        }
        self.raw.as_deref().and_then(unquote).map(str::to_string).unwrap_or_default()
    }
}

fn unquote(raw: &str) -> Option<&str> {
    let mut chars = raw.chars();
    let open = chars.next()?;
    if !matches!(open, '\'' | '"') {
        return None;
    }
    raw.strip_prefix(open)?.strip_suffix(open)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    pub specifier: ModuleSpecifier,
    pub span: Span,
}

/// A direct child of a file's syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevelNode {
    Import(ImportDeclaration),
    Other { span: Span },
}

impl TopLevelNode {
    pub fn as_import_declaration(&self) -> Option<&ImportDeclaration> {
        match self {
            TopLevelNode::Import(decl) => Some(decl),
            TopLevelNode::Other { .. } => None,
        }
    }
}

/// One parsed file of a [`Program`].
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    pub(crate) nodes: Vec<TopLevelNode>,
    pub parse_errors: Vec<String>,
}

impl SourceFile {
    /// Visits the file's top-level nodes in document order.
    pub fn for_each_child<F: FnMut(&TopLevelNode)>(&self, visit: F) {
        self.nodes.iter().for_each(visit);
    }

    pub fn children(&self) -> &[TopLevelNode] {
        &self.nodes
    }
}

/// Every source file of a project, parsed.
#[derive(Debug, Clone)]
pub struct Program {
    pub(crate) files: Vec<SourceFile>,
}

impl Program {
    pub fn source_files(&self) -> &[SourceFile] {
        &self.files
    }
}
