//! Project-relative paths and the node identifiers derived from them.
//!
//! Paths are held as segments and always rendered with `/`, so identifiers
//! do not depend on the host's path separator.

use serde::Serialize;
use std::{
    fmt,
    path::{Component, Path},
};

/// Suffixes removed from the last segment of a node path, checked in order.
const MODULE_SUFFIXES: &[&str] =
    &[".d.ts", ".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs"];

/// Identifier of the directory's module once its `index` segment is dropped.
const INDEX: &str = "index";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RelPath {
    segments: Vec<String>,
}

impl RelPath {
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        RelPath { segments: segments.into_iter().map(Into::into).collect() }
    }

    /// Parses a `/`-separated relative path. Empty and `.` segments vanish.
    pub fn parse(path: &str) -> Self {
        RelPath::new(path.split(['/', '\\']).filter(|s| !s.is_empty() && *s != "."))
    }

    /// The path that leads from directory `base` to `target`, with `..`
    /// segments where `target` is not below `base`. Both paths are expected
    /// to be absolute and free of `.`/`..` components.
    pub fn between(base: &Path, target: &Path) -> Self {
        let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
        let target: Vec<Component> =
            target.components().filter(|c| *c != Component::CurDir).collect();

        let common = base.iter().zip(&target).take_while(|(b, t)| b == t).count();

        let mut segments: Vec<String> = vec!["..".to_string(); base.len() - common];
        segments.extend(target[common..].iter().filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        }));
        RelPath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the path climbs out of its base directory.
    pub fn is_outside(&self) -> bool {
        self.segments.first().is_some_and(|s| s == "..")
    }

    /// Strips module suffixes (`.d.ts`, `.ts`, `.js`, ...) from the last
    /// segment and drops trailing `index` segments, until nothing changes.
    pub fn canonical(&self) -> RelPath {
        let mut segments = self.segments.clone();
        loop {
            let before = segments.clone();
            if let Some(last) = segments.last_mut()
                && let Some(stripped) = strip_module_suffix(last)
            {
                *last = stripped.to_string();
            }
            while segments.last().is_some_and(|s| s == INDEX || s.is_empty()) {
                segments.pop();
            }
            if segments == before {
                return RelPath { segments };
            }
        }
    }
}

fn strip_module_suffix(segment: &str) -> Option<&str> {
    MODULE_SUFFIXES.iter().find_map(|suffix| segment.strip_suffix(suffix))
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Canonical name of a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&RelPath> for NodeId {
    fn from(path: &RelPath) -> Self {
        let canonical = path.canonical();
        if canonical.is_empty() { NodeId(INDEX.to_string()) } else { NodeId(canonical.to_string()) }
    }
}

impl From<&str> for NodeId {
    fn from(path: &str) -> Self {
        NodeId::from(&RelPath::parse(path))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
