use std::{fmt, path::PathBuf};

use thiserror::Error;

/// A single problem found while reading or resolving a project config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDiagnostic {
    pub file: PathBuf,
    /// 1-based line and column, when the problem has a position in the file.
    pub location: Option<(usize, usize)>,
    pub message: String,
}

impl ConfigDiagnostic {
    pub fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self { file: file.into(), location: None, message: message.into() }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.location = Some((line, column));
        self
    }
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some((line, column)) => write!(
                f,
                "{}({},{}): error: {}",
                self.file.display(),
                line,
                column,
                self.message
            ),
            None => write!(f, "{}: error: {}", self.file.display(), self.message),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file is not valid JSON (comments and trailing commas aside).
    #[error("{diagnostic}")]
    Parse { diagnostic: ConfigDiagnostic },

    /// The config parsed but describes an unusable project.
    #[error("{}", format_diagnostics(.diagnostics))]
    Resolution { diagnostics: Vec<ConfigDiagnostic> },
}

impl ConfigError {
    pub fn diagnostics(&self) -> Vec<&ConfigDiagnostic> {
        match self {
            ConfigError::Parse { diagnostic } => vec![diagnostic],
            ConfigError::Resolution { diagnostics } => diagnostics.iter().collect(),
        }
    }
}

fn format_diagnostics(diagnostics: &[ConfigDiagnostic]) -> String {
    diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}
