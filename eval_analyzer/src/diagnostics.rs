//! Positioned diagnostics and their editor-marker rendering

use crate::config::constants::{ANALYZER_SOURCE, DEFAULT_MARKER_END_COLUMN, PARSER_SOURCE};
use crate::syntax::SyntaxDiagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A semantic finding on one source line
///
/// Lines are 1-based. Columns are optional; when absent the whole line is
/// meant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    pub message: String,
    pub source: String,
}

impl Diagnostic {
    pub fn error(line: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, line, message)
    }

    pub fn warning(line: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, line, message)
    }

    fn new(severity: Severity, line: u32, message: impl Into<String>) -> Self {
        Self {
            severity,
            line,
            column: None,
            end_column: None,
            message: message.into(),
            source: ANALYZER_SOURCE.to_string(),
        }
    }

    pub fn with_columns(mut self, column: u32, end_column: u32) -> Self {
        self.column = Some(column);
        self.end_column = Some(end_column);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(
                f,
                "{}:{}: {}: {}",
                self.line, column, self.severity, self.message
            ),
            None => write!(f, "{}: {}: {}", self.line, self.severity, self.message),
        }
    }
}

/// Range-based marker as consumed by an editor gutter/underline layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorMarker {
    pub severity: Severity,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub message: String,
    pub source: String,
}

impl From<&Diagnostic> for EditorMarker {
    fn from(diag: &Diagnostic) -> Self {
        Self {
            severity: diag.severity,
            start_line: diag.line,
            start_column: diag.column.unwrap_or(1),
            end_line: diag.line,
            end_column: diag.end_column.unwrap_or(DEFAULT_MARKER_END_COLUMN),
            message: diag.message.clone(),
            source: diag.source.clone(),
        }
    }
}

/// Syntax diagnostics carry a zero-based column and underline one character
impl From<&SyntaxDiagnostic> for EditorMarker {
    fn from(diag: &SyntaxDiagnostic) -> Self {
        Self {
            severity: diag.severity,
            start_line: diag.line,
            start_column: diag.column + 1,
            end_line: diag.line,
            end_column: diag.column + 2,
            message: diag.message.clone(),
            source: PARSER_SOURCE.to_string(),
        }
    }
}

/// Markers for both diagnostic streams, syntax first
pub fn to_markers(syntax: &[SyntaxDiagnostic], semantic: &[Diagnostic]) -> Vec<EditorMarker> {
    syntax
        .iter()
        .map(EditorMarker::from)
        .chain(semantic.iter().map(EditorMarker::from))
        .collect()
}
