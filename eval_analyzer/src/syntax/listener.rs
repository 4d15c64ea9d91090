//! Error listener protocol shared by the lexer and the parser
//!
//! Both recognizers report problems through [`ErrorListener`] instead of
//! returning errors, so a broken document still yields a full diagnostic
//! list. [`CollectingErrorListener`] accumulates them in report order.

use crate::config::compile_time::syntax::MAX_SYNTAX_DIAGNOSTICS;
use crate::diagnostics::Severity;
use crate::log_warning;
use crate::logging::codes;
use serde::{Deserialize, Serialize};

/// A syntax problem as reported by the recognizers
///
/// `column` is the zero-based character position within the line, matching
/// the recognizer's own convention. A line of 0 means "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxDiagnostic {
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub severity: Severity,
}

/// Resolves token indices to source positions for ambiguity reports
pub trait PositionLookup {
    fn line_at(&self, index: usize) -> Option<u32>;
    fn column_at(&self, index: usize) -> Option<u32>;
}

impl PositionLookup for crate::tokens::TokenStream {
    fn line_at(&self, index: usize) -> Option<u32> {
        self.token_at_index(index).map(|t| t.span.start.line)
    }

    fn column_at(&self, index: usize) -> Option<u32> {
        self.token_at_index(index)
            .map(|t| t.span.start.char_position_in_line())
    }
}

/// Callback surface invoked by the lexer and parser
pub trait ErrorListener {
    /// `offending_text` is `None` for lexer errors, which have no token yet
    fn syntax_error(
        &mut self,
        offending_text: Option<&str>,
        line: u32,
        column: u32,
        message: &str,
    );

    fn report_ambiguity(
        &mut self,
        lookup: Option<&dyn PositionLookup>,
        start_index: usize,
        stop_index: usize,
    );

    /// Informational; no diagnostic
    fn report_attempting_full_context(&mut self, _start_index: usize, _stop_index: usize) {}

    /// Informational; no diagnostic
    fn report_context_sensitivity(&mut self, _start_index: usize, _stop_index: usize) {}
}

/// Listener that accumulates diagnostics in report order
#[derive(Debug, Default)]
pub struct CollectingErrorListener {
    errors: Vec<SyntaxDiagnostic>,
    dropped: usize,
}

impl CollectingErrorListener {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, diagnostic: SyntaxDiagnostic) {
        if self.errors.len() >= MAX_SYNTAX_DIAGNOSTICS {
            if self.dropped == 0 {
                log_warning!(code = codes::syntax::DIAGNOSTIC_LIMIT_REACHED,
                    "Syntax diagnostic limit reached, further reports dropped",
                    "limit" => MAX_SYNTAX_DIAGNOSTICS
                );
            }
            self.dropped += 1;
            return;
        }
        self.errors.push(diagnostic);
    }

    /// Record a failure that escaped the parser as one final diagnostic
    pub fn record_failure(&mut self, line: Option<u32>, column: Option<u32>, message: &str) {
        self.push(SyntaxDiagnostic {
            line: line.unwrap_or(0),
            column: column.unwrap_or(0),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    pub fn errors(&self) -> &[SyntaxDiagnostic] {
        &self.errors
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    pub fn into_errors(self) -> Vec<SyntaxDiagnostic> {
        self.errors
    }
}

impl ErrorListener for CollectingErrorListener {
    fn syntax_error(
        &mut self,
        offending_text: Option<&str>,
        line: u32,
        column: u32,
        message: &str,
    ) {
        let message = format!(
            "{} (token: \"{}\")",
            message,
            offending_text.unwrap_or("unknown")
        );
        self.push(SyntaxDiagnostic {
            line,
            column,
            message,
            severity: Severity::Error,
        });
    }

    fn report_ambiguity(
        &mut self,
        lookup: Option<&dyn PositionLookup>,
        start_index: usize,
        stop_index: usize,
    ) {
        let (line, column) = match lookup {
            Some(lookup) => (
                lookup.line_at(start_index).unwrap_or(0),
                lookup
                    .column_at(start_index)
                    .unwrap_or(start_index as u32),
            ),
            None => (0, start_index as u32),
        };

        log_warning!(code = codes::syntax::AMBIGUOUS_ALTERNATIVE, "Ambiguous alternative",
            "start" => start_index,
            "stop" => stop_index
        );

        self.push(SyntaxDiagnostic {
            line,
            column,
            message: format!(
                "Ambiguity detected from index {} to {}",
                start_index, stop_index
            ),
            severity: Severity::Warning,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLookup;

    impl PositionLookup for FixedLookup {
        fn line_at(&self, _index: usize) -> Option<u32> {
            Some(4)
        }

        fn column_at(&self, _index: usize) -> Option<u32> {
            None
        }
    }

    #[test]
    fn test_syntax_error_message_includes_token() {
        let mut listener = CollectingErrorListener::new();
        listener.syntax_error(Some("@"), 2, 6, "no viable alternative at input '@'");
        listener.syntax_error(None, 3, 0, "token recognition error at: '#'");

        let errors = listener.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].message,
            "no viable alternative at input '@' (token: \"@\")"
        );
        assert_eq!(errors[0].severity, Severity::Error);
        assert!(errors[1].message.ends_with("(token: \"unknown\")"));
    }

    #[test]
    fn test_ambiguity_defaults_without_lookup() {
        let mut listener = CollectingErrorListener::new();
        listener.report_ambiguity(None, 7, 9);

        let diag = &listener.errors()[0];
        assert_eq!((diag.line, diag.column), (0, 7));
        assert_eq!(diag.message, "Ambiguity detected from index 7 to 9");
        assert_eq!(diag.severity, Severity::Warning);
    }

    #[test]
    fn test_ambiguity_partial_lookup_falls_back_to_index() {
        let mut listener = CollectingErrorListener::new();
        listener.report_ambiguity(Some(&FixedLookup), 12, 13);
        let diag = &listener.errors()[0];
        assert_eq!((diag.line, diag.column), (4, 12));
    }

    #[test]
    fn test_informational_callbacks_emit_nothing() {
        let mut listener = CollectingErrorListener::new();
        listener.report_attempting_full_context(1, 2);
        listener.report_context_sensitivity(1, 2);
        assert!(listener.errors().is_empty());
    }

    #[test]
    fn test_recorded_failure_defaults_to_origin() {
        let mut listener = CollectingErrorListener::new();
        listener.record_failure(None, None, "parser crashed");
        let diag = &listener.errors()[0];
        assert_eq!((diag.line, diag.column), (0, 0));
        assert_eq!(diag.message, "parser crashed");
    }
}
