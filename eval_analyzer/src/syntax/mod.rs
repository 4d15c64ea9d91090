//! Syntax analysis: source text to parse tree plus syntax diagnostics
//!
//! `parse` is total. Lexer and parser problems arrive through the error
//! listener, and a failure inside the parser itself becomes one final
//! diagnostic instead of escaping to the caller.

pub mod error;
pub mod listener;
pub mod parser;

pub use crate::grammar::ast::nodes::Program;
pub use error::{SyntaxError, SyntaxResult};
pub use listener::{CollectingErrorListener, ErrorListener, PositionLookup, SyntaxDiagnostic};
pub use parser::EvalParser;

use crate::config::runtime::ParserPreferences;
use crate::lexical;
use crate::logging::codes;
use crate::{log_debug, log_error};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};

/// Result of parsing one document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub tree: Program,
    pub diagnostics: Vec<SyntaxDiagnostic>,
    /// Significant tokens seen by the parser, EOF included
    pub token_count: usize,
}

impl ParseOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == crate::diagnostics::Severity::Error)
    }
}

/// Lex and parse with preferences taken from the environment
pub fn parse(text: &str) -> ParseOutcome {
    parse_with_preferences(text, ParserPreferences::default())
}

pub fn parse_with_preferences(text: &str, preferences: ParserPreferences) -> ParseOutcome {
    log_debug!("Starting syntax analysis", "bytes" => text.len());

    let mut listener = CollectingErrorListener::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let tokens = lexical::tokenize(text, &mut listener);
        let token_count = tokens.len();
        let tree = EvalParser::with_preferences(tokens, &mut listener, preferences).parse_program();
        (tree, token_count)
    }));

    match result {
        Ok((tree, token_count)) => ParseOutcome {
            tree,
            diagnostics: listener.into_errors(),
            token_count,
        },
        Err(payload) => {
            let error = SyntaxError::internal_parser_error(&panic_message(payload.as_ref()));
            log_error!(error.error_code(), "Parser failed; returning partial diagnostics",
                "error" => error
            );
            listener.record_failure(None, None, &error.to_string());
            ParseOutcome {
                tree: Program::default(),
                diagnostics: listener.into_errors(),
                token_count: 0,
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        codes::get_description(codes::syntax::INTERNAL_PARSER_ERROR.as_str()).to_string()
    }
}
