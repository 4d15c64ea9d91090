//! Syntax errors raised while building the parse tree
//!
//! Display strings are the messages handed to the error listener, so they
//! follow the recognizer conventions (`mismatched input`, `missing`, `no
//! viable alternative`).

use crate::logging::{codes, Code};
use crate::tokens::{Token, TokenStreamError};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("mismatched input '{found}' expecting {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("missing {expected} at '<EOF>'")]
    UnexpectedEndOfInput { expected: String, span: Span },

    #[error("no viable alternative at input '{input}'")]
    NoViableAlternative { input: String, span: Span },

    #[error("maximum nesting depth of {max_depth} exceeded")]
    MaxRecursionDepth { max_depth: usize, span: Span },

    #[error("Internal parser error: {message}")]
    InternalParserError { message: String },
}

impl SyntaxError {
    pub fn unexpected_token(expected: &str, found: &Token, span: Span) -> Self {
        if matches!(found, Token::Eof) {
            return Self::UnexpectedEndOfInput {
                expected: expected.to_string(),
                span,
            };
        }
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.text(),
            span,
        }
    }

    pub fn no_viable_alternative(found: &Token, span: Span) -> Self {
        Self::NoViableAlternative {
            input: found.text(),
            span,
        }
    }

    pub fn max_recursion_depth(max_depth: usize, span: Span) -> Self {
        Self::MaxRecursionDepth { max_depth, span }
    }

    pub fn internal_parser_error(message: &str) -> Self {
        Self::InternalParserError {
            message: message.to_string(),
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::NoViableAlternative { .. } => codes::syntax::NO_VIABLE_ALTERNATIVE,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
            Self::InternalParserError { .. } => codes::syntax::INTERNAL_PARSER_ERROR,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfInput { span, .. }
            | Self::NoViableAlternative { span, .. }
            | Self::MaxRecursionDepth { span, .. } => Some(*span),
            Self::InternalParserError { .. } => None,
        }
    }

    /// Text of the token the error was raised at
    pub fn offending_text(&self) -> Option<String> {
        match self {
            Self::UnexpectedToken { found, .. } => Some(found.clone()),
            Self::UnexpectedEndOfInput { .. } => Some("<EOF>".to_string()),
            Self::NoViableAlternative { input, .. } => Some(input.clone()),
            Self::MaxRecursionDepth { .. } | Self::InternalParserError { .. } => None,
        }
    }

    /// Internal failures abandon the whole parse
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InternalParserError { .. })
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }
}

impl From<TokenStreamError> for SyntaxError {
    fn from(error: TokenStreamError) -> Self {
        match error {
            TokenStreamError::UnexpectedToken {
                expected,
                found,
                span,
            } => Self::UnexpectedToken {
                expected,
                found,
                span,
            },
            TokenStreamError::UnexpectedEndOfStream { expected, span } => {
                Self::UnexpectedEndOfInput { expected, span }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_messages_follow_recognizer_wording() {
        let span = Span::dummy();
        let err = SyntaxError::unexpected_token("')'", &Token::Comma, span);
        assert_eq!(err.to_string(), "mismatched input ',' expecting ')'");
        assert_eq!(err.offending_text().as_deref(), Some(","));

        let err = SyntaxError::unexpected_token("')'", &Token::Eof, span);
        assert_eq!(err.to_string(), "missing ')' at '<EOF>'");
        assert_eq!(err.error_code(), codes::syntax::UNEXPECTED_END_OF_INPUT);

        let err = SyntaxError::no_viable_alternative(&Token::Multiply, span);
        assert_eq!(err.to_string(), "no viable alternative at input '*'");
    }

    #[test]
    fn test_from_token_stream_error() {
        let err: SyntaxError = TokenStreamError::UnexpectedEndOfStream {
            expected: "'}'".to_string(),
            span: Span::dummy(),
        }
        .into();
        assert_matches!(err, SyntaxError::UnexpectedEndOfInput { .. });
    }

    #[test]
    fn test_internal_error_has_no_span() {
        let err = SyntaxError::internal_parser_error("boom");
        assert!(err.span().is_none());
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Internal parser error: boom");
    }
}
