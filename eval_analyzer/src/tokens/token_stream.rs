//! Filtered token stream for the parser
//!
//! Keeps every lexed token (hidden channel included) so token indices match
//! the lexer's output, while navigation only visits significant tokens.

use crate::tokens::token::Token;
use crate::utils::{Position, Span, Spanned};
use thiserror::Error;

pub type SpannedToken = Spanned<Token>;

#[derive(Debug, Clone)]
pub struct TokenStream {
    /// All tokens with original spans
    all_tokens: Vec<SpannedToken>,
    /// Indices into all_tokens for significant tokens
    significant_indices: Vec<usize>,
    /// Current position in significant_indices
    position: usize,
}

impl TokenStream {
    /// Build a stream; an EOF token is appended when the input lacks one
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        if !matches!(tokens.last().map(|t| &t.value), Some(Token::Eof)) {
            let end = tokens
                .last()
                .map(|t| t.span.end)
                .unwrap_or_else(Position::start);
            tokens.push(SpannedToken::new(Token::Eof, Span::point(end)));
        }

        let significant_indices = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.value.is_significant())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        crate::log_debug!("Token stream built",
            "total_tokens" => tokens.len(),
            "significant_tokens" => significant_indices.len()
        );

        Self {
            all_tokens: tokens,
            significant_indices,
            position: 0,
        }
    }

    // === NAVIGATION ===

    /// Current significant token; sticks at EOF once reached
    pub fn current(&self) -> &SpannedToken {
        self.peek_ahead(0)
    }

    pub fn current_token(&self) -> &Token {
        &self.current().value
    }

    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Peek n significant tokens ahead; past the end this yields EOF
    pub fn peek_ahead(&self, n: usize) -> &SpannedToken {
        let last = self.significant_indices.len() - 1;
        let idx = self.significant_indices[(self.position + n).min(last)];
        &self.all_tokens[idx]
    }

    pub fn advance(&mut self) -> &SpannedToken {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.current()
    }

    /// True once the current token is EOF
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    /// Number of significant tokens, EOF included
    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Index of the current token within the full token list
    pub fn current_index(&self) -> usize {
        self.index_of(self.position)
    }

    /// Full-list index of the token `n` significant tokens ahead
    pub fn index_ahead(&self, n: usize) -> usize {
        self.index_of(self.position + n)
    }

    fn index_of(&self, position: usize) -> usize {
        let last = self.significant_indices.len() - 1;
        self.significant_indices[position.min(last)]
    }

    /// Token at a full-list index
    pub fn token_at_index(&self, index: usize) -> Option<&SpannedToken> {
        self.all_tokens.get(index)
    }

    /// Span of the significant token at `position`
    pub fn span_at_position(&self, position: usize) -> Option<Span> {
        self.significant_indices
            .get(position)
            .and_then(|&i| self.all_tokens.get(i))
            .map(|t| t.span)
    }

    /// Span from a saved position up to the last consumed token
    pub fn span_from(&self, start_position: usize) -> Span {
        let start = self.span_at_position(start_position);
        let end = self
            .position
            .checked_sub(1)
            .filter(|&p| p >= start_position)
            .and_then(|p| self.span_at_position(p));

        match (start, end) {
            (Some(start), Some(end)) => start.merge(end),
            (Some(start), None) => Span::point(start.start),
            _ => Span::point(self.current_span().start),
        }
    }

    // === PARSER INTEGRATION ===

    /// Compare token kinds, ignoring literal payloads
    pub fn check(&self, expected: &Token) -> bool {
        same_kind(self.current_token(), expected)
    }

    pub fn advance_if_matches(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the expected token kind or report what was found instead
    pub fn expect_token(&mut self, expected: &Token) -> Result<SpannedToken, TokenStreamError> {
        let current = self.current().clone();
        if same_kind(&current.value, expected) {
            self.advance();
            return Ok(current);
        }

        if matches!(current.value, Token::Eof) {
            Err(TokenStreamError::UnexpectedEndOfStream {
                expected: expected.display_name(),
                span: current.span,
            })
        } else {
            Err(TokenStreamError::UnexpectedToken {
                expected: expected.display_name(),
                found: current.value.text(),
                span: current.span,
            })
        }
    }

    // === CHECKPOINTS ===

    pub fn save_position(&self) -> usize {
        self.position
    }

    pub fn restore_position(&mut self, saved_position: usize) {
        self.position = saved_position.min(self.significant_indices.len() - 1);
    }

    // === ITERATION ===

    pub fn iter_significant(&self) -> impl Iterator<Item = &SpannedToken> {
        self.significant_indices
            .iter()
            .map(|&i| &self.all_tokens[i])
    }

    pub fn all_tokens(&self) -> &[SpannedToken] {
        &self.all_tokens
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining_count(&self) -> usize {
        self.significant_indices.len().saturating_sub(self.position)
    }

    /// Short description of the stream state for debug logging
    pub fn diagnostic(&self) -> String {
        format!(
            "TokenStream(pos: {}/{}, current: '{}' at {})",
            self.position,
            self.significant_indices.len(),
            self.current_token().text(),
            self.current_span()
        )
    }
}

fn same_kind(a: &Token, b: &Token) -> bool {
    match (a, b) {
        (Token::Keyword(x), Token::Keyword(y)) => x == y,
        _ => std::mem::discriminant(a) == std::mem::discriminant(b),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenStreamError {
    #[error("mismatched input '{found}' expecting {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("missing {expected} at '<EOF>'")]
    UnexpectedEndOfStream { expected: String, span: Span },
}

impl TokenStreamError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } | Self::UnexpectedEndOfStream { span, .. } => *span,
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::UnexpectedToken { .. } => crate::logging::codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfStream { .. } => {
                crate::logging::codes::syntax::UNEXPECTED_END_OF_INPUT
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::keywords::Keyword;
    use assert_matches::assert_matches;

    fn spanned(token: Token, offset: usize) -> SpannedToken {
        let start = Position::new(offset, 1, offset as u32 + 1);
        let end = Position::new(offset + 1, 1, offset as u32 + 2);
        SpannedToken::new(token, Span::new(start, end))
    }

    fn sample() -> TokenStream {
        TokenStream::new(vec![
            spanned(Token::Keyword(Keyword::Int), 0),
            spanned(Token::Whitespace(" ".into()), 1),
            spanned(Token::Identifier("x".into()), 2),
            spanned(Token::LineComment("//c".into()), 3),
            spanned(Token::Assign, 4),
        ])
    }

    #[test]
    fn test_trivia_is_skipped_and_eof_appended() {
        let mut stream = sample();
        assert_eq!(stream.len(), 4);
        assert!(stream.current_token().is_keyword(Keyword::Int));
        stream.advance();
        assert_eq!(stream.current_index(), 2);
        stream.advance();
        stream.advance();
        assert!(stream.is_at_end());
        stream.advance();
        assert!(stream.is_at_end());
    }

    #[test]
    fn test_expect_token_reports_mismatch() {
        let mut stream = sample();
        assert!(stream.expect_token(&Token::Keyword(Keyword::Int)).is_ok());

        let err = stream.expect_token(&Token::Assign).unwrap_err();
        assert_matches!(err, TokenStreamError::UnexpectedToken { ref found, .. } if found == "x");
        assert_eq!(err.to_string(), "mismatched input 'x' expecting '='");
    }

    #[test]
    fn test_expect_at_end_of_stream() {
        let mut stream = TokenStream::new(Vec::new());
        let err = stream.expect_token(&Token::RightParen).unwrap_err();
        assert_matches!(err, TokenStreamError::UnexpectedEndOfStream { .. });
        assert_eq!(err.to_string(), "missing ')' at '<EOF>'");
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut stream = sample();
        let checkpoint = stream.save_position();
        stream.advance();
        stream.advance();
        stream.restore_position(checkpoint);
        assert!(stream.current_token().is_keyword(Keyword::Int));
    }

    #[test]
    fn test_identifier_kind_ignores_payload() {
        let mut stream = sample();
        stream.advance();
        assert!(stream.check(&Token::Identifier(String::new())));
        assert!(!stream.check(&Token::Keyword(Keyword::Float)));
    }
}
