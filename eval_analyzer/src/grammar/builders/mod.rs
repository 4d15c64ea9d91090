//! Builder functions for EVAL grammar productions
//!
//! Builders are written against the [`Parser`] trait so they only see token
//! navigation, rule bookkeeping and error reporting; the concrete parser in
//! `crate::syntax` owns the token stream and the listener.

pub mod expressions;
pub mod statements;

pub use expressions::{parse_expression, parse_type};
pub use statements::{parse_block, parse_program, parse_statement};

use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{SpannedToken, Token};
use crate::utils::Span;

/// Parser surface the builders expect
pub trait Parser {
    // === BASIC NAVIGATION ===
    fn current(&self) -> &SpannedToken;
    fn peek(&self, n: usize) -> &Token;
    /// Consume the current token and return it
    fn advance(&mut self) -> SpannedToken;
    fn check(&self, expected: &Token) -> bool;
    fn expect(&mut self, expected: &Token) -> SyntaxResult<SpannedToken>;

    // === POSITIONS ===
    fn save_position(&self) -> usize;
    /// Span from a saved position to the last consumed token
    fn span_from(&self, start: usize) -> Span;

    // === RULE BOOKKEEPING ===
    /// Enter a grammar rule; fails once the nesting limit is reached
    fn enter_rule(&mut self, rule: &'static str) -> SyntaxResult<()>;
    fn exit_rule(&mut self);

    // === ERROR REPORTING ===
    fn report_error(&mut self, error: &SyntaxError);
    /// Skip to the next statement start, or `}` when inside a block
    fn recover(&mut self, in_block: bool);
    /// A lone string argument matches both `STRING` and `expression`
    fn report_print_string_ambiguity(&mut self);
}

/// Error for the current token when `expected` was required
pub fn unexpected(parser: &dyn Parser, expected: &str) -> SyntaxError {
    let current = parser.current();
    SyntaxError::unexpected_token(expected, &current.value, current.span)
}

/// Error for a token that starts no alternative of the current rule
pub fn no_viable_alternative(parser: &dyn Parser) -> SyntaxError {
    let current = parser.current();
    SyntaxError::no_viable_alternative(&current.value, current.span)
}

/// Expect an identifier and return its name
pub fn expect_identifier(parser: &mut dyn Parser) -> SyntaxResult<String> {
    let token = parser.expect(&Token::Identifier(String::new()))?;
    Ok(token.value.as_identifier().unwrap_or_default().to_string())
}
