//! Core lexical analyzer
//!
//! Longest match wins; among equal-length matches a keyword beats an
//! identifier, so `int` is a keyword while `int1` is an identifier. The
//! lexer never fails: unmatched input becomes an error token reported to
//! the listener, and lexing continues.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::syntax::listener::ErrorListener;
use crate::tokens::{classify_operator_symbol, classify_word, SpannedToken, Token};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid character: '{character}' at line {line}, column {column}")]
    InvalidCharacter {
        character: char,
        line: u32,
        column: u32,
    },

    #[error("Unterminated string literal at line {line}, column {column}")]
    UnterminatedString { line: u32, column: u32 },

    #[error("Unterminated block comment at line {line}, column {column}")]
    UnterminatedComment { line: u32, column: u32 },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize },

    #[error("String too large: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize },

    #[error("Comment too long: {length} characters (max {MAX_COMMENT_LENGTH})")]
    CommentTooLong { length: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error("Source too large: {size} bytes (max {MAX_SOURCE_SIZE})")]
    SourceTooLarge { size: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            Self::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            Self::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            Self::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            Self::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            Self::CommentTooLong { .. } => codes::lexical::COMMENT_TOO_LONG,
            Self::TooManyTokens { .. } => codes::lexical::TOKEN_LIMIT_EXCEEDED,
            Self::SourceTooLarge { .. } => codes::lexical::SOURCE_TOO_LARGE,
        }
    }

    /// Limit breaches end tokenization; everything else is local to one lexeme
    pub fn is_limit_breach(&self) -> bool {
        !matches!(
            self,
            Self::InvalidCharacter { .. }
                | Self::UnterminatedString { .. }
                | Self::UnterminatedComment { .. }
        )
    }
}

#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub literal_tokens: usize,
    pub operator_tokens: usize,
    pub invalid_chars: usize,
    pub comment_count: usize,
    pub max_string_length: usize,
    pub max_comment_length: usize,
    pub terminal_counts: HashMap<&'static str, usize>,
    pub errors: Vec<LexerError>,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        match token {
            Token::Whitespace(_) => return,
            Token::LineComment(text) | Token::BlockComment(text) => {
                self.comment_count += 1;
                self.max_comment_length = self.max_comment_length.max(text.chars().count());
                if !preferences.count_comments {
                    return;
                }
            }
            Token::Keyword(_) => self.keyword_tokens += 1,
            Token::Identifier(_) => self.identifier_tokens += 1,
            Token::Integer(_) | Token::Real(_) => self.literal_tokens += 1,
            Token::StringLiteral(text) => {
                self.literal_tokens += 1;
                self.max_string_length = self.max_string_length.max(text.len());
            }
            Token::Error(_) => self.invalid_chars += 1,
            Token::Eof => return,
            _ => self.operator_tokens += 1,
        }

        self.total_tokens += 1;
        if preferences.collect_detailed_metrics {
            *self.terminal_counts.entry(token.terminal_name()).or_insert(0) += 1;
        }
    }
}

/// Character cursor with position tracking
struct Cursor<'a> {
    source: &'a str,
    pos: Position,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: Position::start(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos = self.pos.advance(ch);
        Some(ch)
    }

    fn bump_while<F: Fn(char) -> bool>(&mut self, pred: F) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
    }

    fn is_eof(&self) -> bool {
        self.pos.offset >= self.source.len()
    }

    fn text_from(&self, start: Position) -> &'a str {
        &self.source[start.offset..self.pos.offset]
    }
}

pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Tokenize the whole source; the result always ends with EOF
    pub fn tokenize(
        &mut self,
        source: &str,
        listener: &mut dyn ErrorListener,
    ) -> Vec<SpannedToken> {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "bytes" => source.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        let mut tokens = Vec::new();
        let mut cursor = Cursor::new(source);

        if source.len() > MAX_SOURCE_SIZE {
            let error = LexerError::SourceTooLarge { size: source.len() };
            self.report(&error, Position::start(), None, listener);
            cursor.pos = Position::start().advance_str(source);
            tokens.push(self.finish_token(
                Token::Error(String::new()),
                Span::new(Position::start(), cursor.pos),
            ));
        }

        while !cursor.is_eof() {
            if self.metrics.total_tokens >= MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens {
                    count: self.metrics.total_tokens,
                };
                let start = cursor.pos;
                self.report(&error, start, None, listener);
                cursor.pos = start.advance_str(cursor.rest());
                tokens.push(self.finish_token(
                    Token::Error(cursor.text_from(start).to_string()),
                    Span::new(start, cursor.pos),
                ));
                break;
            }

            let start = cursor.pos;
            match self.scan_token(&mut cursor) {
                Ok(token) => {
                    let span = Span::new(start, cursor.pos);
                    tokens.push(self.finish_token(token, span));
                }
                Err(error) if error.is_limit_breach() => {
                    self.report(&error, start, None, listener);
                    cursor.pos = start.advance_str(&source[start.offset..]);
                    tokens.push(self.finish_token(
                        Token::Error(cursor.text_from(start).to_string()),
                        Span::new(start, cursor.pos),
                    ));
                    break;
                }
                Err(error) => {
                    let text = cursor.text_from(start).to_string();
                    self.report(&error, start, Some(&text), listener);
                    tokens.push(self.finish_token(Token::Error(text), Span::new(start, cursor.pos)));
                }
            }
        }

        tokens.push(SpannedToken::new(Token::Eof, Span::point(cursor.pos)));

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Lexical analysis completed",
            "tokens" => self.metrics.total_tokens,
            "comments" => self.metrics.comment_count,
            "errors" => self.metrics.errors.len()
        );

        tokens
    }

    fn finish_token(&mut self, token: Token, span: Span) -> SpannedToken {
        self.metrics.record_token(&token, &self.preferences);
        SpannedToken::new(token, span)
    }

    /// Log the error and forward it to the listener
    fn report(
        &mut self,
        error: &LexerError,
        at: Position,
        text: Option<&str>,
        listener: &mut dyn ErrorListener,
    ) {
        log_error!(error.error_code(), &error.to_string(),
            span = Span::point(at),
            "line" => at.line,
            "column" => at.column
        );

        let notify = match error {
            LexerError::InvalidCharacter { .. } => self.preferences.report_invalid_characters,
            _ => true,
        };
        if notify {
            let message = match text {
                Some(text) => format!("token recognition error at: '{}'", escape_text(text)),
                None => error.to_string(),
            };
            listener.syntax_error(None, at.line, at.char_position_in_line(), &message);
        }

        self.metrics.errors.push(error.clone());
    }

    fn scan_token(&mut self, cursor: &mut Cursor<'_>) -> Result<Token, LexerError> {
        let start = cursor.pos;
        let Some(ch) = cursor.peek() else {
            return Ok(Token::Eof);
        };

        match ch {
            ' ' | '\t' | '\r' | '\n' => {
                cursor.bump_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                Ok(Token::Whitespace(cursor.text_from(start).to_string()))
            }
            '/' if cursor.peek_nth(1) == Some('/') => {
                cursor.bump_while(|c| c != '\r' && c != '\n');
                let text = cursor.text_from(start);
                check_comment_length(text)?;
                Ok(Token::LineComment(text.to_string()))
            }
            '/' if cursor.peek_nth(1) == Some('*') => self.scan_block_comment(cursor, start),
            '0'..='9' => Ok(self.scan_number(cursor, start)),
            '"' => self.scan_string(cursor, start),
            c if c.is_ascii_alphabetic() || c == '_' => {
                cursor.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let word = cursor.text_from(start);
                let length = word.chars().count();
                if length > MAX_IDENTIFIER_LENGTH {
                    return Err(LexerError::IdentifierTooLong { length });
                }
                Ok(classify_word(word))
            }
            _ => self.scan_operator(cursor, start, ch),
        }
    }

    fn scan_block_comment(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Result<Token, LexerError> {
        cursor.bump();
        cursor.bump();
        loop {
            match cursor.bump() {
                Some('*') if cursor.peek() == Some('/') => {
                    cursor.bump();
                    let text = cursor.text_from(start);
                    check_comment_length(text)?;
                    return Ok(Token::BlockComment(text.to_string()));
                }
                Some(_) => {}
                None => {
                    return Err(LexerError::UnterminatedComment {
                        line: start.line,
                        column: start.column,
                    })
                }
            }
        }
    }

    /// INTEGER is `[0-9]+`; REAL requires digits on both sides of the dot
    fn scan_number(&mut self, cursor: &mut Cursor<'_>, start: Position) -> Token {
        cursor.bump_while(|c| c.is_ascii_digit());
        let is_real = cursor.peek() == Some('.')
            && cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit());
        if is_real {
            cursor.bump();
            cursor.bump_while(|c| c.is_ascii_digit());
            Token::Real(cursor.text_from(start).to_string())
        } else {
            Token::Integer(cursor.text_from(start).to_string())
        }
    }

    /// Strings are single-line; a backslash escapes the next character
    fn scan_string(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Result<Token, LexerError> {
        cursor.bump();
        loop {
            match cursor.peek() {
                Some('"') => {
                    cursor.bump();
                    let text = cursor.text_from(start);
                    if text.len() > MAX_STRING_SIZE {
                        return Err(LexerError::StringTooLarge { size: text.len() });
                    }
                    return Ok(Token::StringLiteral(text.to_string()));
                }
                Some('\\') => {
                    cursor.bump();
                    if matches!(cursor.peek(), Some(c) if c != '\n' && c != '\r') {
                        cursor.bump();
                    }
                }
                Some('\n') | Some('\r') | None => {
                    return Err(LexerError::UnterminatedString {
                        line: start.line,
                        column: start.column,
                    })
                }
                Some(_) => {
                    cursor.bump();
                }
            }
        }
    }

    fn scan_operator(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
        ch: char,
    ) -> Result<Token, LexerError> {
        if let Some(next) = cursor.peek_nth(1) {
            let pair: String = [ch, next].iter().collect();
            if let Some(token) = classify_operator_symbol(&pair) {
                cursor.bump();
                cursor.bump();
                return Ok(token);
            }
        }

        cursor.bump();
        match classify_operator_symbol(cursor.text_from(start)) {
            Some(token) => Ok(token),
            None => Err(LexerError::InvalidCharacter {
                character: ch,
                line: start.line,
                column: start.column,
            }),
        }
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn check_comment_length(text: &str) -> Result<(), LexerError> {
    let length = text.chars().count();
    if length > MAX_COMMENT_LENGTH {
        return Err(LexerError::CommentTooLong { length });
    }
    Ok(())
}

/// Render control characters visibly in recognition errors
fn escape_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' => "\\n".to_string(),
            '\r' => "\\r".to_string(),
            '\t' => "\\t".to_string(),
            c => c.to_string(),
        })
        .collect()
}
