//! Terminal symbols of the EVAL grammar
use crate::grammar::keywords::Keyword;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Any of the 24 reserved words
    Keyword(Keyword),

    // Arithmetic operators
    Plus,     // +
    Minus,    // -
    Multiply, // *
    Divide,   // /
    Modulus,  // %

    // Compound assignment
    PlusAssign,     // +=
    MinusAssign,    // -=
    MultiplyAssign, // *=
    DivideAssign,   // /=

    // Comparison operators
    Equals,             // ==
    NotEquals,          // !=
    LessThan,           // <
    GreaterThan,        // >
    LessThanOrEqual,    // <=
    GreaterThanOrEqual, // >=

    Assign, // =

    // Delimiters
    LeftBrace,  // {
    RightBrace, // }
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,

    // Literals keep their source text; INTEGER and REAL are distinct terminals
    Real(String),
    Integer(String),
    /// String literal including its quotes
    StringLiteral(String),

    Identifier(String),

    // Hidden channel
    Whitespace(String),
    LineComment(String),
    BlockComment(String),

    /// Unrecognized input, kept so the stream stays total
    Error(String),
    Eof,
}

/// Coarse token classes used by the parser's lookahead switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Operator,
    Delimiter,
    Literal,
    Identifier,
    Trivia,
    Error,
    Eof,
}

impl Token {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(kw) if *kw == keyword)
    }

    pub fn as_keyword(&self) -> Option<Keyword> {
        match self {
            Self::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Whitespace and comments never reach the parser
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Self::Whitespace(_) | Self::LineComment(_) | Self::BlockComment(_)
        )
    }

    /// Tokens the parser sees; error tokens are reported by the lexer and skipped
    pub fn is_significant(&self) -> bool {
        !self.is_trivia() && !matches!(self, Self::Error(_))
    }

    pub fn is_assign_op(&self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::PlusAssign
                | Self::MinusAssign
                | Self::MultiplyAssign
                | Self::DivideAssign
        )
    }

    pub fn class(&self) -> TokenClass {
        match self {
            Self::Keyword(_) => TokenClass::Keyword,
            Self::Plus
            | Self::Minus
            | Self::Multiply
            | Self::Divide
            | Self::Modulus
            | Self::PlusAssign
            | Self::MinusAssign
            | Self::MultiplyAssign
            | Self::DivideAssign
            | Self::Equals
            | Self::NotEquals
            | Self::LessThan
            | Self::GreaterThan
            | Self::LessThanOrEqual
            | Self::GreaterThanOrEqual
            | Self::Assign => TokenClass::Operator,
            Self::LeftBrace
            | Self::RightBrace
            | Self::LeftParen
            | Self::RightParen
            | Self::Comma => TokenClass::Delimiter,
            Self::Real(_) | Self::Integer(_) | Self::StringLiteral(_) => TokenClass::Literal,
            Self::Identifier(_) => TokenClass::Identifier,
            Self::Whitespace(_) | Self::LineComment(_) | Self::BlockComment(_) => {
                TokenClass::Trivia
            }
            Self::Error(_) => TokenClass::Error,
            Self::Eof => TokenClass::Eof,
        }
    }

    /// Symbolic terminal name (`INTEGER`, `LPAREN`, ...)
    pub fn terminal_name(&self) -> &'static str {
        match self {
            Self::Keyword(kw) => kw.terminal_name(),
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Multiply => "MULTI",
            Self::Divide => "DIVIDE",
            Self::Modulus => "MODULUS",
            Self::PlusAssign => "PLUS_ASSIGN",
            Self::MinusAssign => "MINUS_ASSIGN",
            Self::MultiplyAssign => "MULTI_ASSIGN",
            Self::DivideAssign => "DIV_ASSIGN",
            Self::Equals => "EQ",
            Self::NotEquals => "NEQ",
            Self::LessThan => "LT",
            Self::GreaterThan => "GT",
            Self::LessThanOrEqual => "LTE",
            Self::GreaterThanOrEqual => "GTE",
            Self::Assign => "ASSIGN",
            Self::LeftBrace => "LBRACE",
            Self::RightBrace => "RBRACE",
            Self::LeftParen => "LPAREN",
            Self::RightParen => "RPAREN",
            Self::Comma => "COMMA",
            Self::Real(_) => "REAL",
            Self::Integer(_) => "INTEGER",
            Self::StringLiteral(_) => "STRING",
            Self::Identifier(_) => "IDENTIFIER",
            Self::Whitespace(_) => "WS",
            Self::LineComment(_) => "LINE_COMMENT",
            Self::BlockComment(_) => "BLOCK_COMMENT",
            Self::Error(_) => "ERROR",
            Self::Eof => "EOF",
        }
    }

    /// Fixed spelling of a punctuation or keyword terminal
    pub fn fixed_text(&self) -> Option<&'static str> {
        let text = match self {
            Self::Keyword(kw) => kw.as_str(),
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulus => "%",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::MultiplyAssign => "*=",
            Self::DivideAssign => "/=",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThanOrEqual => ">=",
            Self::Assign => "=",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            _ => return None,
        };
        Some(text)
    }

    /// Source text of the token; `<EOF>` for end of input
    pub fn text(&self) -> String {
        if let Some(fixed) = self.fixed_text() {
            return fixed.to_string();
        }
        match self {
            Self::Real(s)
            | Self::Integer(s)
            | Self::StringLiteral(s)
            | Self::Identifier(s)
            | Self::Whitespace(s)
            | Self::LineComment(s)
            | Self::BlockComment(s)
            | Self::Error(s) => s.clone(),
            _ => "<EOF>".to_string(),
        }
    }

    /// Name used in "expecting ..." messages: quoted literal or terminal name
    pub fn display_name(&self) -> String {
        match self.fixed_text() {
            Some(fixed) => format!("'{}'", fixed),
            None => self.terminal_name().to_string(),
        }
    }
}

/// Classify a word: reserved keyword or identifier
pub fn classify_word(word: &str) -> Token {
    match Keyword::from_str(word) {
        Some(kw) => Token::Keyword(kw),
        None => Token::Identifier(word.to_string()),
    }
}

/// Classify a one- or two-character operator symbol
pub fn classify_operator_symbol(symbol: &str) -> Option<Token> {
    let token = match symbol {
        "+" => Token::Plus,
        "-" => Token::Minus,
        "*" => Token::Multiply,
        "/" => Token::Divide,
        "%" => Token::Modulus,
        "+=" => Token::PlusAssign,
        "-=" => Token::MinusAssign,
        "*=" => Token::MultiplyAssign,
        "/=" => Token::DivideAssign,
        "==" => Token::Equals,
        "!=" => Token::NotEquals,
        "<" => Token::LessThan,
        ">" => Token::GreaterThan,
        "<=" => Token::LessThanOrEqual,
        ">=" => Token::GreaterThanOrEqual,
        "=" => Token::Assign,
        "{" => Token::LeftBrace,
        "}" => Token::RightBrace,
        "(" => Token::LeftParen,
        ")" => Token::RightParen,
        "," => Token::Comma,
        _ => return None,
    };
    Some(token)
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_word() {
        assert_eq!(classify_word("int"), Token::Keyword(Keyword::Int));
        assert_eq!(classify_word("int1"), Token::Identifier("int1".to_string()));
    }

    #[test]
    fn test_operator_classification() {
        assert_eq!(classify_operator_symbol("+="), Some(Token::PlusAssign));
        assert_eq!(classify_operator_symbol("=="), Some(Token::Equals));
        assert_eq!(classify_operator_symbol("!"), None);
        assert!(Token::DivideAssign.is_assign_op());
        assert_eq!(Token::Plus.class(), TokenClass::Operator);
    }

    #[test]
    fn test_text_and_display_names() {
        assert_eq!(Token::Keyword(Keyword::Pi).text(), "PI");
        assert_eq!(Token::Real("2.5".into()).text(), "2.5");
        assert_eq!(Token::Eof.text(), "<EOF>");
        assert_eq!(Token::RightParen.display_name(), "')'");
        assert_eq!(Token::Identifier("x".into()).display_name(), "IDENTIFIER");
    }

    #[test]
    fn test_trivia() {
        assert!(Token::LineComment("// x".into()).is_trivia());
        assert!(!Token::Error("@".into()).is_trivia());
        assert!(!Token::Error("@".into()).is_significant());
        assert!(Token::Eof.is_significant());
    }
}
