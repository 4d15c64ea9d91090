//! Expression builders using precedence climbing
//!
//! Binary levels, loosest first: equality, relational, additive,
//! multiplicative. All levels are left-associative. Unary minus binds tighter
//! than any binary operator and parentheses reset precedence.

use super::{no_viable_alternative, unexpected, Parser};
use crate::grammar::ast::nodes::*;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::SyntaxResult;
use crate::tokens::Token;

const TYPE_NAMES: &str = "{'int', 'float', 'string', 'bool'}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryLevel {
    Equality,
    Relational,
    Additive,
    Multiplicative,
}

impl BinaryLevel {
    fn of(token: &Token) -> Option<Self> {
        match token {
            Token::Equals | Token::NotEquals => Some(Self::Equality),
            Token::LessThan
            | Token::GreaterThan
            | Token::LessThanOrEqual
            | Token::GreaterThanOrEqual => Some(Self::Relational),
            Token::Plus | Token::Minus => Some(Self::Additive),
            Token::Multiply | Token::Divide | Token::Modulus => Some(Self::Multiplicative),
            _ => None,
        }
    }

    /// Higher binds tighter
    fn precedence(self) -> u8 {
        match self {
            Self::Equality => 1,
            Self::Relational => 2,
            Self::Additive => 3,
            Self::Multiplicative => 4,
        }
    }

    fn build(self, node: BinaryExpression) -> Expression {
        match self {
            Self::Equality => Expression::Equality(node),
            Self::Relational => Expression::Relational(node),
            Self::Additive => Expression::Additive(node),
            Self::Multiplicative => Expression::Multiplicative(node),
        }
    }
}

pub fn parse_expression(parser: &mut dyn Parser) -> SyntaxResult<Expression> {
    parse_binary(parser, 0)
}

fn parse_binary(parser: &mut dyn Parser, min_precedence: u8) -> SyntaxResult<Expression> {
    parser.enter_rule("expression")?;
    let result = climb(parser, min_precedence);
    parser.exit_rule();
    result
}

fn climb(parser: &mut dyn Parser, min_precedence: u8) -> SyntaxResult<Expression> {
    let start = parser.save_position();
    let mut left = parse_unary(parser)?;

    while let Some(level) = BinaryLevel::of(&parser.current().value) {
        if level.precedence() < min_precedence {
            break;
        }
        let operator = parser.advance();
        let right = parse_binary(parser, level.precedence() + 1)?;

        left = level.build(BinaryExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            span: parser.span_from(start),
        });
    }

    Ok(left)
}

/// unary := '-' unary | primary
fn parse_unary(parser: &mut dyn Parser) -> SyntaxResult<Expression> {
    if !parser.check(&Token::Minus) {
        return parse_primary(parser);
    }

    parser.enter_rule("unary")?;
    let start = parser.save_position();
    parser.advance();
    let result = match parse_unary(parser) {
        Ok(operand) => Ok(Expression::UnaryMinus {
            operand: Box::new(operand),
            span: parser.span_from(start),
        }),
        Err(error) => Err(error),
    };
    parser.exit_rule();
    result
}

fn parse_primary(parser: &mut dyn Parser) -> SyntaxResult<Expression> {
    let current = parser.current().clone();

    match current.value {
        Token::LeftParen => {
            let start = parser.save_position();
            parser.advance();
            let inner = parse_expression(parser)?;
            parser.expect(&Token::RightParen)?;
            Ok(Expression::Paren {
                inner: Box::new(inner),
                span: parser.span_from(start),
            })
        }
        Token::Keyword(Keyword::Cast) => parse_cast_call(parser).map(Expression::Cast),
        Token::Keyword(Keyword::Pow) => {
            let start = parser.save_position();
            let (base, exponent) = parse_binary_call(parser, Keyword::Pow)?;
            Ok(Expression::Pow(PowCall {
                base,
                exponent,
                span: parser.span_from(start),
            }))
        }
        Token::Keyword(Keyword::Min) => {
            let start = parser.save_position();
            let (left, right) = parse_binary_call(parser, Keyword::Min)?;
            Ok(Expression::Min(MinCall {
                left,
                right,
                span: parser.span_from(start),
            }))
        }
        Token::Keyword(Keyword::Max) => {
            let start = parser.save_position();
            let (left, right) = parse_binary_call(parser, Keyword::Max)?;
            Ok(Expression::Max(MaxCall {
                left,
                right,
                span: parser.span_from(start),
            }))
        }
        Token::Keyword(Keyword::Sqrt) => {
            let start = parser.save_position();
            let value = parse_unary_call(parser, Keyword::Sqrt)?;
            Ok(Expression::Sqrt(SqrtCall {
                value,
                span: parser.span_from(start),
            }))
        }
        Token::Keyword(Keyword::Round) => {
            let start = parser.save_position();
            let value = parse_unary_call(parser, Keyword::Round)?;
            Ok(Expression::Round(RoundCall {
                value,
                span: parser.span_from(start),
            }))
        }
        Token::Keyword(Keyword::Abs) => {
            let start = parser.save_position();
            let value = parse_unary_call(parser, Keyword::Abs)?;
            Ok(Expression::Abs(AbsCall {
                value,
                span: parser.span_from(start),
            }))
        }
        Token::Keyword(kw) if kw.is_macro() => {
            parser.advance();
            match MacroKind::from_keyword(kw) {
                Some(kind) => Ok(Expression::Macro(MacroValue {
                    kind,
                    span: current.span,
                })),
                None => Err(no_viable_alternative(parser)),
            }
        }
        Token::Keyword(Keyword::True) => {
            parser.advance();
            Ok(Expression::TrueLiteral { span: current.span })
        }
        Token::Keyword(Keyword::False) => {
            parser.advance();
            Ok(Expression::FalseLiteral { span: current.span })
        }
        Token::Identifier(name) => {
            parser.advance();
            Ok(Expression::Ident {
                name,
                span: current.span,
            })
        }
        Token::Integer(text) => {
            parser.advance();
            Ok(Expression::IntLiteral {
                text,
                span: current.span,
            })
        }
        Token::Real(text) => {
            parser.advance();
            Ok(Expression::RealLiteral {
                text,
                span: current.span,
            })
        }
        Token::StringLiteral(text) => {
            parser.advance();
            Ok(Expression::StringLiteral {
                text,
                span: current.span,
            })
        }
        _ => Err(no_viable_alternative(parser)),
    }
}

/// type := 'int' | 'float' | 'string' | 'bool'
pub fn parse_type(parser: &mut dyn Parser) -> SyntaxResult<Type> {
    let parsed = parser.current().value.as_keyword().and_then(Type::from_keyword);
    match parsed {
        Some(ty) => {
            parser.advance();
            Ok(ty)
        }
        None => Err(unexpected(parser, TYPE_NAMES)),
    }
}

/// 'cast' '(' expression ',' type ')'
fn parse_cast_call(parser: &mut dyn Parser) -> SyntaxResult<CastCall> {
    let start = parser.save_position();
    parser.expect(&Token::Keyword(Keyword::Cast))?;
    parser.expect(&Token::LeftParen)?;
    let value = parse_expression(parser)?;
    parser.expect(&Token::Comma)?;
    let target = parse_type(parser)?;
    parser.expect(&Token::RightParen)?;

    Ok(CastCall {
        value: Box::new(value),
        target,
        span: parser.span_from(start),
    })
}

/// keyword '(' expression ')'
fn parse_unary_call(parser: &mut dyn Parser, keyword: Keyword) -> SyntaxResult<Box<Expression>> {
    parser.expect(&Token::Keyword(keyword))?;
    parser.expect(&Token::LeftParen)?;
    let value = parse_expression(parser)?;
    parser.expect(&Token::RightParen)?;
    Ok(Box::new(value))
}

/// keyword '(' expression ',' expression ')'
fn parse_binary_call(
    parser: &mut dyn Parser,
    keyword: Keyword,
) -> SyntaxResult<(Box<Expression>, Box<Expression>)> {
    parser.expect(&Token::Keyword(keyword))?;
    parser.expect(&Token::LeftParen)?;
    let first = parse_expression(parser)?;
    parser.expect(&Token::Comma)?;
    let second = parse_expression(parser)?;
    parser.expect(&Token::RightParen)?;
    Ok((Box::new(first), Box::new(second)))
}
