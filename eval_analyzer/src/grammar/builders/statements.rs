//! Statement and block builders
//!
//! program   := statement* EOF
//! statement := varDecl | constDecl | assignment | printStmt | ifStmt
//!            | whileStmt | tryStmt | block

use super::expressions::{parse_expression, parse_type};
use super::{expect_identifier, no_viable_alternative, unexpected, Parser};
use crate::grammar::ast::nodes::*;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::SyntaxResult;
use crate::tokens::Token;

const ASSIGN_OPS: &str = "{'=', '+=', '-=', '*=', '/='}";

/// True when the current token can begin a statement
pub fn at_statement_start(parser: &dyn Parser) -> bool {
    match &parser.current().value {
        Token::Keyword(kw) => {
            kw.is_type()
                || matches!(
                    kw,
                    Keyword::Const | Keyword::Print | Keyword::If | Keyword::While | Keyword::Try
                )
        }
        Token::Identifier(_) => parser.peek(1).is_assign_op(),
        Token::LeftBrace => true,
        _ => false,
    }
}

/// Parse a whole program; errors are reported and recovered from, never returned
pub fn parse_program(parser: &mut dyn Parser) -> Program {
    let start = parser.save_position();
    let statements = parse_statement_list(parser, false);
    Program {
        statements,
        span: parser.span_from(start),
    }
}

/// Statements up to EOF, or up to `}` when inside a block
fn parse_statement_list(parser: &mut dyn Parser, in_block: bool) -> Vec<Statement> {
    let mut statements = Vec::new();

    loop {
        match parser.current().value {
            Token::Eof => break,
            Token::RightBrace if in_block => break,
            _ => {}
        }

        let before = parser.save_position();
        match parse_statement(parser) {
            Ok(statement) => statements.push(statement),
            Err(error) => {
                parser.report_error(&error);
                parser.recover(in_block);
                // Always make progress
                if parser.save_position() == before {
                    parser.advance();
                }
            }
        }
    }

    statements
}

pub fn parse_statement(parser: &mut dyn Parser) -> SyntaxResult<Statement> {
    parser.enter_rule("statement")?;
    let result = parse_statement_alternatives(parser);
    parser.exit_rule();
    result
}

fn parse_statement_alternatives(parser: &mut dyn Parser) -> SyntaxResult<Statement> {
    let current = parser.current().value.clone();
    match current {
        Token::Keyword(kw) if kw.is_type() => {
            parse_variable_declaration(parser).map(Statement::VariableDeclaration)
        }
        Token::Keyword(Keyword::Const) => {
            parse_const_declaration(parser).map(Statement::ConstDeclaration)
        }
        Token::Identifier(_) => parse_assignment(parser).map(Statement::Assignment),
        Token::Keyword(Keyword::Print) => parse_print_statement(parser).map(Statement::Print),
        Token::Keyword(Keyword::If) => parse_if_statement(parser).map(Statement::If),
        Token::Keyword(Keyword::While) => parse_while_statement(parser).map(Statement::While),
        Token::Keyword(Keyword::Try) => parse_try_statement(parser).map(Statement::Try),
        Token::LeftBrace => parse_block(parser).map(Statement::Block),
        _ => Err(no_viable_alternative(parser)),
    }
}

/// varDecl := type IDENT '=' expression
pub fn parse_variable_declaration(parser: &mut dyn Parser) -> SyntaxResult<VariableDeclaration> {
    let start = parser.save_position();
    let var_type = parse_type(parser)?;
    let name = expect_identifier(parser)?;
    parser.expect(&Token::Assign)?;
    let value = parse_expression(parser)?;

    Ok(VariableDeclaration {
        var_type,
        name,
        value,
        span: parser.span_from(start),
    })
}

/// constDecl := 'const' varDecl
pub fn parse_const_declaration(parser: &mut dyn Parser) -> SyntaxResult<ConstDeclaration> {
    let start = parser.save_position();
    parser.expect(&Token::Keyword(Keyword::Const))?;
    let declaration = parse_variable_declaration(parser)?;

    Ok(ConstDeclaration {
        declaration,
        span: parser.span_from(start),
    })
}

/// assignment := IDENT assignOp expression
pub fn parse_assignment(parser: &mut dyn Parser) -> SyntaxResult<Assignment> {
    let start = parser.save_position();
    let target = expect_identifier(parser)?;

    let Some(op) = AssignOp::from_token(&parser.current().value) else {
        return Err(unexpected(parser, ASSIGN_OPS));
    };
    parser.advance();
    let value = parse_expression(parser)?;

    Ok(Assignment {
        target,
        op,
        value,
        span: parser.span_from(start),
    })
}

/// printStmt := 'print' '(' printArg (',' printArg)* ')'
pub fn parse_print_statement(parser: &mut dyn Parser) -> SyntaxResult<PrintStatement> {
    let start = parser.save_position();
    parser.expect(&Token::Keyword(Keyword::Print))?;
    parser.expect(&Token::LeftParen)?;

    let mut args = vec![parse_print_arg(parser)?];
    while parser.check(&Token::Comma) {
        parser.advance();
        args.push(parse_print_arg(parser)?);
    }
    parser.expect(&Token::RightParen)?;

    Ok(PrintStatement {
        args,
        span: parser.span_from(start),
    })
}

/// printArg := STRING | expression
fn parse_print_arg(parser: &mut dyn Parser) -> SyntaxResult<PrintArg> {
    let lone_string = matches!(parser.current().value, Token::StringLiteral(_))
        && matches!(parser.peek(1), Token::Comma | Token::RightParen);

    if lone_string {
        parser.report_print_string_ambiguity();
        let token = parser.advance();
        return Ok(PrintArg::String {
            text: token.value.text(),
            span: token.span,
        });
    }

    parse_expression(parser).map(PrintArg::Expression)
}

/// '(' expression ')'
fn parse_condition(parser: &mut dyn Parser) -> SyntaxResult<Expression> {
    parser.expect(&Token::LeftParen)?;
    let condition = parse_expression(parser)?;
    parser.expect(&Token::RightParen)?;
    Ok(condition)
}

/// ifStmt := 'if' '(' expr ')' block ('else' 'if' '(' expr ')' block)* ('else' block)?
pub fn parse_if_statement(parser: &mut dyn Parser) -> SyntaxResult<IfStatement> {
    let start = parser.save_position();
    parser.expect(&Token::Keyword(Keyword::If))?;
    let condition = parse_condition(parser)?;
    let then_block = parse_block(parser)?;

    let mut else_ifs = Vec::new();
    let mut else_block = None;

    while parser.check(&Token::Keyword(Keyword::Else)) {
        let arm_start = parser.save_position();
        parser.advance();

        if parser.check(&Token::Keyword(Keyword::If)) {
            parser.advance();
            let condition = parse_condition(parser)?;
            let body = parse_block(parser)?;
            else_ifs.push(ElseIf {
                condition,
                body,
                span: parser.span_from(arm_start),
            });
        } else {
            else_block = Some(parse_block(parser)?);
            break;
        }
    }

    Ok(IfStatement {
        condition,
        then_block,
        else_ifs,
        else_block,
        span: parser.span_from(start),
    })
}

/// whileStmt := 'while' '(' expr ')' block
pub fn parse_while_statement(parser: &mut dyn Parser) -> SyntaxResult<WhileStatement> {
    let start = parser.save_position();
    parser.expect(&Token::Keyword(Keyword::While))?;
    let condition = parse_condition(parser)?;
    let body = parse_block(parser)?;

    Ok(WhileStatement {
        condition,
        body,
        span: parser.span_from(start),
    })
}

/// tryStmt := 'try' block 'catch' ('(' IDENT ')')? block
pub fn parse_try_statement(parser: &mut dyn Parser) -> SyntaxResult<TryStatement> {
    let start = parser.save_position();
    parser.expect(&Token::Keyword(Keyword::Try))?;
    let body = parse_block(parser)?;
    parser.expect(&Token::Keyword(Keyword::Catch))?;

    let catch_binding = if parser.check(&Token::LeftParen) {
        parser.advance();
        let name = expect_identifier(parser)?;
        parser.expect(&Token::RightParen)?;
        Some(name)
    } else {
        None
    };

    let handler = parse_block(parser)?;

    Ok(TryStatement {
        body,
        catch_binding,
        handler,
        span: parser.span_from(start),
    })
}

/// block := '{' statement* '}'
///
/// A missing `}` is reported and the block is kept, so an unclosed block
/// still contributes its statements to the tree.
pub fn parse_block(parser: &mut dyn Parser) -> SyntaxResult<Block> {
    parser.enter_rule("block")?;
    let start = parser.save_position();

    let result = match parser.expect(&Token::LeftBrace) {
        Ok(_) => {
            let statements = parse_statement_list(parser, true);
            if let Err(error) = parser.expect(&Token::RightBrace) {
                parser.report_error(&error);
            }
            Ok(Block {
                statements,
                span: parser.span_from(start),
            })
        }
        Err(error) => Err(error),
    };

    parser.exit_rule();
    result
}
