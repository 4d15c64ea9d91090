//! Recursive-descent parser with listener-based error reporting
//!
//! The parser never fails: every syntax error goes to the [`ErrorListener`],
//! the parser resynchronises at the next statement start and keeps going.

use crate::config::compile_time::syntax::*;
use crate::config::runtime::ParserPreferences;
use crate::grammar::ast::nodes::Program;
use crate::grammar::builders::{self, statements::at_statement_start, Parser};
use crate::logging::codes;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::syntax::listener::{ErrorListener, PositionLookup};
use crate::tokens::{SpannedToken, Token, TokenStream};
use crate::utils::Span;
use crate::{log_debug, log_error, log_info, log_success, log_warning};
use std::collections::VecDeque;

pub struct EvalParser<'l> {
    tokens: TokenStream,
    listener: &'l mut dyn ErrorListener,
    preferences: ParserPreferences,
    context_stack: Vec<&'static str>,
    /// Rules entered while the context stack was full
    context_overflow: usize,
    error_history: VecDeque<SyntaxError>,
    parse_depth: usize,
    /// Set once an error is reported with recovery disabled
    halted: bool,
}

impl<'l> EvalParser<'l> {
    pub fn new(tokens: TokenStream, listener: &'l mut dyn ErrorListener) -> Self {
        Self::with_preferences(tokens, listener, ParserPreferences::default())
    }

    pub fn with_preferences(
        tokens: TokenStream,
        listener: &'l mut dyn ErrorListener,
        preferences: ParserPreferences,
    ) -> Self {
        log_debug!("Creating EVAL parser", "tokens" => tokens.len());

        Self {
            tokens,
            listener,
            preferences,
            context_stack: Vec::new(),
            context_overflow: 0,
            error_history: VecDeque::new(),
            parse_depth: 0,
            halted: false,
        }
    }

    /// Parse the whole token stream into a program tree
    pub fn parse_program(&mut self) -> Program {
        self.push_context("program");

        log_info!("Starting EVAL program parsing",
            "tokens" => self.tokens.len(),
            "context" => self.current_context()
        );

        let program = builders::parse_program(self);

        log_success!(codes::success::PARSE_COMPLETE, "EVAL program parsing completed",
            "statements" => program.statements.len(),
            "errors" => self.error_history.len(),
            "final_position" => self.tokens.position()
        );

        self.pop_context();
        program
    }

    /// Most recent errors, oldest first
    pub fn error_history(&self) -> Vec<&SyntaxError> {
        self.error_history.iter().collect()
    }

    pub fn current_context(&self) -> String {
        self.context_stack.last().copied().unwrap_or("root").to_string()
    }

    pub fn context_path(&self) -> String {
        self.context_stack.join(" -> ")
    }

    fn push_context(&mut self, rule: &'static str) {
        if self.context_stack.len() >= MAX_CONTEXT_STACK_DEPTH {
            self.context_overflow += 1;
            return;
        }
        self.context_stack.push(rule);
    }

    fn pop_context(&mut self) {
        if self.context_overflow > 0 {
            self.context_overflow -= 1;
        } else {
            self.context_stack.pop();
        }
    }

    fn record_error(&mut self, error: SyntaxError) {
        if self.error_history.len() >= MAX_ERROR_HISTORY {
            self.error_history.pop_front();
        }
        self.error_history.push_back(error);
    }

    fn skip_to_end(&mut self) {
        while !self.tokens.is_at_end() {
            self.tokens.advance();
        }
    }
}

impl Parser for EvalParser<'_> {
    fn current(&self) -> &SpannedToken {
        self.tokens.current()
    }

    fn peek(&self, n: usize) -> &Token {
        &self.tokens.peek_ahead(n.min(MAX_LOOKAHEAD_TOKENS)).value
    }

    fn advance(&mut self) -> SpannedToken {
        let consumed = self.tokens.current().clone();
        self.tokens.advance();
        consumed
    }

    fn check(&self, expected: &Token) -> bool {
        self.tokens.check(expected)
    }

    fn expect(&mut self, expected: &Token) -> SyntaxResult<SpannedToken> {
        self.tokens.expect_token(expected).map_err(SyntaxError::from)
    }

    fn save_position(&self) -> usize {
        self.tokens.save_position()
    }

    fn span_from(&self, start: usize) -> Span {
        self.tokens.span_from(start)
    }

    fn enter_rule(&mut self, rule: &'static str) -> SyntaxResult<()> {
        if self.parse_depth >= MAX_PARSE_DEPTH {
            let span = self.tokens.current_span();
            log_error!(codes::syntax::MAX_RECURSION_DEPTH, "Maximum parser nesting depth exceeded",
                span = span,
                "depth" => self.parse_depth,
                "rule" => rule
            );
            return Err(SyntaxError::max_recursion_depth(MAX_PARSE_DEPTH, span));
        }

        self.parse_depth += 1;
        self.push_context(rule);
        Ok(())
    }

    fn exit_rule(&mut self) {
        self.parse_depth = self.parse_depth.saturating_sub(1);
        self.pop_context();
    }

    fn report_error(&mut self, error: &SyntaxError) {
        if self.halted {
            return;
        }

        let span = error.span().unwrap_or_else(|| self.tokens.current_span());
        log_error!(error.error_code(), &error.to_string(),
            span = span,
            "context" => self.current_context()
        );

        self.listener.syntax_error(
            error.offending_text().as_deref(),
            span.start.line,
            span.start.char_position_in_line(),
            &error.to_string(),
        );
        self.record_error(error.clone());
    }

    fn recover(&mut self, in_block: bool) {
        if !self.preferences.enable_recovery {
            self.halted = true;
            self.skip_to_end();
            return;
        }

        let start_position = self.tokens.position();
        let mut scanned = 0;

        while !self.tokens.is_at_end() {
            if at_statement_start(&*self) || (in_block && self.check(&Token::RightBrace)) {
                break;
            }
            if scanned >= MAX_RECOVERY_SCAN_TOKENS {
                log_error!(codes::syntax::RECOVERY_FAILED, "No synchronization point within scan limit",
                    "scanned" => scanned,
                    "context" => self.current_context()
                );
                self.skip_to_end();
                return;
            }
            self.tokens.advance();
            scanned += 1;
        }

        let skipped = self.tokens.position() - start_position;
        if self.preferences.log_recovery_events {
            log_info!("Recovered to synchronization point",
                "tokens_skipped" => skipped,
                "resume_at" => self.tokens.current_token().text()
            );
        } else {
            log_debug!("Recovered to synchronization point", "tokens_skipped" => skipped);
        }
    }

    fn report_print_string_ambiguity(&mut self) {
        if !self.preferences.report_ambiguities || self.halted {
            return;
        }

        let start = self.tokens.current_index();
        let stop = self.tokens.index_ahead(1);
        log_warning!(code = codes::syntax::AMBIGUOUS_ALTERNATIVE,
            "printArg resolved to STRING over expression",
            "start" => start,
            "stop" => stop
        );

        self.listener.report_attempting_full_context(start, stop);
        let lookup: &dyn PositionLookup = &self.tokens;
        self.listener.report_ambiguity(Some(lookup), start, stop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::*;
    use crate::lexical::tokenize;
    use crate::syntax::listener::{CollectingErrorListener, SyntaxDiagnostic};
    use assert_matches::assert_matches;

    fn preferences(enable_recovery: bool, report_ambiguities: bool) -> ParserPreferences {
        ParserPreferences {
            enable_recovery,
            report_ambiguities,
            log_recovery_events: false,
        }
    }

    fn parse_with(source: &str, prefs: ParserPreferences) -> (Program, Vec<SyntaxDiagnostic>) {
        let mut listener = CollectingErrorListener::new();
        let tokens = tokenize(source, &mut listener);
        let program = EvalParser::with_preferences(tokens, &mut listener, prefs).parse_program();
        (program, listener.into_errors())
    }

    fn parse(source: &str) -> (Program, Vec<SyntaxDiagnostic>) {
        parse_with(source, preferences(true, false))
    }

    fn first_value(program: &Program) -> &Expression {
        match &program.statements[0] {
            Statement::VariableDeclaration(decl) => &decl.value,
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        let (program, errors) = parse("int x = 1 + 2 * 3");
        assert!(errors.is_empty());

        let value = first_value(&program);
        assert_eq!(value.to_string(), "[1 + [2 * 3]]");
        assert_matches!(value, Expression::Additive(bin) => {
            assert_matches!(*bin.right, Expression::Multiplicative(_));
            assert_eq!(bin.operator.value, Token::Plus);
        });
    }

    #[test]
    fn test_parentheses_reset_precedence() {
        let (program, errors) = parse("int x = (1 + 2) * 3");
        assert!(errors.is_empty());

        let value = first_value(&program);
        assert_matches!(value, Expression::Multiplicative(bin) => {
            assert_matches!(&*bin.left, Expression::Paren { inner, .. } => {
                assert_matches!(**inner, Expression::Additive(_));
            });
        });
    }

    #[test]
    fn test_binary_operators_are_left_associative() {
        let (program, _) = parse("int x = 10 - 4 - 3");
        assert_eq!(first_value(&program).to_string(), "[[10 - 4] - 3]");

        let (program, _) = parse("bool b = 1 < 2 == 3 > 4");
        assert_eq!(first_value(&program).to_string(), "[[1 < 2] == [3 > 4]]");
    }

    #[test]
    fn test_unary_minus_binds_tightest() {
        let (program, _) = parse("int x = -a * b");
        assert_matches!(first_value(&program), Expression::Multiplicative(bin) => {
            assert_matches!(*bin.left, Expression::UnaryMinus { .. });
        });
    }

    #[test]
    fn test_builtin_calls_and_macros() {
        let (program, errors) =
            parse("float r = pow(2.0, 3.0) + sqrt(PI) + cast(min(1, 2), float) + abs(-1) + round(YEAR)");
        assert!(errors.is_empty(), "{:?}", errors);
        let rendered = first_value(&program).to_string();
        assert!(rendered.contains("pow(2.0, 3.0)"));
        assert!(rendered.contains("cast(min(1, 2), float)"));
        assert!(rendered.contains("round(YEAR)"));
    }

    #[test]
    fn test_statement_forms() {
        let source = r#"
const int LIMIT = 10
int i = 0
while (i < LIMIT) {
    i += 1
}
if (i == 10) {
    print("done", i)
} else if (i > 10) {
    print("over")
} else {
    print(i)
}
try {
    i /= 0
} catch (e) {
    print("Error")
}
{ bool flag = true }
"#;
        let (program, errors) = parse(source);
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(program.statements.len(), 6);
        assert_matches!(&program.statements[0], Statement::ConstDeclaration(c) => {
            assert_eq!(c.declaration.name, "LIMIT");
        });
        assert_matches!(&program.statements[3], Statement::If(stmt) => {
            assert_eq!(stmt.else_ifs.len(), 1);
            assert!(stmt.else_block.is_some());
        });
        assert_matches!(&program.statements[4], Statement::Try(stmt) => {
            assert_eq!(stmt.catch_binding.as_deref(), Some("e"));
        });
        assert_matches!(program.statements[5], Statement::Block(_));
    }

    #[test]
    fn test_catch_without_binding() {
        let (program, errors) = parse("try { int a = 1 } catch { int b = 2 }");
        assert!(errors.is_empty());
        assert_matches!(&program.statements[0], Statement::Try(stmt) => {
            assert!(stmt.catch_binding.is_none());
        });
    }

    #[test]
    fn test_no_viable_alternative_is_reported_and_parsing_continues() {
        let (program, errors) = parse("int x = * 3\nint y = 2");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 1);
        assert_eq!(errors[0].column, 8);
        assert_eq!(
            errors[0].message,
            "no viable alternative at input '*' (token: \"*\")"
        );
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_missing_closing_paren_at_eof() {
        let (_, errors) = parse("print(1");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "missing ')' at '<EOF>' (token: \"<EOF>\")");
    }

    #[test]
    fn test_unclosed_block_keeps_statements() {
        let (program, errors) = parse("while (true) {\n int a = 1\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("missing '}'"));
        assert_matches!(&program.statements[0], Statement::While(w) => {
            assert_eq!(w.body.statements.len(), 1);
        });
    }

    #[test]
    fn test_recovery_inside_block_stops_at_brace() {
        let (program, errors) = parse("if (x) { ) ) }\nint y = 1");
        assert_eq!(errors.len(), 1);
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_recovery_disabled_reports_first_error_only() {
        let (program, errors) = parse_with("int = 1\nint y = \nint z = 3", preferences(false, false));
        assert_eq!(errors.len(), 1);
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_nesting_limit_is_reported_once() {
        let depth = MAX_PARSE_DEPTH + 5;
        let source = format!("int x = {}1{}", "(".repeat(depth), ")".repeat(depth));
        let (_, errors) = parse(&source);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("maximum nesting depth"));
    }

    #[test]
    fn test_lone_string_print_argument_reports_ambiguity() {
        let (program, errors) = parse_with("print(\"hi\", 1)", preferences(true, true));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity, crate::diagnostics::Severity::Warning);
        // print ( "hi" -> full-list indices 0, 1, 2; the comma follows at 3
        assert_eq!(errors[0].message, "Ambiguity detected from index 2 to 3");
        assert_eq!((errors[0].line, errors[0].column), (1, 6));

        assert_matches!(&program.statements[0], Statement::Print(p) => {
            assert_matches!(&p.args[0], PrintArg::String { text, .. } => assert_eq!(text, "\"hi\""));
        });
    }

    #[test]
    fn test_string_in_expression_is_not_ambiguous() {
        let (program, errors) = parse_with("print(\"a\" + x)", preferences(true, true));
        assert!(errors.is_empty());
        assert_matches!(&program.statements[0], Statement::Print(p) => {
            assert_matches!(p.args[0], PrintArg::Expression(Expression::Additive(_)));
        });
    }

    #[test]
    fn test_lexer_errors_do_not_reach_parser() {
        let (program, errors) = parse("int x = 5 @ 3");
        // '@' is reported by the lexer; the dangling 3 is a parse error
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.starts_with("token recognition error"));
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_error_history_is_bounded() {
        let source = "int = 1\n".repeat(MAX_ERROR_HISTORY + 10);
        let mut listener = CollectingErrorListener::new();
        let tokens = tokenize(&source, &mut listener);
        let mut parser = EvalParser::with_preferences(tokens, &mut listener, preferences(true, false));
        parser.parse_program();
        assert_eq!(parser.error_history().len(), MAX_ERROR_HISTORY);
    }
}
