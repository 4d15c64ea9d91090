//! Line-based semantic validation
//!
//! Pass one records every `type name = expr` declaration so later lines may
//! refer to variables declared further down. Pass two classifies each line
//! and applies the declaration, call and division checks.

use super::call_checker::validate_function_calls;
use super::inference::{float_literal, infer_expr_type, int_literal};
use super::types::{
    builtin_constant_type, lookup_function, DiagnosticSink, EvalType, SemanticError, SymbolTable,
};
use crate::config::compile_time::semantic::MAX_LINE_LENGTH;
use crate::grammar::ast::Type;
use crate::utils::patterns::cached;
use crate::{log_debug, log_warning};
use regex::{Captures, Regex};
use std::sync::OnceLock;

// === LINE PATTERNS ===

pub(crate) fn declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(const\s+)?(int|float|string|bool)\s+(\w+)\s*=\s*(.+)")
}

fn declaration_without_value() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(const\s+)?(int|float|string|bool)\s+(\w+)\s*$")
}

fn declaration_without_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(const\s+)?(int|float|string|bool)\s*=\s*")
}

fn try_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^try\s*\{")
}

fn close_then_catch() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^}\s*catch\s*\(\s*\w+\s*\)\s*\{")
}

fn bare_catch() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^catch\s*\(")
}

pub(crate) fn call_statement() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^[a-zA-Z_]\w*\s*\(")
}

fn reassignment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^[a-zA-Z_]\w*\s*(\+|-|\*|/)?=\s*")
}

pub(crate) fn assigned_value() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"=\s*(.+)$")
}

fn cast_expression() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^cast\s*\((.+),\s*(\w+)\s*\)$")
}

fn division_by_zero_candidate() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"/\s*0")
}

fn quoted_text() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r#""[^"]*""#)
}

fn call_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\b([a-zA-Z_]\w*)\s*\(")
}

fn type_or_cast_keyword() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\b(int|float|string|bool|cast)\b")
}

fn identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\b[a-zA-Z_]\w*\b")
}

/// `/` followed by optional whitespace and a `0` that does not start a decimal
pub fn has_division_by_zero(text: &str) -> bool {
    division_by_zero_candidate()
        .find_iter(text)
        .any(|m| !text[m.end()..].starts_with('.'))
}

/// Drop a `//` comment, one trailing `;` and surrounding whitespace
///
/// A trailing carriage return is removed first so CRLF sources behave like
/// LF sources.
pub fn normalize_line(raw: &str) -> &str {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    let line = match line.find("//") {
        Some(index) => &line[..index],
        None => line,
    };
    line.strip_suffix(';').unwrap_or(line).trim()
}

// === TRY/CATCH TRACKING ===

/// Brace-depth tracker that knows whether the current line is protected by
/// an enclosing `try`
#[derive(Debug, Default)]
struct TryCatchTracker {
    inside: bool,
    depth: i64,
    try_start: Option<i64>,
}

impl TryCatchTracker {
    /// Update depth for `line`; returns true when the line is purely structural
    fn observe(&mut self, line: &str) -> bool {
        let delta = line.matches('{').count() as i64 - line.matches('}').count() as i64;

        if try_open().is_match(line) {
            self.inside = true;
            self.try_start = Some(self.depth);
            self.depth += delta;
            return true;
        }
        if close_then_catch().is_match(line) || bare_catch().is_match(line) {
            self.depth += delta;
            return true;
        }

        self.depth += delta;
        self.close_if_left();
        line == "{" || line == "}"
    }

    fn close_if_left(&mut self) {
        if let Some(start) = self.try_start {
            if self.inside && self.depth <= start {
                self.inside = false;
                self.try_start = None;
            }
        }
    }

    fn protects(&self) -> bool {
        self.inside
    }
}

// === VALIDATOR ===

pub struct LineValidator<'a> {
    lines: Vec<&'a str>,
    symbols: SymbolTable,
    tracker: TryCatchTracker,
    sink: DiagnosticSink,
}

impl<'a> LineValidator<'a> {
    pub fn new(code: &'a str) -> Self {
        let lines = code
            .split('\n')
            .enumerate()
            .map(|(index, raw)| {
                let length = raw.chars().count();
                if length > MAX_LINE_LENGTH {
                    let error = SemanticError::line_too_long(index as u32 + 1, length);
                    log_warning!(code = error.error_code(), &error.to_string());
                    ""
                } else {
                    normalize_line(raw)
                }
            })
            .collect();

        Self {
            lines,
            symbols: SymbolTable::new(),
            tracker: TryCatchTracker::default(),
            sink: DiagnosticSink::new(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn run(mut self) -> (DiagnosticSink, SymbolTable) {
        self.collect_declarations();
        log_debug!("Collected declarations", "variables" => self.symbols.len());

        for index in 0..self.lines.len() {
            if self.sink.is_full() {
                break;
            }
            let line = self.lines[index];
            if line.is_empty() {
                continue;
            }
            if self.tracker.observe(line) {
                continue;
            }
            self.check_statement(index, line);
        }

        (self.sink, self.symbols)
    }

    fn collect_declarations(&mut self) {
        for line in &self.lines {
            if let Some(caps) = declaration().captures(line) {
                if let Some(ty) = Type::parse(&caps[2]) {
                    self.symbols.declare(&caps[3], ty);
                }
            }
        }
    }

    fn check_statement(&mut self, index: usize, line: &str) {
        let number = index as u32 + 1;

        if let Some(caps) = declaration().captures(line) {
            self.check_declaration(index, &caps);
            return;
        }
        if declaration_without_name().is_match(line) {
            self.sink.error(
                number,
                "Variable declaration is missing a name (e.g. `int x = ...`)",
            );
            return;
        }
        if let Some(caps) = declaration_without_value().captures(line) {
            self.sink.warning(
                number,
                format!("Variable '{}' declared but never assigned", &caps[3]),
            );
            return;
        }
        if call_statement().is_match(line) {
            validate_function_calls(line, number, None, &self.symbols, &mut self.sink);
            return;
        }
        if reassignment().is_match(line) {
            if let Some(caps) = assigned_value().captures(line) {
                let value = &caps[1];
                if has_division_by_zero(value) && !self.tracker.protects() {
                    self.sink.error(number, "Division by zero detected");
                }
                validate_function_calls(value, number, None, &self.symbols, &mut self.sink);
            }
            return;
        }
        if has_division_by_zero(line) && !self.tracker.protects() {
            self.sink.error(number, "Division by zero detected");
            return;
        }

        self.sink
            .warning(number, format!("Unrecognized statement: '{}'", line));
    }

    fn check_declaration(&mut self, index: usize, caps: &Captures<'_>) {
        let number = index as u32 + 1;
        let is_const = caps.get(1).is_some();
        let Some(declared) = Type::parse(&caps[2]) else {
            return;
        };
        let name = &caps[3];
        let expr = caps[4].trim();

        log_debug!("Checking declaration", "line" => number, "name" => name, "type" => declared);

        if !is_const && self.symbols.contains(name) && self.declared_before(index, name) {
            self.sink
                .warning(number, format!("Variable '{}' is already declared", name));
        }

        if declared.is_numeric() {
            self.check_numeric_initializer(number, name, declared, expr);
        }

        if has_division_by_zero(expr) && !self.tracker.protects() {
            self.sink.error(number, "Division by zero detected");
        }

        self.check_undeclared_references(number, expr, name);
        validate_function_calls(expr, number, Some(declared), &self.symbols, &mut self.sink);
    }

    fn declared_before(&self, index: usize, name: &str) -> bool {
        self.lines[..index].iter().any(|previous| {
            declaration()
                .captures(previous)
                .is_some_and(|caps| &caps[3] == name)
        })
    }

    fn check_numeric_initializer(&mut self, number: u32, name: &str, declared: EvalType, expr: &str) {
        if declared == Type::Float && int_literal().is_match(expr) {
            self.sink.error(
                number,
                format!(
                    "Float variable '{}' must be initialised with a float literal — use {1}.0 instead of {1}",
                    name, expr
                ),
            );
        }
        if declared == Type::Int && float_literal().is_match(expr) {
            self.sink.warning(
                number,
                format!(
                    "Assigning float literal to 'int' variable '{}' — implicit conversion",
                    name
                ),
            );
        }
        if declared == Type::Int && self.symbols.get(expr) == Some(Type::Float) {
            self.sink.warning(
                number,
                format!(
                    "Assigning float variable to 'int' variable '{}' — implicit conversion",
                    name
                ),
            );
        }

        if let Some(cast) = cast_expression().captures(expr) {
            let target = cast[2].trim();
            match Type::parse(target) {
                None => self.sink.error(
                    number,
                    format!(
                        "Invalid cast target type '{}' — expected 'int' or 'float'",
                        target
                    ),
                ),
                Some(target_type) if target_type != declared => self.sink.error(
                    number,
                    format!(
                        "Cast type '{}' does not match declared variable type '{}' for '{}' — use cast(expr, {})",
                        target, declared, name, declared
                    ),
                ),
                Some(_) => {}
            }
            return;
        }

        // Call results into int are reported with more detail by the call checker
        if declared == Type::Int
            && infer_expr_type(expr, &self.symbols) == Some(Type::Float)
            && !call_statement().is_match(expr)
        {
            self.sink.warning(
                number,
                format!(
                    "Expression evaluates to 'float' but variable '{}' is declared as 'int' — implicit conversion",
                    name
                ),
            );
        }
    }

    /// Warn once per occurrence of an identifier nothing declares
    fn check_undeclared_references(&mut self, number: u32, expr: &str, current: &str) {
        let without_strings = quoted_text().replace_all(expr, "");
        let without_calls = call_name().replace_all(&without_strings, " (");
        let stripped = type_or_cast_keyword().replace_all(&without_calls, "");

        for id in identifier().find_iter(&stripped).map(|m| m.as_str()) {
            let known = self.symbols.contains(id)
                || builtin_constant_type(id).is_some()
                || lookup_function(id).is_some()
                || Type::parse(id).is_some()
                || id == current
                || id == "true"
                || id == "false";
            if !known {
                self.sink.warning(
                    number,
                    format!("Reference to undeclared identifier '{}'", id),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(code: &str) -> Vec<crate::diagnostics::Diagnostic> {
        LineValidator::new(code).run().0.into_diagnostics()
    }

    #[test]
    fn test_normalize_line() {
        assert_eq!(normalize_line("  int x = 1 // note"), "int x = 1");
        assert_eq!(normalize_line("int x = 1; // note"), "int x = 1;");
        assert_eq!(normalize_line("int x = 1;"), "int x = 1");
        assert_eq!(normalize_line("int x = 1;;"), "int x = 1;");
        assert_eq!(normalize_line("print(x)\r"), "print(x)");
        assert_eq!(normalize_line("// only a comment"), "");
    }

    #[test]
    fn test_division_by_zero_detection() {
        assert!(has_division_by_zero("x / 0"));
        assert!(has_division_by_zero("x /0"));
        assert!(!has_division_by_zero("x / 0.5"));
        assert!(has_division_by_zero("x / 0.5 + y / 0"));
        assert!(!has_division_by_zero("x / 10"));
    }

    #[test]
    fn test_tracker_protects_until_try_block_closes() {
        let mut tracker = TryCatchTracker::default();
        assert!(tracker.observe("try {"));
        assert!(tracker.protects());
        assert!(!tracker.observe("int x = 1 / 0"));
        assert!(tracker.protects());
        assert!(tracker.observe("} catch (e) {"));
        assert!(tracker.protects());
        assert!(tracker.observe("}"));
        assert!(!tracker.protects());
    }

    #[test]
    fn test_forward_references_are_declared() {
        let diagnostics = run("int a = b\nint b = 2");
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn test_unrecognized_statement() {
        let diagnostics = run("hello world");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Unrecognized statement: 'hello world'");
        assert!(diagnostics[0].is_warning());
    }

    #[test]
    fn test_bare_division_statement() {
        let diagnostics = run("10 / 0");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Division by zero detected");
    }

    #[test]
    fn test_reassignment_checks_value() {
        let diagnostics = run("int x = 1\nx += 4 / 0\nx = floor(x)");
        let messages: Vec<_> = diagnostics.iter().map(|d| (d.line, d.message.as_str())).collect();
        assert_eq!(
            messages,
            vec![
                (2, "Division by zero detected"),
                (3, "Unknown function 'floor' — is this a built-in or typo?"),
            ]
        );
    }

    #[test]
    fn test_string_literals_hide_identifiers() {
        let diagnostics = run("string s = \"hello there\"");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_repeated_undeclared_identifier_warns_each_time() {
        let diagnostics = run("int x = q + q");
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.message == "Reference to undeclared identifier 'q'"));
    }

    #[test]
    fn test_symbols_are_returned() {
        let (_, symbols) = LineValidator::new("float f = 1.0\nbool b = true").run();
        assert_eq!(symbols.get("f"), Some(Type::Float));
        assert_eq!(symbols.get("b"), Some(Type::Bool));
    }
}
