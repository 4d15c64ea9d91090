//! Best-effort static type inference over expression text
//!
//! `None` means "cannot tell"; callers skip type checks in that case rather
//! than guess.

use super::calls::split_top_level_args;
use super::types::{
    builtin_constant_type, lookup_function, EvalType, ReturnKind, SemanticError, SemanticResult,
    SymbolTable,
};
use crate::config::compile_time::semantic::MAX_INFERENCE_DEPTH;
use crate::grammar::ast::Type;
use crate::utils::patterns::cached;
use crate::{log_debug, log_warning};
use regex::Regex;
use std::sync::OnceLock;

pub(crate) fn int_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^\d+$")
}

pub(crate) fn float_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^\d+\.\d+$")
}

fn string_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r#"^"[^"]*"$"#)
}

fn negative_int_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^-\d+$")
}

fn negative_float_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^-\d+\.\d+$")
}

fn whole_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(?s)^([a-zA-Z_]\w*)\s*\((.+)\)$")
}

/// Infer the type of `expr`, logging and giving up when nesting is too deep
pub fn infer_expr_type(expr: &str, symbols: &SymbolTable) -> Option<EvalType> {
    match infer_at_depth(expr, symbols, 0) {
        Ok(ty) => ty,
        Err(error) => {
            log_warning!(code = error.error_code(), &error.to_string());
            None
        }
    }
}

fn infer_at_depth(
    expr: &str,
    symbols: &SymbolTable,
    depth: usize,
) -> SemanticResult<Option<EvalType>> {
    if depth > MAX_INFERENCE_DEPTH {
        return Err(SemanticError::inference_depth_exceeded(depth, expr));
    }

    let t = expr.trim();

    if int_literal().is_match(t) {
        return Ok(Some(Type::Int));
    }
    if float_literal().is_match(t) {
        return Ok(Some(Type::Float));
    }
    if string_literal().is_match(t) {
        return Ok(Some(Type::String));
    }
    if t == "true" || t == "false" {
        return Ok(Some(Type::Bool));
    }
    if let Some(ty) = symbols.get(t) {
        return Ok(Some(ty));
    }
    if let Some(ty) = builtin_constant_type(t) {
        return Ok(Some(ty));
    }
    if negative_int_literal().is_match(t) {
        return Ok(Some(Type::Int));
    }
    if negative_float_literal().is_match(t) {
        return Ok(Some(Type::Float));
    }

    if let Some(inner) = t.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        return infer_at_depth(inner, symbols, depth + 1);
    }

    let Some(caps) = whole_call().captures(t) else {
        return Ok(None);
    };
    let Some(signature) = lookup_function(&caps[1]) else {
        return Ok(None);
    };
    let args = split_top_level_args(&caps[2]);

    let inferred = match signature.return_kind {
        ReturnKind::FixedFloat => Some(Type::Float),
        ReturnKind::FixedInt => Some(Type::Int),
        ReturnKind::Void => None,
        ReturnKind::FirstArgument => {
            let first = args.first().map(String::as_str).unwrap_or("");
            infer_at_depth(first, symbols, depth + 1)?
        }
        ReturnKind::CastTarget => args.get(1).and_then(|target| Type::parse(target.trim())),
    };

    log_debug!("Inferred call result type",
        "function" => signature.name,
        "type" => inferred.map(|ty| ty.as_str()).unwrap_or("unknown"));

    Ok(inferred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> SymbolTable {
        let mut symbols = SymbolTable::new();
        symbols.declare("x", Type::Int);
        symbols.declare("y", Type::Float);
        symbols.declare("s", Type::String);
        symbols
    }

    #[test]
    fn test_literals() {
        let s = symbols();
        assert_eq!(infer_expr_type("42", &s), Some(Type::Int));
        assert_eq!(infer_expr_type(" 3.14 ", &s), Some(Type::Float));
        assert_eq!(infer_expr_type("\"hi\"", &s), Some(Type::String));
        assert_eq!(infer_expr_type("true", &s), Some(Type::Bool));
        assert_eq!(infer_expr_type("-7", &s), Some(Type::Int));
        assert_eq!(infer_expr_type("-0.5", &s), Some(Type::Float));
        assert_eq!(infer_expr_type("3.", &s), None);
    }

    #[test]
    fn test_variables_and_constants() {
        let s = symbols();
        assert_eq!(infer_expr_type("y", &s), Some(Type::Float));
        assert_eq!(infer_expr_type("PI", &s), Some(Type::Float));
        assert_eq!(infer_expr_type("HOURS_IN_DAY", &s), Some(Type::Int));
        assert_eq!(infer_expr_type("unknown", &s), None);
    }

    #[test]
    fn test_parenthesized() {
        let s = symbols();
        assert_eq!(infer_expr_type("((y))", &s), Some(Type::Float));
        assert_eq!(infer_expr_type("(x) + (y)", &s), None);
    }

    #[test]
    fn test_call_return_kinds() {
        let s = symbols();
        assert_eq!(infer_expr_type("sqrt(x)", &s), Some(Type::Float));
        assert_eq!(infer_expr_type("pow(x, 2)", &s), Some(Type::Float));
        assert_eq!(infer_expr_type("round(y)", &s), Some(Type::Int));
        assert_eq!(infer_expr_type("min(y, 2.0)", &s), Some(Type::Float));
        assert_eq!(infer_expr_type("abs(x)", &s), Some(Type::Int));
        assert_eq!(infer_expr_type("cast(y, int)", &s), Some(Type::Int));
        assert_eq!(infer_expr_type("cast(y, number)", &s), None);
        assert_eq!(infer_expr_type("print(x)", &s), None);
        assert_eq!(infer_expr_type("floor(y)", &s), None);
    }

    #[test]
    fn test_complex_arithmetic_is_unknown() {
        let s = symbols();
        assert_eq!(infer_expr_type("x + y", &s), None);
        assert_eq!(infer_expr_type("sqrt(x) + 1", &s), None);
        assert_eq!(infer_expr_type("-x", &s), None);
    }

    #[test]
    fn test_deep_nesting_gives_up() {
        let s = symbols();
        let depth = MAX_INFERENCE_DEPTH + 5;
        let expr = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(infer_expr_type(&expr, &s), None);
        assert!(infer_at_depth(&expr, &s, 0).is_err());
    }
}
