//! Shared types for semantic validation: the built-in registry, the symbol
//! table, the diagnostic sink and the validator's own failure modes

use crate::{
    config::compile_time::semantic::*, diagnostics::Diagnostic, grammar::ast::Type, log_error,
    logging::codes,
};
use std::collections::HashMap;
use thiserror::Error;

/// Value types known to the validator
pub type EvalType = Type;

/// Result type for fallible validator helpers
pub type SemanticResult<T> = Result<T, SemanticError>;

// ============================================================================
// BUILT-IN REGISTRY
// ============================================================================

/// How the result type of a built-in call is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    /// Always `float` (pow, sqrt)
    FixedFloat,
    /// Always `int` (round)
    FixedInt,
    /// Same type as the first argument (min, max, abs)
    FirstArgument,
    /// The type named by the second argument (cast)
    CastTarget,
    /// Produces no value (print)
    Void,
}

/// Arity and return behaviour of a built-in function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub min_args: usize,
    /// `None` means unbounded
    pub max_args: Option<usize>,
    pub return_kind: ReturnKind,
}

impl FunctionSignature {
    const fn new(
        name: &'static str,
        min_args: usize,
        max_args: Option<usize>,
        return_kind: ReturnKind,
    ) -> Self {
        Self {
            name,
            min_args,
            max_args,
            return_kind,
        }
    }
}

pub const BUILTIN_FUNCTIONS: &[FunctionSignature] = &[
    FunctionSignature::new("cast", 2, Some(2), ReturnKind::CastTarget),
    FunctionSignature::new("pow", 2, Some(2), ReturnKind::FixedFloat),
    FunctionSignature::new("sqrt", 1, Some(1), ReturnKind::FixedFloat),
    FunctionSignature::new("min", 2, Some(2), ReturnKind::FirstArgument),
    FunctionSignature::new("max", 2, Some(2), ReturnKind::FirstArgument),
    FunctionSignature::new("round", 1, Some(1), ReturnKind::FixedInt),
    FunctionSignature::new("print", 1, None, ReturnKind::Void),
    FunctionSignature::new("abs", 1, Some(1), ReturnKind::FirstArgument),
];

/// Built-in constants and their value types
pub const BUILTIN_CONSTANTS: &[(&str, EvalType)] = &[
    ("PI", Type::Float),
    ("DAYS_IN_WEEK", Type::Int),
    ("HOURS_IN_DAY", Type::Int),
    ("YEAR", Type::Int),
];

/// Functions whose value arguments must all resolve to one type
pub const HOMOGENEOUS_ARGUMENT_FUNCTIONS: &[&str] = &["min", "max", "pow", "sqrt", "round", "abs"];

pub fn lookup_function(name: &str) -> Option<&'static FunctionSignature> {
    BUILTIN_FUNCTIONS.iter().find(|sig| sig.name == name)
}

pub fn builtin_constant_type(name: &str) -> Option<EvalType> {
    BUILTIN_CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, ty)| *ty)
}

pub fn requires_homogeneous_arguments(name: &str) -> bool {
    HOMOGENEOUS_ARGUMENT_FUNCTIONS.contains(&name)
}

// ============================================================================
// SYMBOL TABLE
// ============================================================================

/// Declared variables by name; a later declaration replaces an earlier one
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    types: HashMap<String, EvalType>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, ty: EvalType) {
        self.types.insert(name.to_string(), ty);
    }

    pub fn get(&self, name: &str) -> Option<EvalType> {
        self.types.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ============================================================================
// DIAGNOSTIC SINK
// ============================================================================

/// Ordered diagnostic collector bounded by `MAX_SEMANTIC_DIAGNOSTICS`
#[derive(Debug)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    limit: usize,
    truncated: bool,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::with_limit(MAX_SEMANTIC_DIAGNOSTICS)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            diagnostics: Vec::new(),
            limit,
            truncated: false,
        }
    }

    pub fn error(&mut self, line: u32, message: impl Into<String>) {
        self.push(Diagnostic::error(line, message));
    }

    pub fn warning(&mut self, line: u32, message: impl Into<String>) {
        self.push(Diagnostic::warning(line, message));
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.len() >= self.limit {
            if !self.truncated {
                self.truncated = true;
                let error = SemanticError::diagnostic_limit_reached(self.limit);
                log_error!(error.error_code(), &error.to_string(),
                    "line" => diagnostic.line);
            }
            return;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn is_full(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Conditions under which the validator stops looking at part of the input
///
/// None of these surface as diagnostics; they are logged and the affected
/// input is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// Diagnostic cap reached (E200)
    #[error("Semantic diagnostic limit of {limit} reached; remaining findings dropped")]
    DiagnosticLimitReached { limit: usize },

    /// Type inference nested too deeply (E201)
    #[error("Type inference exceeded depth {depth} on '{expression}'")]
    InferenceDepthExceeded { depth: usize, expression: String },

    /// Line skipped because it is too long (E202)
    #[error("Line {line} has {length} characters, more than the limit of {limit}; skipped")]
    LineTooLong {
        line: u32,
        length: usize,
        limit: usize,
    },
}

impl SemanticError {
    pub fn error_code(&self) -> codes::Code {
        match self {
            Self::DiagnosticLimitReached { .. } => codes::semantic::DIAGNOSTIC_LIMIT_REACHED,
            Self::InferenceDepthExceeded { .. } => codes::semantic::INFERENCE_DEPTH_EXCEEDED,
            Self::LineTooLong { .. } => codes::semantic::LINE_TOO_LONG,
        }
    }

    /// Get error type string for logging context
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::DiagnosticLimitReached { .. } => "DiagnosticLimitReached",
            Self::InferenceDepthExceeded { .. } => "InferenceDepthExceeded",
            Self::LineTooLong { .. } => "LineTooLong",
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn diagnostic_limit_reached(limit: usize) -> Self {
        Self::DiagnosticLimitReached { limit }
    }

    /// Keeps only a prefix of long expressions
    pub fn inference_depth_exceeded(depth: usize, expression: &str) -> Self {
        Self::InferenceDepthExceeded {
            depth,
            expression: expression.chars().take(80).collect(),
        }
    }

    pub fn line_too_long(line: u32, length: usize) -> Self {
        Self::LineTooLong {
            line,
            length,
            limit: MAX_LINE_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookups() {
        let print = lookup_function("print").unwrap();
        assert_eq!(print.min_args, 1);
        assert_eq!(print.max_args, None);
        assert_eq!(lookup_function("cast").unwrap().return_kind, ReturnKind::CastTarget);
        assert!(lookup_function("floor").is_none());

        assert_eq!(builtin_constant_type("PI"), Some(Type::Float));
        assert_eq!(builtin_constant_type("YEAR"), Some(Type::Int));
        assert_eq!(builtin_constant_type("Year"), None);

        assert!(requires_homogeneous_arguments("abs"));
        assert!(!requires_homogeneous_arguments("cast"));
    }

    #[test]
    fn test_symbol_table_last_declaration_wins() {
        let mut symbols = SymbolTable::new();
        symbols.declare("x", Type::Int);
        symbols.declare("x", Type::Float);
        assert_eq!(symbols.get("x"), Some(Type::Float));
        assert_eq!(symbols.len(), 1);
        assert!(!symbols.contains("y"));
    }

    #[test]
    fn test_sink_stops_at_limit() {
        let mut sink = DiagnosticSink::with_limit(2);
        sink.error(1, "a");
        sink.warning(2, "b");
        assert!(!sink.is_full());
        sink.error(3, "c");
        assert!(sink.is_full());
        let diagnostics = sink.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].message, "b");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SemanticError::diagnostic_limit_reached(5).error_code().as_str(),
            "E200"
        );
        let depth = SemanticError::inference_depth_exceeded(64, &"(".repeat(200));
        assert_eq!(depth.error_code().as_str(), "E201");
        assert_matches::assert_matches!(
            depth,
            SemanticError::InferenceDepthExceeded { ref expression, .. } if expression.len() == 80
        );
        let long = SemanticError::line_too_long(3, 20_000);
        assert!(long.to_string().contains("Line 3"));
        assert!(long.is_recoverable());
        assert_eq!(long.error_type(), "LineTooLong");
    }
}
