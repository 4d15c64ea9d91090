//! Semantic validation of EVAL source text
//!
//! Works line by line on raw text and never consults the parse tree, so it
//! produces useful findings even for programs that do not parse. Every
//! finding is a [`Diagnostic`] tagged with the analyzer source.

pub mod call_checker;
pub mod calls;
pub mod inference;
pub mod types;
pub mod validator;

pub use calls::{extract_all_calls, split_top_level_args, ExtractedCall};
pub use inference::infer_expr_type;
pub use types::{
    builtin_constant_type, lookup_function, DiagnosticSink, EvalType, FunctionSignature,
    ReturnKind, SemanticError, SemanticResult, SymbolTable, BUILTIN_CONSTANTS, BUILTIN_FUNCTIONS,
};
pub use validator::{has_division_by_zero, normalize_line, LineValidator};

use crate::{
    config::compile_time::semantic::*, config::runtime::AnalysisPreferences,
    diagnostics::Diagnostic, log_debug, log_info, log_success, logging::codes,
};

/// Line-based validator with configurable summary logging
pub struct SemanticAnalyzer {
    preferences: AnalysisPreferences,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(AnalysisPreferences::default())
    }

    pub fn with_preferences(preferences: AnalysisPreferences) -> Self {
        Self { preferences }
    }

    /// Validate `code`; diagnostics come out in line order
    pub fn analyze(&self, code: &str) -> Vec<Diagnostic> {
        let validator = LineValidator::new(code);

        log_info!("Starting semantic validation",
            "lines" => validator.line_count(),
            "max_diagnostics" => MAX_SEMANTIC_DIAGNOSTICS,
            "max_line_length" => MAX_LINE_LENGTH);

        let start_time = std::time::Instant::now();
        let (sink, symbols) = validator.run();
        let truncated = sink.is_full();
        let diagnostics = sink.into_diagnostics();

        if truncated {
            log_debug!("Semantic validation stopped early at diagnostic limit",
                "limit" => MAX_SEMANTIC_DIAGNOSTICS);
        }

        if self.preferences.log_analysis_summary {
            let errors = diagnostics.iter().filter(|d| d.is_error()).count();
            log_success!(
                codes::success::VALIDATION_COMPLETE,
                "Semantic validation completed",
                "errors" => errors,
                "warnings" => diagnostics.len() - errors,
                "variables" => symbols.len(),
                "truncated" => truncated,
                "duration_ms" => start_time.elapsed().as_millis()
            );
        }

        diagnostics
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate with preferences taken from the environment
pub fn analyze(code: &str) -> Vec<Diagnostic> {
    SemanticAnalyzer::new().analyze(code)
}
