use crate::diagnostics::{to_markers, Diagnostic, EditorMarker, Severity};
use crate::grammar::ast::nodes::Program;
use crate::syntax::SyntaxDiagnostic;
use serde::Serialize;
use std::time::Duration;

/// Everything one analysis run produced for a source text
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub tree: Program,
    pub syntax_diagnostics: Vec<SyntaxDiagnostic>,
    pub semantic_diagnostics: Vec<Diagnostic>,
    pub token_count: usize,
    pub node_count: usize,
    pub tree_depth: usize,
    pub source_bytes: usize,
    pub processing_duration: Duration,
}

impl AnalysisReport {
    pub fn error_count(&self) -> usize {
        self.syntax_diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
            + self
                .semantic_diagnostics
                .iter()
                .filter(|d| d.is_error())
                .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostic_count() - self.error_count()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.syntax_diagnostics.len() + self.semantic_diagnostics.len()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostic_count() == 0
    }

    /// Editor markers, syntax first
    pub fn markers(&self) -> Vec<EditorMarker> {
        to_markers(&self.syntax_diagnostics, &self.semantic_diagnostics)
    }

    pub fn log_success(&self) {
        let seconds = self.processing_duration.as_secs_f64();
        crate::log_success!(
            crate::logging::codes::success::ANALYSIS_PIPELINE_COMPLETE,
            "EVAL analysis pipeline completed",
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "tokens" => self.token_count,
            "nodes" => self.node_count,
            "syntax_diagnostics" => self.syntax_diagnostics.len(),
            "semantic_diagnostics" => self.semantic_diagnostics.len(),
            "processing_rate_bytes_per_sec" => format!("{:.0}",
                self.source_bytes as f64 / seconds.max(f64::EPSILON))
        );
    }
}
