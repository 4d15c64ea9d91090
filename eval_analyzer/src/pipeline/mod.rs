//! End-to-end analysis of one source text: lex, parse, validate
//!
//! The pipeline is total. Syntax and semantic findings are data in the
//! report; a panic inside the validator is caught here and surfaces as a
//! single error diagnostic instead of unwinding into the caller.

mod error;
mod info;
mod result;

pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo};
pub use result::AnalysisReport;

use crate::config::constants::SOURCE_EXTENSION;
use crate::config::runtime::RuntimeConfig;
use crate::diagnostics::Diagnostic;
use crate::grammar::ast::{Node, NodeCounter, Visitor};
use crate::logging::codes;
use crate::semantic_analysis::SemanticAnalyzer;
use crate::{log_error, log_info, syntax};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

pub struct AnalysisPipeline {
    config: RuntimeConfig,
}

impl AnalysisPipeline {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn run(&self, text: &str) -> AnalysisReport {
        let start_time = Instant::now();
        log_info!("Starting EVAL analysis pipeline", "bytes" => text.len());

        let outcome = syntax::parse_with_preferences(text, self.config.parser.clone());
        let semantic_diagnostics = self.validate(text);

        let mut counter = NodeCounter::default();
        counter.visit(Node::Program(&outcome.tree));

        let report = AnalysisReport {
            tree: outcome.tree,
            syntax_diagnostics: outcome.diagnostics,
            semantic_diagnostics,
            token_count: outcome.token_count,
            node_count: counter.total,
            tree_depth: counter.max_depth,
            source_bytes: text.len(),
            processing_duration: start_time.elapsed(),
        };

        if self.config.logging.log_performance_events {
            report.log_success();
        }
        report
    }

    fn validate(&self, text: &str) -> Vec<Diagnostic> {
        let analyzer = SemanticAnalyzer::with_preferences(self.config.analysis.clone());
        match panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(text))) {
            Ok(diagnostics) => diagnostics,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log_error!(codes::system::INTERNAL_ERROR, "Semantic validation failed",
                    "error" => message);
                vec![Diagnostic::error(
                    1,
                    format!("Internal analyzer error: {}", message),
                )]
            }
        }
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze `text` with configuration taken from the environment
pub fn analyze_source(text: &str) -> AnalysisReport {
    AnalysisPipeline::new().run(text)
}

/// Reject paths that do not name an EVAL source
pub fn check_source_path(path: &Path) -> Result<(), PipelineError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(extension) if extension.eq_ignore_ascii_case(SOURCE_EXTENSION) => Ok(()),
        _ => Err(PipelineError::UnsupportedExtension {
            path: path.display().to_string(),
            expected: SOURCE_EXTENSION,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_clean_program() {
        let _ = crate::logging::init_global_logging();
        let report = analyze_source("int x = 5\nfloat y = 2.5\nprint(x, y)\n");
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert_eq!(report.tree.statements.len(), 3);
        assert!(report.token_count > 0);
        assert!(report.node_count > report.tree.statements.len());
    }

    #[test]
    fn test_both_diagnostic_streams() {
        let report = analyze_source("int x = 10 / 0\nint y = ");
        assert!(!report.syntax_diagnostics.is_empty());
        assert!(report
            .semantic_diagnostics
            .iter()
            .any(|d| d.message == "Division by zero detected"));
        assert!(report.has_errors());
        assert_eq!(report.markers().len(), report.diagnostic_count());
    }

    #[test]
    fn test_warning_only_report() {
        let report = analyze_source("int x = 1\nint x = 2\n");
        assert!(report.syntax_diagnostics.is_empty());
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_pipeline_is_total() {
        for text in ["", "\"unterminated", "((((((((", "}{)(", "/* open"] {
            let report = analyze_source(text);
            assert_eq!(report.source_bytes, text.len());
        }
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let text = "float y = 20\nint r = min(1, 2.0)\n";
        let first = analyze_source(text);
        let second = analyze_source(text);
        assert_eq!(first.syntax_diagnostics, second.syntax_diagnostics);
        assert_eq!(first.semantic_diagnostics, second.semantic_diagnostics);
        assert_eq!(first.tree, second.tree);
    }

    #[test]
    fn test_check_source_path() {
        assert!(check_source_path(Path::new("prog.evl")).is_ok());
        assert!(check_source_path(Path::new("dir/PROG.EVL")).is_ok());
        assert_matches!(
            check_source_path(Path::new("notes.txt")),
            Err(PipelineError::UnsupportedExtension { .. })
        );
        assert_matches!(check_source_path(Path::new("evl")), Err(_));
    }

    #[test]
    fn test_error_codes() {
        let error = PipelineError::pipeline_error("boom");
        assert_eq!(error.error_code().as_str(), "ERR001");
        let error = PipelineError::file_read(
            "missing.evl",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(error.error_code().as_str(), "E310");
        assert!(error.to_string().starts_with("Failed to read 'missing.evl'"));
    }

    #[test]
    fn test_pipeline_info_report() {
        let info = get_pipeline_info();
        assert_eq!(info.stages, vec!["lex", "parse", "validate"]);
        assert!(info.report().contains("Language: evl (.evl)"));
    }
}
