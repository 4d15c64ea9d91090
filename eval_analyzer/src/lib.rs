// Internal modules
#[macro_use]
pub mod logging;
pub mod code_actions;
pub mod config;
pub mod diagnostics;
pub mod grammar;
pub mod language;
pub mod lexical;
pub mod pipeline;
pub mod semantic_analysis;
pub mod session;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export the analysis surface for editor integrations
pub use code_actions::{code_actions_for, CodeAction, CodeActionGenerator, TextEdit};
pub use diagnostics::{Diagnostic, EditorMarker, Severity};
pub use pipeline::{analyze_source, AnalysisReport, PipelineError};
pub use semantic_analysis::{analyze, infer_expr_type};
pub use session::{AnalysisSequencer, DocumentId, SessionError, Workspace};
pub use syntax::{parse, ParseOutcome, SyntaxDiagnostic};
