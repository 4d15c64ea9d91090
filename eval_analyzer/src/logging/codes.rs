//! Error and success codes with their classification metadata
//!
//! Every code the analyzer logs is declared here together with its category,
//! severity and recommended action. Lookups fall back to neutral defaults for
//! codes that are not registered.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E022");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const COMMENT_TOO_LONG: Code = Code::new("E025");
    pub const TOKEN_LIMIT_EXCEEDED: Code = Code::new("E026");
    pub const SOURCE_TOO_LARGE: Code = Code::new("E027");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E100");
    pub const NO_VIABLE_ALTERNATIVE: Code = Code::new("E101");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E102");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E103");
    pub const AMBIGUOUS_ALTERNATIVE: Code = Code::new("E104");
    pub const INTERNAL_PARSER_ERROR: Code = Code::new("E105");
    pub const RECOVERY_FAILED: Code = Code::new("E106");
    pub const DIAGNOSTIC_LIMIT_REACHED: Code = Code::new("E107");
}

/// Semantic validation error codes
pub mod semantic {
    use super::Code;

    pub const DIAGNOSTIC_LIMIT_REACHED: Code = Code::new("E200");
    pub const INFERENCE_DEPTH_EXCEEDED: Code = Code::new("E201");
    pub const LINE_TOO_LONG: Code = Code::new("E202");
}

/// Document session and edit application codes
pub mod session {
    use super::Code;

    pub const STALE_EDIT: Code = Code::new("E300");
    pub const UNKNOWN_DOCUMENT: Code = Code::new("E301");
    pub const DOCUMENT_LIMIT_EXCEEDED: Code = Code::new("E302");
    pub const INVALID_EDIT_RANGE: Code = Code::new("E303");
    pub const STALE_RESULT_DISCARDED: Code = Code::new("E304");
}

/// Source loading codes used by the command-line driver
pub mod pipeline {
    use super::Code;

    pub const FILE_READ_FAILED: Code = Code::new("E310");
    pub const UNSUPPORTED_SOURCE: Code = Code::new("E311");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I010");
    pub const PARSE_COMPLETE: Code = Code::new("I011");
    pub const VALIDATION_COMPLETE: Code = Code::new("I012");
    pub const CODE_ACTIONS_GENERATED: Code = Code::new("I013");
    pub const DOCUMENT_OPENED: Code = Code::new("I020");
    pub const EDIT_APPLIED: Code = Code::new("I021");
    pub const ANALYSIS_PIPELINE_COMPLETE: Code = Code::new("I030");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        "Internal analyzer failure",
        "File a bug report with the source text that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        "Logging or configuration initialization failure",
        "Check EVAL_* environment variables and the build profile",
    ),
    // Lexical
    ErrorMetadata::new(
        "E020",
        "Lexical",
        Severity::Medium,
        true,
        "Character not recognized by the EVAL lexer",
        "Remove the character or place it inside a string literal",
    ),
    ErrorMetadata::new(
        "E021",
        "Lexical",
        Severity::Medium,
        true,
        "String literal is missing its closing quote",
        "Add the closing double quote",
    ),
    ErrorMetadata::new(
        "E022",
        "Lexical",
        Severity::Medium,
        true,
        "Block comment is missing its closing */",
        "Close the comment with */",
    ),
    ErrorMetadata::new(
        "E023",
        "Lexical",
        Severity::Medium,
        true,
        "Identifier exceeds the configured maximum length",
        "Use a shorter identifier",
    ),
    ErrorMetadata::new(
        "E024",
        "Lexical",
        Severity::Medium,
        true,
        "String literal exceeds the configured maximum size",
        "Split the string into smaller literals",
    ),
    ErrorMetadata::new(
        "E025",
        "Lexical",
        Severity::Low,
        true,
        "Comment exceeds the configured maximum length",
        "Shorten the comment",
    ),
    ErrorMetadata::new(
        "E026",
        "Lexical",
        Severity::High,
        true,
        "Source produces more tokens than the configured limit",
        "Split the program into smaller sources",
    ),
    ErrorMetadata::new(
        "E027",
        "Lexical",
        Severity::High,
        true,
        "Source text exceeds the configured maximum size",
        "Analyze a smaller source",
    ),
    // Syntax
    ErrorMetadata::new(
        "E100",
        "Syntax",
        Severity::Medium,
        true,
        "Token does not fit the expected grammar production",
        "Check the statement against the EVAL grammar",
    ),
    ErrorMetadata::new(
        "E101",
        "Syntax",
        Severity::Medium,
        true,
        "No grammar alternative matches the input",
        "Check for a missing operand, keyword or delimiter",
    ),
    ErrorMetadata::new(
        "E102",
        "Syntax",
        Severity::Medium,
        true,
        "Input ended before the construct was complete",
        "Close the open block, call or statement",
    ),
    ErrorMetadata::new(
        "E103",
        "Syntax",
        Severity::High,
        true,
        "Nesting exceeds the configured parse depth",
        "Reduce nesting of blocks or parenthesized expressions",
    ),
    ErrorMetadata::new(
        "E104",
        "Syntax",
        Severity::Low,
        true,
        "Input admits more than one parse",
        "Add parentheses to make the intended grouping explicit",
    ),
    ErrorMetadata::new(
        "E105",
        "Syntax",
        Severity::Critical,
        true,
        "Parser failed internally; one best-effort diagnostic was produced",
        "File a bug report with the source text that triggered it",
    ),
    ErrorMetadata::new(
        "E106",
        "Syntax",
        Severity::High,
        true,
        "Error recovery could not find a synchronization point",
        "Fix the first reported syntax error and re-run",
    ),
    ErrorMetadata::new(
        "E107",
        "Syntax",
        Severity::Low,
        true,
        "Syntax diagnostics were truncated at the configured limit",
        "Fix the reported errors and re-run",
    ),
    // Semantic
    ErrorMetadata::new(
        "E200",
        "Semantic",
        Severity::Low,
        true,
        "Semantic diagnostics were truncated at the configured limit",
        "Fix the reported problems and re-run",
    ),
    ErrorMetadata::new(
        "E201",
        "Semantic",
        Severity::Low,
        true,
        "Type inference gave up on a deeply nested expression",
        "Simplify the expression",
    ),
    ErrorMetadata::new(
        "E202",
        "Semantic",
        Severity::Low,
        true,
        "Line exceeds the configured maximum analysis length",
        "Split the statement across several lines",
    ),
    // Session
    ErrorMetadata::new(
        "E300",
        "Session",
        Severity::Medium,
        true,
        "Edit was computed against an older document version",
        "Request fresh code actions for the current version",
    ),
    ErrorMetadata::new(
        "E301",
        "Session",
        Severity::Medium,
        true,
        "Document handle is not open in the workspace",
        "Open the document before analyzing it",
    ),
    ErrorMetadata::new(
        "E302",
        "Session",
        Severity::Medium,
        true,
        "Workspace already holds the maximum number of documents",
        "Close an open document first",
    ),
    ErrorMetadata::new(
        "E303",
        "Session",
        Severity::Medium,
        true,
        "Edit range lies outside the document",
        "Recompute the edit against the current text",
    ),
    ErrorMetadata::new(
        "E304",
        "Session",
        Severity::Low,
        true,
        "Analysis result superseded by a newer submission",
        "No action needed",
    ),
    // Pipeline
    ErrorMetadata::new(
        "E310",
        "Pipeline",
        Severity::High,
        false,
        "Source file could not be read",
        "Check that the path exists and is readable UTF-8 text",
    ),
    ErrorMetadata::new(
        "E311",
        "Pipeline",
        Severity::Medium,
        false,
        "Source file is not an EVAL program",
        "Pass a file with the .evl extension",
    ),
    // Success
    ErrorMetadata::new(
        "I001",
        "System",
        Severity::Low,
        true,
        "Logging system initialized",
        "None",
    ),
    ErrorMetadata::new(
        "I010",
        "Lexical",
        Severity::Low,
        true,
        "Tokenization completed",
        "Continue to parsing",
    ),
    ErrorMetadata::new(
        "I011",
        "Syntax",
        Severity::Low,
        true,
        "Parse completed",
        "Continue to semantic validation",
    ),
    ErrorMetadata::new(
        "I012",
        "Semantic",
        Severity::Low,
        true,
        "Semantic validation completed",
        "Present diagnostics",
    ),
    ErrorMetadata::new(
        "I013",
        "CodeActions",
        Severity::Low,
        true,
        "Code actions generated",
        "Offer actions to the editor",
    ),
    ErrorMetadata::new(
        "I020",
        "Session",
        Severity::Low,
        true,
        "Document opened",
        "None",
    ),
    ErrorMetadata::new(
        "I021",
        "Session",
        Severity::Low,
        true,
        "Edit applied to document",
        "Re-run analysis on the new version",
    ),
    ErrorMetadata::new(
        "I030",
        "Pipeline",
        Severity::Low,
        true,
        "Full analysis pipeline completed",
        "None",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|entry| (entry.code, entry.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
