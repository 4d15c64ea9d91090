//! Fixed language and editor-surface constants
//!
//! These are properties of the EVAL language and its editor integration, not
//! tunable limits. Tunable limits live in the generated `compile_time` module.

/// Editor language identifier for EVAL sources
pub const LANGUAGE_ID: &str = "evl";

/// File extension recognised by the command-line driver
pub const SOURCE_EXTENSION: &str = "evl";

/// Source tag attached to semantic validator markers
pub const ANALYZER_SOURCE: &str = "EVAL Analyzer";

/// Source tag attached to parser markers
pub const PARSER_SOURCE: &str = "EVAL Parser";

/// End column used for markers that carry no explicit end
pub const DEFAULT_MARKER_END_COLUMN: u32 = 1000;

/// Placeholder name inserted by the "missing a name" quick fix
pub const PLACEHOLDER_VARIABLE: &str = "myVar";

/// Indentation used when wrapping a statement in a try/catch block
pub const WRAP_INDENT: &str = "    ";
