// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Read an environment override, falling back to `default` when unset or unparsable
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to collect per-kind token metrics
    pub collect_detailed_metrics: bool,

    /// Whether unmatched characters are reported to the error listener
    pub report_invalid_characters: bool,

    /// Whether comments count towards the total token count
    pub count_comments: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_or(env_vars::LEXICAL_DETAILED_METRICS, true),
            report_invalid_characters: env_or(env_vars::LEXICAL_REPORT_INVALID, true),
            count_comments: env_or(env_vars::LEXICAL_COUNT_COMMENTS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserPreferences {
    /// Whether the parser resynchronises after a syntax error
    pub enable_recovery: bool,

    /// Whether ambiguity reports reach the listener
    pub report_ambiguities: bool,

    /// Whether recovery skips are logged at info level
    pub log_recovery_events: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            enable_recovery: env_or(env_vars::PARSER_ENABLE_RECOVERY, true),
            report_ambiguities: env_or(env_vars::PARSER_REPORT_AMBIGUITIES, true),
            log_recovery_events: env_or(env_vars::PARSER_LOG_RECOVERY, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPreferences {
    /// Whether cursor-line refactors are offered alongside quick fixes
    pub include_refactors: bool,

    /// Whether a summary event is logged after each validation run
    pub log_analysis_summary: bool,
}

impl Default for AnalysisPreferences {
    fn default() -> Self {
        Self {
            include_refactors: env_or(env_vars::ANALYSIS_INCLUDE_REFACTORS, true),
            log_analysis_summary: env_or(env_vars::ANALYSIS_LOG_SUMMARY, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to emit JSON-formatted events
    pub use_structured_logging: bool,

    /// Whether events are printed to the console
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether timing information is attached to success events
    pub log_performance_events: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env_or(env_vars::LOGGING_LOG_PERFORMANCE, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        self.to_events_log_level().as_str()
    }

    /// Convert to the event-level enum used by the logging service
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub parser: ParserPreferences,
    pub analysis: AnalysisPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "EVAL_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_REPORT_INVALID: &str = "EVAL_LEXICAL_REPORT_INVALID";
    pub const LEXICAL_COUNT_COMMENTS: &str = "EVAL_LEXICAL_COUNT_COMMENTS";

    // Parser
    pub const PARSER_ENABLE_RECOVERY: &str = "EVAL_PARSER_ENABLE_RECOVERY";
    pub const PARSER_REPORT_AMBIGUITIES: &str = "EVAL_PARSER_REPORT_AMBIGUITIES";
    pub const PARSER_LOG_RECOVERY: &str = "EVAL_PARSER_LOG_RECOVERY";

    // Analysis
    pub const ANALYSIS_INCLUDE_REFACTORS: &str = "EVAL_ANALYSIS_INCLUDE_REFACTORS";
    pub const ANALYSIS_LOG_SUMMARY: &str = "EVAL_ANALYSIS_LOG_SUMMARY";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "EVAL_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "EVAL_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "EVAL_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "EVAL_LOGGING_LOG_PERFORMANCE";
}
