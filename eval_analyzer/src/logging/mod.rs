//! Global logging for the EVAL analyzer
//!
//! Provides a process-wide logging service, per-thread document context and a
//! macro interface. Logging before `init_global_logging` is silently dropped.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{Logger, LoggingService, MemoryLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Document currently being analyzed on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    pub uri: String,
    pub version: u64,
}

thread_local! {
    static DOCUMENT_CONTEXT: RefCell<Option<DocumentContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging; repeated calls are no-ops
pub fn init_global_logging() -> Result<(), String> {
    if is_initialized() {
        return Ok(());
    }

    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());

    // Another thread may win the race; that service is equally configured
    if GLOBAL_LOGGER.set(logging_service.clone()).is_err() {
        return Ok(());
    }

    let required = [
        codes::system::INTERNAL_ERROR,
        codes::lexical::INVALID_CHARACTER,
        codes::syntax::NO_VIABLE_ALTERNATIVE,
        codes::session::STALE_EDIT,
    ];
    for code in required {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!("Missing metadata for code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// DOCUMENT CONTEXT MANAGEMENT
// ============================================================================

/// Execute `f` with the given document attached to every event it logs
pub fn with_document_context<F, R>(uri: &str, version: u64, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = DOCUMENT_CONTEXT.with(|ctx| {
        ctx.replace(Some(DocumentContext {
            uri: uri.to_string(),
            version,
        }))
    });
    let result = f();
    DOCUMENT_CONTEXT.with(|ctx| *ctx.borrow_mut() = previous);
    result
}

pub fn get_current_document_context() -> Option<DocumentContext> {
    DOCUMENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Attach the thread's document context, then hand the event to the global logger
pub fn dispatch(event: LogEvent) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    if !logger.should_log(event.level) {
        return;
    }

    let event = match get_current_document_context() {
        Some(doc) => event
            .with_context("document", &doc.uri)
            .with_context("version", &doc.version.to_string()),
        None => event,
    };
    logger.log_event(event);
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event);
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let event = context
        .into_iter()
        .fold(LogEvent::success(code, message), |event, (key, value)| {
            event.with_context(key, value)
        });
    dispatch(event);
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let event = context
        .into_iter()
        .fold(LogEvent::info(message), |event, (key, value)| {
            event.with_context(key, value)
        });
    dispatch(event);
}

/// Log warning with context (used by log_warning! macro)
pub fn log_warning_with_context(code: Option<Code>, message: &str, context: Vec<(&str, &str)>) {
    let base = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    let event = context
        .into_iter()
        .fold(base, |event, (key, value)| event.with_context(key, value));
    dispatch(event);
}

/// Get system diagnostics
pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    if let Some(logger) = try_get_global_logger() {
        diagnostics.push_str(&format!("Service level: {}\n", logger.min_level().as_str()));
    }
    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

/// Error logging that falls back to stderr when uninitialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error(code, message);
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_logging_initialization_is_idempotent() {
        assert!(init_global_logging().is_ok());
        assert!(init_global_logging().is_ok());
        assert!(is_initialized());
    }

    #[test]
    fn test_document_context_is_scoped() {
        assert!(get_current_document_context().is_none());

        let version = with_document_context("mem://a.evl", 3, || {
            let outer = get_current_document_context().map(|c| c.version);
            let inner = with_document_context("mem://b.evl", 7, || {
                get_current_document_context().map(|c| c.uri)
            });
            assert_eq!(inner.as_deref(), Some("mem://b.evl"));
            assert_eq!(get_current_document_context().map(|c| c.version), outer);
            outer
        });

        assert_eq!(version, Some(3));
        assert!(get_current_document_context().is_none());
    }

    #[test]
    fn test_safe_logging() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Initialized:"));
    }
}
