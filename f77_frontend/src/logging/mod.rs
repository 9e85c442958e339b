//! Global logging for the front end
//!
//! Thread-safe global logger and diagnostic collector, a per-thread source
//! context, and the macro support functions. Every entry point is a no-op
//! until `init_global_logging` has run.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, ProcessingSummary, SourceContext};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static SOURCE_CONTEXT: RefCell<Option<SourceContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the installed runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());
    install(logging_service.clone())?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

fn install(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_ERROR_COLLECTOR.get().is_some()
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR
        .get()
        .map(|collector| collector.as_ref())
}

// ============================================================================
// SOURCE CONTEXT MANAGEMENT
// ============================================================================

pub fn set_source_context(source_name: &str) {
    SOURCE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(SourceContext::new(source_name));
    });
}

pub fn clear_source_context() {
    SOURCE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with `source_name` as the current source context
pub fn with_source_context<F, R>(source_name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = get_current_source_context();
    set_source_context(source_name);
    let result = f();
    SOURCE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = previous;
    });
    result
}

pub fn get_current_source_context() -> Option<SourceContext> {
    SOURCE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn attach_source(event: LogEvent) -> LogEvent {
    match get_current_source_context() {
        Some(source) if config::include_source_context() => {
            event.with_context("source", &source.source_name)
        }
        _ => event,
    }
}

fn with_pairs(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    event
}

/// Dispatch an event to the global logger. Errors and warnings raised inside
/// a source context are also recorded in the collector.
pub fn dispatch(event: LogEvent) {
    let event = attach_source(event);

    if event.is_error() || event.is_warning() {
        if let (Some(source), Some(collector)) =
            (get_current_source_context(), try_get_global_error_collector())
        {
            collector.record_event(&source.source_name, event.clone());
        }
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Used by `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = with_pairs(LogEvent::error(code, message), context);
    if let Some(s) = span {
        event = event.with_span(s);
    }
    dispatch(event);
}

/// Used by `log_warning!`
pub fn log_warning_with_context(
    code: Option<Code>,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    let mut event = with_pairs(event, context);
    if let Some(s) = span {
        event = event.with_span(s);
    }
    dispatch(event);
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::success(code, message), context));
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::info(message), context));
}

/// Used by `log_debug!`
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    if config::get_min_log_level() >= LogLevel::Debug {
        dispatch(with_pairs(LogEvent::debug(message), context));
    }
}

// ============================================================================
// REPORTING
// ============================================================================

/// Cargo-style report of everything collected so far
pub fn cargo_style_summary() -> Option<String> {
    try_get_global_error_collector().map(collector::format_cargo_style_errors)
}

pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::from("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));

    if let Some(collector) = try_get_global_error_collector() {
        let summary = collector.get_summary();
        diagnostics.push_str(&format!("Sources processed: {}\n", summary.total_sources));
        diagnostics.push_str(&format!("Total errors: {}\n", summary.total_errors));
        diagnostics.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
        diagnostics.push_str(&format!(
            "Buffered events: {}\n",
            collector.total_event_count()
        ));
    }

    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());
    diagnostics
}

/// Log an error even when the global logger is missing
pub fn safe_log_error(code: Code, message: &str) {
    match try_get_global_logger() {
        Some(logger) => logger.log_event(LogEvent::error(code, message)),
        None => eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_context_management() {
        assert!(get_current_source_context().is_none());

        set_source_context("calc.f");
        let context = get_current_source_context();
        assert_eq!(context.map(|c| c.source_name), Some("calc.f".to_string()));

        clear_source_context();
        assert!(get_current_source_context().is_none());
    }

    #[test]
    fn test_with_source_context_restores_previous() {
        set_source_context("outer.f");

        let result = with_source_context("inner.f", || {
            get_current_source_context().map(|c| c.source_name)
        });

        assert_eq!(result, Some("inner.f".to_string()));
        assert_eq!(
            get_current_source_context().map(|c| c.source_name),
            Some("outer.f".to_string())
        );
        clear_source_context();
    }

    #[test]
    fn test_macros_are_safe_without_initialization() {
        crate::log_error!(codes::system::INTERNAL_ERROR, "Test error", "key" => 1);
        crate::log_warning!("Test warning");
        crate::log_info!("Test info", "count" => 3);
        crate::log_debug!("Test debug");
        safe_log_error(codes::system::INTERNAL_ERROR, "Fallback error");
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Initialized:"));
    }
}
