//! Per-source diagnostic collection with cargo-style reporting
//!
//! Lexical errors are non-fatal, so a single source can produce many of them.
//! The collector groups events by source name and renders them in bulk once
//! analysis finishes.

use super::events::LogEvent;
use crate::config::compile_time::logging::MAX_LOG_EVENTS_PER_SOURCE;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Name and timing of the source currently being analyzed
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub source_name: String,
    pub start_time: Instant,
}

impl SourceContext {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_sources: usize,
    pub failed_sources: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

// ============================================================================
// ERROR COLLECTOR
// ============================================================================

pub struct ErrorCollector {
    source_events: Mutex<BTreeMap<String, Vec<LogEvent>>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            source_events: Mutex::new(BTreeMap::new()),
        }
    }

    fn events(&self) -> MutexGuard<'_, BTreeMap<String, Vec<LogEvent>>> {
        self.source_events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record an event for a source, capped per source
    pub fn record_event(&self, source_name: &str, event: LogEvent) {
        let mut events = self.events();
        let source_events = events.entry(source_name.to_string()).or_default();

        if source_events.len() < MAX_LOG_EVENTS_PER_SOURCE {
            source_events.push(event);
        } else if source_events.len() == MAX_LOG_EVENTS_PER_SOURCE {
            source_events.push(LogEvent::warning(&format!(
                "Too many diagnostics for source (limit: {})",
                MAX_LOG_EVENTS_PER_SOURCE
            )));
        }
    }

    pub fn get_source_events(&self, source_name: &str) -> Vec<LogEvent> {
        self.events().get(source_name).cloned().unwrap_or_default()
    }

    pub fn source_has_errors(&self, source_name: &str) -> bool {
        self.events()
            .get(source_name)
            .is_some_and(|events| events.iter().any(|e| e.is_error()))
    }

    pub fn get_all_source_events(&self) -> BTreeMap<String, Vec<LogEvent>> {
        self.events().clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = self.events();
        let mut summary = ProcessingSummary {
            total_sources: events.len(),
            ..Default::default()
        };

        for source_events in events.values() {
            if source_events.iter().any(|e| e.is_error()) {
                summary.failed_sources += 1;
            }
            summary.total_errors += source_events.iter().filter(|e| e.is_error()).count();
            summary.total_warnings += source_events.iter().filter(|e| e.is_warning()).count();
        }

        summary
    }

    pub fn total_event_count(&self) -> usize {
        self.events().values().map(Vec::len).sum()
    }

    pub fn clear(&self) {
        self.events().clear();
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CARGO-STYLE FORMATTING
// ============================================================================

/// Render one source's errors and warnings in cargo style
pub fn format_source_events(source_name: &str, events: &[LogEvent]) -> String {
    let mut output = String::new();

    for event in events.iter().filter(|e| e.is_error() || e.is_warning()) {
        let kind = if event.is_error() { "error" } else { "warning" };
        let location = event
            .span
            .as_ref()
            .map(|s| format!("\n  --> {}:{}", source_name, s.start()))
            .unwrap_or_default();

        output.push_str(&format!(
            "{}[{}]: {}{}\n",
            kind,
            event.code.as_str(),
            event.message,
            location
        ));

        for (key, value) in event.context.iter().filter(|(k, _)| k.as_str() != "source") {
            output.push_str(&format!("  = {}: {}\n", key, value));
        }

        if event.is_error() && crate::logging::codes::get_error_metadata(event.code.as_str()).is_some()
        {
            output.push_str(&format!("  = help: {}\n", event.recommended_action()));
        }
    }

    output
}

/// Render every collected source followed by totals
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (source_name, events) in &collector.get_all_source_events() {
        let rendered = format_source_events(source_name, events);
        if !rendered.is_empty() {
            output.push_str(&format!("Checking {}...\n", source_name));
            output.push_str(&rendered);
            output.push('\n');
        }
    }

    let summary = collector.get_summary();
    if summary.has_errors() {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.has_warnings() {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_events_grouped_by_source() {
        let collector = ErrorCollector::new();

        collector.record_event(
            "calc.f",
            LogEvent::error(codes::lexical::UNKNOWN_CHARACTER, "Unknown character '$'"),
        );
        collector.record_event("other.f", LogEvent::warning("Real literal defaulted"));

        assert_eq!(collector.get_source_events("calc.f").len(), 1);
        assert!(collector.source_has_errors("calc.f"));
        assert!(!collector.source_has_errors("other.f"));

        let summary = collector.get_summary();
        assert_eq!(summary.total_sources, 2);
        assert_eq!(summary.failed_sources, 1);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(summary.total_warnings, 1);
    }

    #[test]
    fn test_per_source_cap() {
        let collector = ErrorCollector::new();
        for _ in 0..MAX_LOG_EVENTS_PER_SOURCE + 5 {
            collector.record_event(
                "noisy.f",
                LogEvent::error(codes::lexical::UNKNOWN_CHARACTER, "Unknown character"),
            );
        }

        // Cap plus the single overflow notice
        assert_eq!(
            collector.get_source_events("noisy.f").len(),
            MAX_LOG_EVENTS_PER_SOURCE + 1
        );
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let pos = Position::new(4, 1, 5);
        collector.record_event(
            "calc.f",
            LogEvent::error(codes::lexical::UNKNOWN_CHARACTER, "Unknown character '$'")
                .with_span(Span::new(pos, pos.advance('$'))),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.contains("Checking calc.f..."));
        assert!(output.contains("error[E020]: Unknown character '$'"));
        assert!(output.contains("--> calc.f:1:5"));
        assert!(output.contains("Total errors: 1"));
    }
}
