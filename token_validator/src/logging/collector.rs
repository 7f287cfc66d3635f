//! Per-file event collection with cargo-style output
//!
//! Warnings and errors logged while a file context is active are kept per
//! file so batch runs can print one grouped report at the end.

use super::events::LogEvent;
use crate::config::compile_time::logging::{MAX_ERROR_COLLECTION, MAX_LOG_EVENTS_PER_FILE};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Context information for file processing
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }
}

/// Summary of batch processing results
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub clean_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Thread-safe error collector for batch processing
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    processing_start: Instant,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    /// Record an event for a specific file
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = lock(&self.file_events);

        let total: usize = events.values().map(Vec::len).sum();
        if total >= MAX_ERROR_COLLECTION {
            return;
        }

        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn record_file_context(&self, context: FileProcessingContext) {
        lock(&self.file_contexts).insert(context.file_path.clone(), context);
    }

    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        lock(&self.file_events)
            .get(file_path)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        lock(&self.file_events).clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = lock(&self.file_events);
        let contexts = lock(&self.file_contexts);

        let mut summary = ProcessingSummary {
            total_files: contexts.len().max(events.len()),
            total_processing_time: self.processing_start.elapsed(),
            ..Default::default()
        };

        for file_events in events.values() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            summary.total_errors += errors;
            summary.total_warnings += warnings;

            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
            }
        }

        summary.clean_files =
            summary.total_files - summary.failed_files - summary.files_with_warnings;
        summary
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn format_event(output: &mut String, kind: &str, event: &LogEvent, file_path: &Path) {
    output.push_str(&format!(
        "{}[{}]: {}\n",
        kind,
        event.code.as_str(),
        event.message
    ));

    match &event.token_path {
        Some(path) => output.push_str(&format!("  --> {}#{}\n", file_path.display(), path)),
        None => output.push_str(&format!("  --> {}\n", file_path.display())),
    }

    let context: Vec<_> = event
        .context
        .iter()
        .filter(|(key, _)| key.as_str() != "file" && key.as_str() != "file_id")
        .collect();
    if !context.is_empty() {
        output.push_str("   |\n");
        for (key, value) in context {
            output.push_str(&format!("   = {}: {}\n", key, value));
        }
    }

    let action = event.recommended_action();
    if action != "No specific action available" {
        output.push_str(&format!("   = help: {}\n", action));
    }
}

/// Format collected errors and warnings grouped by file
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        if !events.iter().any(|e| e.is_error() || e.is_warning()) {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", file_path.display()));
        for event in events.iter().filter(|e| e.is_error()) {
            format_event(&mut output, "error", event, file_path);
        }
        for event in events.iter().filter(|e| e.is_warning()) {
            format_event(&mut output, "warning", event, file_path);
        }
        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.has_errors() || summary.has_warnings() {
        output.push_str(&format!(
            "Finished: {} file(s), {} error(s), {} warning(s)\n",
            summary.total_files, summary.total_errors, summary.total_warnings
        ));
    } else {
        output.push_str(&format!(
            "Finished: {} file(s) checked, no problems found\n",
            summary.total_files
        ));
    }

    output
}
