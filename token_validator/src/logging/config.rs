//! Logging configuration
//!
//! Compile-time limits come from `config::compile_time::logging`; user
//! preferences are set once at startup and fall back to the environment.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized")?;
    Ok(())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Minimum level written by console sinks.
///
/// Errors are never filtered: a preference of `Error` still lets warnings
/// through when the build profile's floor demands it.
pub fn get_min_log_level() -> EventsLogLevel {
    let user_level = get_runtime_preferences().min_log_level.to_events_log_level();
    let floor = get_security_log_level();
    user_level.max(floor)
}

/// Level below which events are always written (compile-time floor)
pub fn get_security_log_level() -> EventsLogLevel {
    match SECURITY_MIN_LOG_LEVEL {
        0 => EventsLogLevel::Error,
        1 => EventsLogLevel::Warning,
        _ => EventsLogLevel::Info,
    }
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn use_cargo_style_output() -> bool {
    get_runtime_preferences().enable_cargo_style_output
}

pub fn include_file_context() -> bool {
    get_runtime_preferences().include_file_context
}

pub fn get_max_log_events_per_file() -> usize {
    MAX_LOG_EVENTS_PER_FILE
}

/// Messages longer than this are truncated before they reach a sink
pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Validate compile-time logging limits
pub fn validate_config() -> Result<(), String> {
    if MAX_ERROR_COLLECTION == 0 {
        return Err("max_error_collection must be positive".to_string());
    }

    if MAX_LOG_EVENTS_PER_FILE < MAX_ERROR_COLLECTION {
        return Err(format!(
            "max_log_events_per_file ({}) is smaller than max_error_collection ({})",
            MAX_LOG_EVENTS_PER_FILE, MAX_ERROR_COLLECTION
        ));
    }

    if MAX_LOG_MESSAGE_LENGTH < 80 {
        return Err(format!(
            "max_log_message_length too small: {}",
            MAX_LOG_MESSAGE_LENGTH
        ));
    }

    Ok(())
}
