// RUNTIME PREFERENCES (User Experience)
//
// Security and accessibility floors live in `compile_time`; everything here
// only changes how much work is done and how results are reported.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Whether to refuse files without a .json extension
    pub require_json_extension: bool,

    /// Whether to log read timings and file sizes
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_json_extension: env_or(env_vars::REQUIRE_JSON_EXTENSION, false),
            enable_performance_logging: env_or(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

/// Toggles for the individual pipeline stages.
///
/// Turning a stage off never changes what the remaining stages do with the
/// tree they receive; it only skips the work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelinePreferences {
    pub normalize_legacy_values: bool,
    pub strip_metadata: bool,
    pub annotate_accessibility: bool,
    pub resolve_references: bool,
    pub check_contrast: bool,
    pub check_numeric_constraints: bool,
    /// Replace resolvable reference values with their targets in the output
    pub inline_references: bool,
}

impl Default for PipelinePreferences {
    fn default() -> Self {
        Self {
            normalize_legacy_values: env_or(env_vars::PIPELINE_NORMALIZE, true),
            strip_metadata: env_or(env_vars::PIPELINE_STRIP_METADATA, true),
            annotate_accessibility: env_or(env_vars::PIPELINE_ANNOTATE, true),
            resolve_references: env_or(env_vars::PIPELINE_RESOLVE_REFERENCES, true),
            check_contrast: env_or(env_vars::PIPELINE_CHECK_CONTRAST, true),
            check_numeric_constraints: env_or(env_vars::PIPELINE_CHECK_NUMERIC, true),
            inline_references: env_or(env_vars::PIPELINE_INLINE_REFERENCES, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level written by the console sinks
    pub min_log_level: LogLevel,

    /// Whether to enable cargo-style error reporting
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
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
            enable_cargo_style_output: env_or(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_or(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
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
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

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
pub(crate) fn parse_log_level(level: &str) -> Option<LogLevel> {
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
    pub file_processor: FileProcessorPreferences,
    pub pipeline: PipelinePreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_JSON_EXTENSION: &str = "TOKENS_REQUIRE_JSON_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "TOKENS_ENABLE_PERFORMANCE_LOGGING";

    // Pipeline
    pub const PIPELINE_NORMALIZE: &str = "TOKENS_PIPELINE_NORMALIZE";
    pub const PIPELINE_STRIP_METADATA: &str = "TOKENS_PIPELINE_STRIP_METADATA";
    pub const PIPELINE_ANNOTATE: &str = "TOKENS_PIPELINE_ANNOTATE";
    pub const PIPELINE_RESOLVE_REFERENCES: &str = "TOKENS_PIPELINE_RESOLVE_REFERENCES";
    pub const PIPELINE_CHECK_CONTRAST: &str = "TOKENS_PIPELINE_CHECK_CONTRAST";
    pub const PIPELINE_CHECK_NUMERIC: &str = "TOKENS_PIPELINE_CHECK_NUMERIC";
    pub const PIPELINE_INLINE_REFERENCES: &str = "TOKENS_PIPELINE_INLINE_REFERENCES";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "TOKENS_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "TOKENS_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "TOKENS_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "TOKENS_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "TOKENS_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("TOKENS_TEST_ENV_OR_GARBAGE", "not-a-bool");
        assert!(env_or("TOKENS_TEST_ENV_OR_GARBAGE", true));
        std::env::set_var("TOKENS_TEST_ENV_OR_SET", "false");
        assert!(!env_or("TOKENS_TEST_ENV_OR_SET", true));
        assert_eq!(env_or("TOKENS_TEST_ENV_OR_UNSET_X", 7usize), 7);
    }
}
