//! Configuration for the token validator
//!
//! Three layers:
//! - `compile_time`: security and accessibility limits generated by `build.rs`
//!   from `config/<profile>.toml`
//! - [`runtime`]: user preferences read from `TOKENS_*` environment variables
//! - [`accessibility`]: the contrast-pair and color-scale tables, injected
//!   into the annotator as immutable data

// Generated from the TOML profile selected by TOKENS_BUILD_PROFILE
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod accessibility;
pub mod runtime;

pub use accessibility::{AccessibilityConfig, AccessibilityConfigError, ContrastRule};
pub use runtime::RuntimeConfig;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("TOKENS_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("TOKENS_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(compile_time::tree::MAX_TREE_DEPTH > 0);
        assert!(compile_time::references::MAX_REFERENCE_DEPTH > 0);
        assert!(compile_time::accessibility::REM_BASE_PX > 0.0);
        assert!(compile_time::accessibility::DEFAULT_CONTRAST_RATIO >= 1.0);
    }

    #[test]
    fn test_source_info_mentions_profile() {
        assert!(super::build_info::source_info().contains(super::build_info::profile()));
    }
}
