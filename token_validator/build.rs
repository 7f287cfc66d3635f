// build.rs - TOML-driven compile-time constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    tree: TreeLimits,
    references: ReferenceLimits,
    accessibility: AccessibilityLimits,
    batch_processing: BatchProcessingLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    large_file_threshold: u64,
}

#[derive(serde::Deserialize)]
struct TreeLimits {
    max_tree_depth: usize,
    max_token_count: usize,
    max_identifier_length: usize,
}

#[derive(serde::Deserialize)]
struct ReferenceLimits {
    max_reference_depth: usize,
}

#[derive(serde::Deserialize)]
struct AccessibilityLimits {
    min_font_size_px: f64,
    rem_base_px: f64,
    min_line_height: f64,
    default_contrast_ratio: f64,
}

#[derive(serde::Deserialize)]
struct BatchProcessingLimits {
    max_worker_threads: usize,
    max_files_per_batch: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_error_collection: usize,
    max_log_message_length: usize,
    max_log_events_per_file: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=TOKENS_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=TOKENS_CONFIG_DIR");

    let profile = env::var("TOKENS_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("TOKENS_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the crate directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_TREE_DEPTH: usize = 1_024;
    const ABSOLUTE_MAX_REFERENCE_DEPTH: usize = 1_024;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("SECURITY: max_file_size exceeds absolute maximum");
    }

    if config.tree.max_tree_depth == 0 || config.tree.max_tree_depth > ABSOLUTE_MAX_TREE_DEPTH {
        panic!("SECURITY: max_tree_depth must be within 1..={ABSOLUTE_MAX_TREE_DEPTH}");
    }

    if config.references.max_reference_depth == 0
        || config.references.max_reference_depth > ABSOLUTE_MAX_REFERENCE_DEPTH
    {
        panic!("SECURITY: max_reference_depth must be within 1..={ABSOLUTE_MAX_REFERENCE_DEPTH}");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("SECURITY: security_min_log_level too high (max: 2)");
    }

    if config.accessibility.rem_base_px <= 0.0 {
        panic!("ACCESSIBILITY: rem_base_px must be positive");
    }

    if config.accessibility.default_contrast_ratio < 1.0
        || config.accessibility.default_contrast_ratio > 21.0
    {
        panic!("ACCESSIBILITY: default_contrast_ratio must be within 1..=21");
    }

    if profile == "production" {
        if config.file_processing.max_file_size > 50_000_000 {
            panic!("PRODUCTION: max_file_size too high for production");
        }
        if config.accessibility.min_font_size_px < 16.0 {
            panic!("PRODUCTION: min_font_size_px may not be relaxed below 16px");
        }
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_FILE_THRESHOLD: u64 = {};
    }}

    pub mod tree {{
        pub const MAX_TREE_DEPTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
    }}

    pub mod references {{
        pub const MAX_REFERENCE_DEPTH: usize = {};
    }}

    pub mod accessibility {{
        pub const MIN_FONT_SIZE_PX: f64 = {:?};
        pub const REM_BASE_PX: f64 = {:?};
        pub const MIN_LINE_HEIGHT: f64 = {:?};
        pub const DEFAULT_CONTRAST_RATIO: f64 = {:?};
    }}

    pub mod batch_processing {{
        pub const MAX_WORKER_THREADS: usize = {};
        pub const MAX_FILES_PER_BATCH: usize = {};
    }}

    pub mod logging {{
        pub const MAX_ERROR_COLLECTION: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOG_EVENTS_PER_FILE: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        // File Processing
        config.file_processing.max_file_size,
        config.file_processing.large_file_threshold,
        // Tree
        config.tree.max_tree_depth,
        config.tree.max_token_count,
        config.tree.max_identifier_length,
        // References
        config.references.max_reference_depth,
        // Accessibility
        config.accessibility.min_font_size_px,
        config.accessibility.rem_base_px,
        config.accessibility.min_line_height,
        config.accessibility.default_contrast_ratio,
        // Batch Processing
        config.batch_processing.max_worker_threads,
        config.batch_processing.max_files_per_batch,
        // Logging
        config.logging.max_error_collection,
        config.logging.max_log_message_length,
        config.logging.max_log_events_per_file,
        config.logging.security_min_log_level,
    );

    fs::write(output_path, constants_code).unwrap();
}
