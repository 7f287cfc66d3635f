// Internal modules
pub mod accessibility;
pub mod batch;
pub mod codecs;
pub mod config;
pub mod file_processor;
#[macro_use]
pub mod logging;
pub mod metadata;
pub mod normalization;
pub mod pipeline;
pub mod reference_resolution;
pub mod tree;
pub mod utils;
pub mod validation;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use config::AccessibilityConfig;
pub use pipeline::{process_document, process_file, PipelineConfig, PipelineError, PipelineResult};
pub use tree::{Token, TokenTree};
pub use utils::TokenPath;
pub use validation::ValidationIssue;

// Re-export pipeline output for report consumers
pub use pipeline::output::PipelineOutput;
