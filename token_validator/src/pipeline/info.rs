use crate::config::build_info;
use crate::config::compile_time::{file_processing, references, tree};
use crate::tree::extensions;

/// Stage names in execution order
pub const STAGES: [&str; 6] = [
    "normalize",
    "strip-metadata",
    "annotate",
    "resolve-references",
    "validate",
    "inline-references",
];

/// Information about pipeline capabilities and the limits it was built with
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub stages: Vec<&'static str>,
    pub max_file_size: u64,
    pub max_tree_depth: usize,
    pub max_token_count: usize,
    pub max_reference_depth: usize,
    pub reserved_extensions: Vec<&'static str>,
    pub supported_extensions: Vec<String>,
    pub config_source: String,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "Design Token Pipeline:\n\
             - Stages: {}\n\
             - Max File Size: {} MB\n\
             - Max Tree Depth: {}\n\
             - Max Tokens: {}\n\
             - Max Reference Depth: {}\n\
             - Reserved Extensions: {}\n\
             - Supported Extensions: {}\n\
             - Configuration: {}",
            self.stages.join(" -> "),
            self.max_file_size / (1024 * 1024),
            self.max_tree_depth,
            self.max_token_count,
            self.max_reference_depth,
            self.reserved_extensions.join(", "),
            self.supported_extensions.join(", "),
            self.config_source
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{}-stage design token pipeline for {} files",
            self.stages.len(),
            self.supported_extensions.join(", ")
        )
    }
}

/// Get pipeline capabilities information
pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        stages: STAGES.to_vec(),
        max_file_size: file_processing::MAX_FILE_SIZE,
        max_tree_depth: tree::MAX_TREE_DEPTH,
        max_token_count: tree::MAX_TOKEN_COUNT,
        max_reference_depth: references::MAX_REFERENCE_DEPTH,
        reserved_extensions: vec![
            extensions::RESOLVED_AS,
            extensions::RESOLVED_FROM,
            extensions::CONTRAST_WITH,
            extensions::COLOR_SCALE_POSITION,
            extensions::TOKEN_SUBTYPE,
        ],
        supported_extensions: vec!["json".to_string()],
        config_source: build_info::source_info(),
    }
}
