use crate::config::AccessibilityConfigError;
use crate::file_processor::FileProcessorError;
use crate::logging::codes::{self, Code};
use crate::tree::TreeError;

/// Pipeline processing errors
///
/// Only problems that stop a document from being processed at all end up
/// here; everything found inside a valid document is a `ValidationIssue`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Token document rejected: {0}")]
    Document(#[from] TreeError),

    #[error("Accessibility configuration rejected: {0}")]
    AccessibilityConfig(#[from] AccessibilityConfigError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(error) => error.error_code(),
            Self::Document(error) => error.error_code(),
            Self::AccessibilityConfig(_) => codes::system::INITIALIZATION_FAILURE,
            Self::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}
