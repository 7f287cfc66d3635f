use super::output::PipelineOutput;
use super::stats::PipelineSummary;
use crate::file_processor::FileMetadata;
use crate::tree::TokenTree;
use crate::validation::ValidationIssue;
use std::time::Duration;

/// Complete pipeline result: the validated tree and everything found in it
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub tree: TokenTree,
    pub issues: Vec<ValidationIssue>,
    pub summary: PipelineSummary,
    /// Set when the document was loaded from disk
    pub file_metadata: Option<FileMetadata>,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn has_issues(&self) -> bool {
        !self.summary.is_clean()
    }

    pub fn source(&self) -> Option<String> {
        self.file_metadata
            .as_ref()
            .map(|metadata| metadata.path.display().to_string())
    }

    pub fn to_output(&self) -> PipelineOutput {
        PipelineOutput::new(self)
    }

    pub fn log_success(&self, source: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        let tokens_per_sec = if seconds > 0.0 {
            self.summary.token_count as f64 / seconds
        } else {
            0.0
        };

        crate::log_success!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "Token pipeline completed",
            "source" => source,
            "tokens" => self.summary.token_count,
            "issues" => self.summary.issue_count,
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "processing_rate_tokens_per_sec" => format!("{:.0}", tokens_per_sec)
        );
    }
}
