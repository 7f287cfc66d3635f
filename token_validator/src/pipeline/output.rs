use super::result::PipelineResult;
use super::stats::PipelineSummary;
use crate::validation::ValidationIssue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Serializable report for one document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub tree: Value,
    pub issues: Vec<ValidationIssue>,
    pub summary: PipelineSummary,
}

impl PipelineOutput {
    pub fn new(result: &PipelineResult) -> Self {
        Self {
            generated_at: Utc::now(),
            source: result.source(),
            tree: result.tree.to_value(),
            issues: result.issues.clone(),
            summary: result.summary.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
