use crate::accessibility::AnnotationStats;
use crate::metadata::StripStats;
use crate::normalization::NormalizationStats;
use crate::reference_resolution::{InlineStats, ResolutionStats};
use crate::validation::{ValidationIssue, ValidationStats};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Counters reported by each stage; `None` when the stage was switched off
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalization: Option<NormalizationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StripStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<AnnotationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inlining: Option<InlineStats>,
    pub validation: ValidationStats,
}

/// Per-document summary written next to the issue list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub token_count: usize,
    pub issue_count: usize,
    pub issues_by_code: BTreeMap<&'static str, usize>,
    pub duration_ms: f64,
    pub stages: StageStats,
}

impl PipelineSummary {
    pub fn new(
        token_count: usize,
        issues: &[ValidationIssue],
        stages: StageStats,
        duration: Duration,
    ) -> Self {
        let mut issues_by_code = BTreeMap::new();
        for issue in issues {
            *issues_by_code.entry(issue.code()).or_insert(0) += 1;
        }

        Self {
            token_count,
            issue_count: issues.len(),
            issues_by_code,
            duration_ms: duration.as_secs_f64() * 1000.0,
            stages,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issue_count == 0
    }

    /// One line per issue code, for console output
    pub fn report(&self) -> String {
        if self.is_clean() {
            return format!("{} tokens, no issues", self.token_count);
        }

        let mut lines = vec![format!(
            "{} tokens, {} issues",
            self.token_count, self.issue_count
        )];
        for (code, count) in &self.issues_by_code {
            lines.push(format!("  {}: {}", code, count));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TokenPath;

    fn too_small(name: &str) -> ValidationIssue {
        ValidationIssue::FontSizeTooSmall {
            path: TokenPath::from([name]),
            actual: 10.0,
            minimum: 16.0,
        }
    }

    #[test]
    fn test_issues_are_counted_by_code() {
        let issues = vec![too_small("a"), too_small("b")];
        let summary =
            PipelineSummary::new(5, &issues, StageStats::default(), Duration::from_millis(3));

        assert_eq!(summary.issue_count, 2);
        assert_eq!(summary.issues_by_code.get("FONT_SIZE_TOO_SMALL"), Some(&2));
        assert!(!summary.is_clean());
        assert!(summary.report().contains("FONT_SIZE_TOO_SMALL: 2"));
    }

    #[test]
    fn test_clean_summary() {
        let summary = PipelineSummary::new(3, &[], StageStats::default(), Duration::ZERO);
        assert!(summary.is_clean());
        assert_eq!(summary.report(), "3 tokens, no issues");
    }
}
