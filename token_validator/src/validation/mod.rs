//! Validation
//!
//! Re-walks the finished tree and collects every issue it finds: reference
//! validity, contrast of annotated pairs, units and numeric floors. Nothing
//! short-circuits and nothing is dropped.

pub mod contrast;
pub mod issues;
pub mod numeric;
pub mod references;

pub use issues::{InvalidRefReason, IssueCollector, ValidationIssue};

use crate::config::compile_time::accessibility::{MIN_FONT_SIZE_PX, MIN_LINE_HEIGHT, REM_BASE_PX};
use crate::config::runtime::PipelinePreferences;
use crate::logging::codes;
use crate::tree::TokenTree;
use crate::log_success;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOptions {
    pub check_references: bool,
    pub check_contrast: bool,
    pub check_numeric_constraints: bool,
    pub rem_base_px: f64,
    pub min_font_size_px: f64,
    pub min_line_height: f64,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_references: true,
            check_contrast: true,
            check_numeric_constraints: true,
            rem_base_px: REM_BASE_PX,
            min_font_size_px: MIN_FONT_SIZE_PX,
            min_line_height: MIN_LINE_HEIGHT,
        }
    }
}

impl ValidationOptions {
    pub fn from_preferences(preferences: &PipelinePreferences) -> Self {
        Self {
            check_contrast: preferences.check_contrast,
            check_numeric_constraints: preferences.check_numeric_constraints,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub tokens_checked: usize,
    pub references_checked: usize,
    pub contrast_pairs_checked: usize,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub stats: ValidationStats,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

pub fn validate(tree: &TokenTree, options: &ValidationOptions) -> ValidationReport {
    let mut collector = IssueCollector::default();
    let mut stats = ValidationStats::default();

    for (path, token) in tree.tokens() {
        stats.tokens_checked += 1;

        if options.check_references && references::check_reference(tree, &path, token, &mut collector) {
            stats.references_checked += 1;
        }

        if options.check_contrast {
            stats.contrast_pairs_checked += contrast::check_contrast(tree, &path, token, &mut collector);
        }

        if options.check_numeric_constraints {
            numeric::check_numeric(&path, token, options, &mut collector);
        }
    }

    let issues = collector.into_issues();
    log_success!(codes::success::VALIDATION_COMPLETE,
        "Validation completed",
        "tokens" => stats.tokens_checked,
        "issues" => issues.len()
    );

    ValidationReport { issues, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TokenPath;
    use serde_json::json;

    #[test]
    fn test_reference_and_contrast_failures_are_both_reported() {
        let tree = TokenTree::from_value(&json!({
            "basis": {
                "color-default": {
                    "$type": "color",
                    "$value": "#777777",
                    "$extensions": {
                        "nl.nldesignsystem.contrast-with": [{"color": "{basis.bg-default}", "expectedRatio": 4.5}]
                    }
                },
                "bg-default": {"$type": "color", "$value": "#ffffff"},
                "link": {"$type": "color", "$value": "{basis.nope}"}
            }
        }))
        .unwrap();

        let report = validate(&tree, &ValidationOptions::default());
        let codes: Vec<&str> = report.issues.iter().map(ValidationIssue::code).collect();
        assert_eq!(
            codes,
            vec!["INSUFFICIENT_CONTRAST", "INSUFFICIENT_CONTRAST", "INVALID_REF"]
        );
        assert_eq!(report.issues[2].path(), &TokenPath::from(["basis", "link"]));
        assert_eq!(report.stats.tokens_checked, 3);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_disabled_checks_are_skipped() {
        let tree = TokenTree::from_value(&json!({
            "size": {"$type": "fontSize", "$value": "10px"},
            "link": {"$type": "color", "$value": "{nope}"}
        }))
        .unwrap();

        let options = ValidationOptions {
            check_references: false,
            check_numeric_constraints: false,
            ..ValidationOptions::default()
        };
        assert!(validate(&tree, &options).is_clean());
        assert_eq!(validate(&tree, &ValidationOptions::default()).issues.len(), 2);
    }

    #[test]
    fn test_clean_tree() {
        let tree = TokenTree::from_value(&json!({
            "brand": {"size": {"$type": "dimension", "$value": {"value": 1, "unit": "rem"}}},
            "basis": {"font-size": {"$type": "dimension", "$value": "{size}"}}
        }))
        .unwrap();
        assert!(validate(&tree, &ValidationOptions::default()).is_clean());
    }
}
