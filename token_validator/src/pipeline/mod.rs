mod error;
mod info;
pub mod output;
mod result;
mod stats;
mod validation;

// Re-export public types
pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo};
pub use output::PipelineOutput;
pub use result::PipelineResult;
pub use stats::{PipelineSummary, StageStats};
pub use validation::validate_pipeline;

use crate::config::runtime::{FileProcessorPreferences, PipelinePreferences, RuntimeConfig};
use crate::config::AccessibilityConfig;
use crate::file_processor::FileProcessor;
use crate::logging::{self, codes};
use crate::tree::TokenTree;
use crate::validation::ValidationOptions;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything a pipeline run needs besides the document itself
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub preferences: PipelinePreferences,
    pub file_processor: FileProcessorPreferences,
    pub accessibility: AccessibilityConfig,
}

impl PipelineConfig {
    pub fn from_runtime(runtime: &RuntimeConfig) -> Self {
        Self {
            preferences: runtime.pipeline.clone(),
            file_processor: runtime.file_processor.clone(),
            accessibility: AccessibilityConfig::default(),
        }
    }

    /// Replace the accessibility tables with ones loaded from a TOML file
    pub fn with_accessibility_file(mut self, path: &Path) -> Result<Self, PipelineError> {
        self.accessibility = AccessibilityConfig::from_toml_file(path)?;
        Ok(self)
    }
}

/// Run every enabled stage over an in-memory document
/// (normalize -> strip metadata -> annotate -> resolve -> validate -> inline).
///
/// The document is copied into an owned tree before anything happens, so the
/// caller's value is never modified.
pub fn process_document(
    document: &Value,
    config: &PipelineConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let preferences = &config.preferences;

    let mut tree = TokenTree::from_value(document).map_err(|e| {
        crate::log_error!(e.error_code(), &e.to_string());
        e
    })?;

    crate::log_success!(codes::success::DOCUMENT_LOADED,
        "Token document loaded",
        "tokens" => tree.token_count()
    );

    let mut stages = StageStats::default();

    if preferences.normalize_legacy_values {
        let output = crate::normalization::normalize(&tree);
        tree = output.tree;
        stages.normalization = Some(output.stats);
    }

    if preferences.strip_metadata {
        let output = crate::metadata::strip_metadata(&tree);
        tree = output.tree;
        stages.metadata = Some(output.stats);
    }

    if preferences.annotate_accessibility {
        let output = crate::accessibility::annotate(&tree, &config.accessibility);
        tree = output.tree;
        stages.annotation = Some(output.stats);
    }

    if preferences.resolve_references {
        let output = crate::reference_resolution::resolve_references(&tree, &tree);
        tree = output.tree;
        stages.resolution = Some(output.stats);
    }

    let report = crate::validation::validate(&tree, &ValidationOptions::from_preferences(preferences));
    stages.validation = report.stats;

    if preferences.inline_references {
        let output = crate::reference_resolution::inline_references(&tree, &tree);
        tree = output.tree;
        stages.inlining = Some(output.stats);
    }

    let processing_duration = start_time.elapsed();
    let summary = PipelineSummary::new(
        tree.token_count(),
        &report.issues,
        stages,
        processing_duration,
    );

    Ok(PipelineResult {
        tree,
        issues: report.issues,
        summary,
        file_metadata: None,
        processing_duration,
    })
}

/// Load a token file and run it through the pipeline
pub fn process_file(file_path: &str, config: &PipelineConfig) -> Result<PipelineResult, PipelineError> {
    process_file_with_id(file_path, 0, config)
}

/// Like `process_file`, with the id used to tag the file's log events
pub fn process_file_with_id(
    file_path: &str,
    file_id: usize,
    config: &PipelineConfig,
) -> Result<PipelineResult, PipelineError> {
    logging::with_file_context(PathBuf::from(file_path), file_id, || {
        crate::log_info!("Starting token pipeline", "file" => file_path);

        let file_result =
            FileProcessor::from_preferences(&config.file_processor).process_file(file_path)?;

        let mut result = process_document(&file_result.document, config)?;
        result.file_metadata = Some(file_result.metadata);
        result.processing_duration += file_result.processing_duration;

        result.log_success(file_path);
        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::extensions;
    use crate::utils::TokenPath;
    use crate::validation::{InvalidRefReason, ValidationIssue};
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn run(document: Value) -> PipelineResult {
        process_document(&document, &PipelineConfig::default()).unwrap()
    }

    fn codes_of(result: &PipelineResult) -> Vec<&'static str> {
        result.issues.iter().map(ValidationIssue::code).collect()
    }

    #[test]
    fn test_validate_pipeline() {
        let _ = crate::logging::init_global_logging();
        assert!(validate_pipeline().is_ok());
    }

    #[test]
    fn test_input_document_is_not_mutated() {
        let document = json!({
            "brand": {"red": {"$type": "color", "$value": "#ff0000", "filePath": "brand.json"}},
            "basis": {"danger": {"$type": "color", "$value": "{brand.red}"}}
        });
        let before = document.clone();

        let result = run(document.clone());
        assert_eq!(document, before);
        assert_ne!(result.tree.to_value(), before);
    }

    #[test]
    fn test_color_used_as_font_family_gives_one_invalid_ref() {
        let result = run(json!({
            "brand": {"primary": {"$type": "color", "$value": "#ff0000"}},
            "basis": {"heading": {"font-family": {"$type": "fontFamily", "$value": "{brand.primary}"}}}
        }));

        assert_eq!(result.issues.len(), 1);
        assert_matches!(
            &result.issues[0],
            ValidationIssue::InvalidRef { path, reason: InvalidRefReason::TypeMismatch, expected_type, actual_type, .. }
                if path == &TokenPath::from(["basis", "heading", "font-family"])
                    && expected_type.as_deref() == Some("fontFamily")
                    && actual_type.as_deref() == Some("color")
        );
    }

    #[test]
    fn test_font_family_used_as_color_gives_one_invalid_ref() {
        let result = run(json!({
            "brand": {"font": {"$type": "fontFamily", "$value": "Inter, sans-serif"}},
            "basis": {"text": {"color": {"$type": "color", "$value": "{brand.font}"}}}
        }));

        assert_eq!(result.issues.len(), 1);
        assert_matches!(
            &result.issues[0],
            ValidationIssue::InvalidRef { path, reason: InvalidRefReason::TypeMismatch, expected_type, actual_type, .. }
                if path == &TokenPath::from(["basis", "text", "color"])
                    && expected_type.as_deref() == Some("color")
                    && actual_type.as_deref() == Some("fontFamily")
        );
    }

    #[test]
    fn test_reference_and_contrast_failures_are_both_reported() {
        let result = run(json!({
            "basis": {
                "color-default": {"$type": "color", "$value": "#777777"},
                "bg-default": {"$type": "color", "$value": "#ffffff"},
                "link": {"$type": "color", "$value": "{basis.missing}"}
            }
        }));

        assert_eq!(
            codes_of(&result),
            vec!["INSUFFICIENT_CONTRAST", "INSUFFICIENT_CONTRAST", "INVALID_REF"]
        );
        assert_eq!(result.summary.issues_by_code.get("INSUFFICIENT_CONTRAST"), Some(&2));
        assert!(result.has_issues());
    }

    #[test]
    fn test_contrast_just_below_minimum_is_reported() {
        let result = run(json!({
            "basis": {
                "color-default": {"$type": "color", "$value": "#158a00"},
                "bg-default": {"$type": "color", "$value": "#ffffff"}
            }
        }));

        assert_eq!(
            codes_of(&result),
            vec!["INSUFFICIENT_CONTRAST", "INSUFFICIENT_CONTRAST"]
        );
    }

    #[test]
    fn test_malformed_dimensions_are_reported() {
        let result = run(json!({
            "brand": {
                "space": {"$type": "dimension", "$value": "auto"},
                "gap": {"$type": "spacing", "$value": true},
                "text": {"$type": "fontSizes", "$value": "large"}
            }
        }));

        assert_eq!(
            codes_of(&result),
            vec!["UNEXPECTED_UNIT", "UNEXPECTED_UNIT", "UNEXPECTED_UNIT"]
        );
    }

    #[test]
    fn test_every_issue_is_returned_for_large_documents() {
        let mut group = serde_json::Map::new();
        for i in 0..10_005 {
            group.insert(
                format!("t{i}"),
                json!({"$type": "color", "$value": "{nope}"}),
            );
        }

        let result = run(json!({ "brand": group }));
        assert_eq!(result.issues.len(), 10_005);
        assert_eq!(result.summary.issue_count, 10_005);
    }

    #[test]
    fn test_small_legacy_font_sizes() {
        let result = run(json!({
            "brand": {
                "text": {
                    "sm": {"$type": "fontSizes", "$value": "10px"},
                    "md": {"$type": "fontSizes", "$value": "16px"},
                    "lg": {"$type": "fontSize", "$value": "1rem"}
                }
            }
        }));

        assert_eq!(result.issues.len(), 1);
        assert_matches!(
            &result.issues[0],
            ValidationIssue::FontSizeTooSmall { path, actual, minimum }
                if path == &TokenPath::from(["brand", "text", "sm"]) && *actual == 10.0 && *minimum == 16.0
        );

        let sm = result.tree.get_token(&TokenPath::from(["brand", "text", "sm"])).unwrap();
        assert_eq!(sm.type_name(), Some("dimension"));
        assert_eq!(sm.subtype(), Some("font-size"));
    }

    #[test]
    fn test_metadata_is_stripped_from_tokens_only() {
        let result = run(json!({
            "$themes": ["light"],
            "brand": {
                "note": "not a token",
                "size": {
                    "$type": "dimension",
                    "$value": "4px",
                    "$extensions": {"com.example.owner": "design"},
                    "filePath": "brand.json",
                    "isSource": true,
                    "original": {"value": "4px"}
                }
            }
        }));

        let tree = result.tree.to_value();
        assert_eq!(tree["$themes"], json!(["light"]));
        assert_eq!(tree["brand"]["note"], "not a token");

        let size = tree["brand"]["size"].as_object().unwrap();
        assert!(!size.contains_key("filePath"));
        assert!(!size.contains_key("isSource"));
        assert!(!size.contains_key("original"));
        assert_eq!(size["$extensions"]["com.example.owner"], "design");
    }

    #[test]
    fn test_resolution_annotates_without_changing_value() {
        let result = run(json!({
            "brand": {"red": {"$type": "color", "$value": "#ff0000"}},
            "basis": {"danger": {"$type": "color", "$value": "{red}"}}
        }));

        let danger = result.tree.get_token(&TokenPath::from(["basis", "danger"])).unwrap();
        assert_eq!(danger.value(), &json!("{red}"));
        assert_eq!(
            danger.extension(extensions::RESOLVED_AS),
            Some(&json!({"colorSpace": "srgb", "components": [1, 0, 0], "alpha": 1}))
        );
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_inlining_is_opt_in() {
        let mut config = PipelineConfig::default();
        config.preferences.inline_references = true;

        let result = process_document(
            &json!({
                "brand": {"space": {"$type": "dimension", "$value": "8px"}},
                "basis": {"gap": {"$type": "dimension", "$value": "{brand.space}"}}
            }),
            &config,
        )
        .unwrap();

        let gap = result.tree.get_token(&TokenPath::from(["basis", "gap"])).unwrap();
        assert_eq!(gap.value(), &json!({"value": 8, "unit": "px"}));
        assert_eq!(gap.extension(extensions::RESOLVED_FROM), Some(&json!("{brand.space}")));
        assert!(result.summary.stages.inlining.is_some());
    }

    #[test]
    fn test_disabled_stages_are_skipped() {
        let mut config = PipelineConfig::default();
        config.preferences.strip_metadata = false;
        config.preferences.normalize_legacy_values = false;

        let result = process_document(
            &json!({"size": {"$type": "dimension", "$value": "4px", "filePath": "a.json"}}),
            &config,
        )
        .unwrap();

        let tree = result.tree.to_value();
        assert_eq!(tree["size"]["filePath"], "a.json");
        assert_eq!(tree["size"]["$value"], "4px");
        assert!(result.summary.stages.normalization.is_none());
        assert!(result.summary.stages.metadata.is_none());
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let error = process_document(&json!(["not", "tokens"]), &PipelineConfig::default())
            .unwrap_err();
        assert_matches!(error, PipelineError::Document(_));
        assert_eq!(error.error_code().as_str(), "E021");
    }

    #[test]
    fn test_process_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tokens.json");
        fs::write(
            &file_path,
            r#"{"basis": {"text": {"font-size": {"$type": "dimension", "$value": "12px"}}}}"#,
        )
        .unwrap();

        let result = process_file(file_path.to_str().unwrap(), &PipelineConfig::default()).unwrap();
        assert!(result.file_metadata.is_some());
        assert_eq!(codes_of(&result), vec!["FONT_SIZE_TOO_SMALL"]);

        let output = serde_json::to_value(result.to_output()).unwrap();
        assert!(output["generatedAt"].is_string());
        assert!(output["source"].as_str().unwrap().ends_with("tokens.json"));
        assert_eq!(output["issues"][0]["code"], "FONT_SIZE_TOO_SMALL");
        assert_eq!(output["issues"][0]["path"], json!(["basis", "text", "font-size"]));
        assert_eq!(output["summary"]["issueCount"], 1);
    }

    #[test]
    fn test_process_file_invalid_json() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("broken.json");
        fs::write(&file_path, "{ not json").unwrap();

        assert_matches!(
            process_file(file_path.to_str().unwrap(), &PipelineConfig::default()),
            Err(PipelineError::FileProcessing(_))
        );
    }

    #[test]
    fn test_accessibility_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("a11y.toml");
        fs::write(&config_path, "not = [valid").unwrap();

        assert_matches!(
            PipelineConfig::default().with_accessibility_file(&config_path),
            Err(PipelineError::AccessibilityConfig(_))
        );
    }
}
