//! Accessibility annotation
//!
//! Adds contrast pairs and color-scale positions to token `$extensions`
//! from an injected [`AccessibilityConfig`]. Nothing is checked here; the
//! validator reads these annotations back.

pub mod contrast;
pub mod scale;
pub mod wcag;

pub use contrast::ContrastEntry;

use crate::config::AccessibilityConfig;
use crate::logging::codes;
use crate::tree::{extensions, TokenTree};
use crate::{log_success, log_warning};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationStats {
    pub contrast_pairs_added: usize,
    pub scale_positions_set: usize,
    pub malformed_annotations_replaced: usize,
}

#[derive(Debug, Clone)]
pub struct AnnotationOutput {
    pub tree: TokenTree,
    pub stats: AnnotationStats,
}

pub fn annotate(tree: &TokenTree, config: &AccessibilityConfig) -> AnnotationOutput {
    let mut stats = AnnotationStats::default();
    let mut annotated = tree.clone();

    annotated.for_each_token_mut(|path, token| {
        let pairs = contrast::pairs_for(tree, path, config);
        if !pairs.is_empty() {
            match contrast::append(token, &pairs) {
                Ok(added) => stats.contrast_pairs_added += added,
                Err(added) => {
                    stats.contrast_pairs_added += added;
                    stats.malformed_annotations_replaced += 1;
                    log_warning!(codes::accessibility::MALFORMED_CONTRAST_ANNOTATION,
                        "Existing contrast annotation is not an array and was replaced",
                        path = path.clone()
                    );
                }
            }
        }

        if let Some(position) = scale::position_for(path, token, config) {
            token.set_extension(extensions::COLOR_SCALE_POSITION, Value::from(position));
            stats.scale_positions_set += 1;
        }
    });

    log_success!(codes::success::ANNOTATION_COMPLETE,
        "Accessibility annotation completed",
        "contrast_pairs" => stats.contrast_pairs_added,
        "scale_positions" => stats.scale_positions_set
    );

    AnnotationOutput {
        tree: annotated,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContrastRule;
    use crate::utils::TokenPath;
    use serde_json::json;

    fn theme() -> TokenTree {
        TokenTree::from_value(&json!({
            "basis": {
                "color": {
                    "default": {
                        "bg-default": {"$type": "color", "$value": "#ffffff"},
                        "color-default": {"$type": "color", "$value": "#333333"},
                        "color-subtle": {"$type": "color", "$value": "#666666"}
                    },
                    "disabled": {
                        "bg-default": {"$type": "color", "$value": "#eeeeee"},
                        "color-default": {"$type": "color", "$value": "#cccccc"}
                    }
                }
            }
        }))
        .unwrap()
    }

    fn extension(tree: &TokenTree, path: [&str; 4], key: &str) -> Option<Value> {
        tree.get_token(&TokenPath::from(path))
            .and_then(|t| t.extension(key))
            .cloned()
    }

    #[test]
    fn test_pairs_foreground_with_sibling_background() {
        let output = annotate(&theme(), &AccessibilityConfig::default());

        assert_eq!(
            extension(&output.tree, ["basis", "color", "default", "color-default"], extensions::CONTRAST_WITH),
            Some(json!([{"color": "{basis.color.default.bg-default}", "expectedRatio": 4.5}]))
        );
        // No bg-subtle sibling
        assert_eq!(
            extension(&output.tree, ["basis", "color", "default", "color-subtle"], extensions::CONTRAST_WITH),
            None
        );
        assert_eq!(output.stats.contrast_pairs_added, 1);
    }

    #[test]
    fn test_exempt_groups_are_skipped() {
        let output = annotate(&theme(), &AccessibilityConfig::default());
        assert_eq!(
            extension(&output.tree, ["basis", "color", "disabled", "color-default"], extensions::CONTRAST_WITH),
            None
        );
        // Scale positions still apply inside exempt groups
        assert_eq!(
            extension(&output.tree, ["basis", "color", "disabled", "bg-default"], extensions::COLOR_SCALE_POSITION),
            Some(json!(3))
        );
    }

    #[test]
    fn test_scale_positions() {
        let output = annotate(&theme(), &AccessibilityConfig::default());
        assert_eq!(
            extension(&output.tree, ["basis", "color", "default", "color-default"], extensions::COLOR_SCALE_POSITION),
            Some(json!(11))
        );
        assert_eq!(
            extension(&output.tree, ["basis", "color", "default", "color-subtle"], extensions::COLOR_SCALE_POSITION),
            Some(json!(10))
        );
    }

    #[test]
    fn test_annotation_is_idempotent() {
        let config = AccessibilityConfig::default();
        let once = annotate(&theme(), &config).tree;
        let twice = annotate(&once, &config);
        assert_eq!(twice.tree, once);
        assert_eq!(twice.stats.contrast_pairs_added, 0);
    }

    #[test]
    fn test_custom_rules() {
        let config = AccessibilityConfig {
            contrast_rules: vec![ContrastRule::new("color-subtle", "bg-default", 3.0)],
            ..AccessibilityConfig::default()
        };
        let output = annotate(&theme(), &config);
        assert_eq!(
            extension(&output.tree, ["basis", "color", "default", "color-subtle"], extensions::CONTRAST_WITH),
            Some(json!([{"color": "{basis.color.default.bg-default}", "expectedRatio": 3}]))
        );
        assert_eq!(
            extension(&output.tree, ["basis", "color", "default", "color-default"], extensions::CONTRAST_WITH),
            None
        );
    }
}
