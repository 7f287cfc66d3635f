//! Contrast checks over `contrast-with` annotations

use super::issues::{IssueCollector, ValidationIssue};
use crate::accessibility::contrast::{self, ContrastEntry};
use crate::accessibility::wcag::color_contrast;
use crate::codecs::ColorValue;
use crate::logging::codes;
use crate::reference_resolution::lookup_reference;
use crate::tree::{Token, TokenReference, TokenTree};
use crate::utils::{round_to, TokenPath};
use crate::{log_debug, log_warning};
use serde_json::Value;

/// Check every contrast entry on `token`; returns how many pairs were measured
pub fn check_contrast(
    tree: &TokenTree,
    path: &TokenPath,
    token: &Token,
    issues: &mut IssueCollector,
) -> usize {
    let entries = contrast::entries(token);
    if entries.is_empty() {
        return 0;
    }

    let Some(foreground) = concrete_color(token.effective_value()) else {
        log_debug!("Contrast skipped, foreground is not a concrete color", "token" => path);
        return 0;
    };

    let mut measured = 0;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(raw) => {
                log_warning!(codes::accessibility::MALFORMED_CONTRAST_ANNOTATION,
                    "Contrast entry ignored, expected {\"color\", \"expectedRatio\"}",
                    path = path.clone(),
                    "entry" => raw
                );
                continue;
            }
        };

        let Some((background_path, background)) = background_of(tree, &entry) else {
            log_debug!("Contrast skipped, background is not a concrete color",
                "token" => path,
                "background" => entry.color
            );
            continue;
        };
        measured += 1;

        let ratio = color_contrast(&foreground, &background);
        if ratio >= entry.expected_ratio {
            continue;
        }
        let actual = round_to(ratio, 2);

        let mut tokens = vec![path.clone()];
        tokens.extend(background_path.iter().cloned());

        issues.push(ValidationIssue::InsufficientContrast {
            path: path.clone(),
            tokens: tokens.clone(),
            actual,
            minimum: entry.expected_ratio,
        });
        if let Some(background_path) = background_path {
            issues.push(ValidationIssue::InsufficientContrast {
                path: background_path,
                tokens,
                actual,
                minimum: entry.expected_ratio,
            });
        }
    }

    measured
}

/// The background color of an entry, with the token it came from when the
/// entry is a reference
fn background_of(
    tree: &TokenTree,
    entry: &ContrastEntry,
) -> Option<(Option<TokenPath>, ColorValue)> {
    match TokenReference::from_value(&entry.color) {
        Some(reference) => {
            let (path, node) = lookup_reference(tree, &reference)?;
            let color = concrete_color(node.as_token()?.effective_value())?;
            Some((Some(path), color))
        }
        None => concrete_color(&entry.color).map(|color| (None, color)),
    }
}

/// A color that is neither a bare reference nor unparseable
fn concrete_color(value: &Value) -> Option<ColorValue> {
    if TokenReference::from_value(value).is_some() {
        return None;
    }
    ColorValue::from_json(value)
}
