//! Legacy Normalization
//!
//! Rewrites deprecated type names (`fontSizes`, `lineHeights`, ...) and
//! legacy value strings into canonical `$type`/`$value` pairs, marking the
//! legacy kind in `nl.nldesignsystem.token-subtype`. Reference values are
//! kept; their type follows the chain's target when that is a type the
//! token's own kind could normalize to.

pub mod legacy;

pub use legacy::{Conversion, ConversionFailure, LegacyKind};

use crate::logging::codes;
use crate::reference_resolution::follow;
use crate::tree::{extensions, Token, TokenReference, TokenTree};
use crate::utils::TokenPath;
use crate::{log_success, log_warning};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationStats {
    pub tokens_visited: usize,
    pub values_converted: usize,
    pub types_renamed: usize,
    pub subtypes_tagged: usize,
    pub references_retyped: usize,
    pub unparseable_colors: usize,
    pub unconverted: usize,
}

#[derive(Debug, Clone)]
pub struct NormalizationOutput {
    pub tree: TokenTree,
    pub stats: NormalizationStats,
}

pub fn normalize(tree: &TokenTree) -> NormalizationOutput {
    let mut stats = NormalizationStats::default();
    let mut normalized = tree.clone();

    normalized.for_each_token_mut(|path, token| normalize_token(tree, path, token, &mut stats));

    log_success!(codes::success::NORMALIZATION_COMPLETE,
        "Legacy normalization completed",
        "tokens" => stats.tokens_visited,
        "converted" => stats.values_converted,
        "renamed" => stats.types_renamed,
        "unconverted" => stats.unconverted
    );

    NormalizationOutput {
        tree: normalized,
        stats,
    }
}

fn normalize_token(
    root: &TokenTree,
    path: &TokenPath,
    token: &mut Token,
    stats: &mut NormalizationStats,
) {
    stats.tokens_visited += 1;

    let Some(original_type) = token.type_name().map(str::to_string) else {
        return;
    };
    let Some(kind) = LegacyKind::from_type(&original_type) else {
        return;
    };

    let (token_type, reshaped) = match token.reference() {
        Some(reference) => {
            let token_type = reference_type(root, path, &reference, kind);
            if token_type != original_type {
                stats.references_retyped += 1;
            }
            (token_type, false)
        }
        None => {
            let conversion = legacy::convert(kind, token.value());
            if let Some(failure) = &conversion.failure {
                report_failure(path, failure, stats);
            }
            let reshaped = match conversion.value {
                Some(value) => {
                    token.set_value(value);
                    stats.values_converted += 1;
                    true
                }
                None => false,
            };
            (conversion.token_type, reshaped)
        }
    };

    let renamed = token_type != original_type;
    if renamed {
        token.set_type(token_type);
        stats.types_renamed += 1;
    }

    if renamed || reshaped {
        if let Some(subtype) = kind.subtype(renamed) {
            if token.extension(extensions::TOKEN_SUBTYPE).is_none() {
                token.set_extension(extensions::TOKEN_SUBTYPE, Value::from(subtype));
                stats.subtypes_tagged += 1;
            }
        }
    }
}

/// Type for a reference-valued token of `kind`
fn reference_type(
    root: &TokenTree,
    path: &TokenPath,
    reference: &TokenReference,
    kind: LegacyKind,
) -> &'static str {
    let end = follow(root, path, reference);
    let target_type = end.concrete().and_then(|(_, target)| {
        let name = target.type_name()?;
        Some(match LegacyKind::from_type(name) {
            Some(target_kind) => legacy::canonical_type_of(target_kind, target.value()),
            None => name,
        })
    });

    target_type
        .and_then(|target| kind.canonical_types().iter().find(|t| **t == target))
        .copied()
        .unwrap_or_else(|| kind.default_type())
}

fn report_failure(path: &TokenPath, failure: &ConversionFailure, stats: &mut NormalizationStats) {
    match failure {
        ConversionFailure::UnparseableColor(input) => {
            stats.unparseable_colors += 1;
            log_warning!(codes::codecs::UNPARSEABLE_COLOR,
                "Unparseable color replaced by opaque black",
                path = path.clone(),
                "value" => input
            );
        }
        ConversionFailure::Codec(error) => {
            stats.unconverted += 1;
            log_warning!(error.error_code(),
                &error.to_string(),
                path = path.clone()
            );
        }
        ConversionFailure::LineHeightKept(value) => {
            stats.unconverted += 1;
            log_warning!(codes::normalization::LEGACY_VALUE_NOT_CONVERTED,
                "Line height is not a unitless number, kept as lineHeight",
                path = path.clone(),
                "value" => value
            );
        }
    }
}
