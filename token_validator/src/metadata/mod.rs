//! Metadata stripping
//!
//! Tokens keep only the standard properties; tool bookkeeping such as
//! `filePath`, `isSource` or `original` is dropped. Groups and anything else
//! that is not token-shaped keep every key.

use crate::logging::codes;
use crate::log_success;
use crate::tree::TokenTree;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripStats {
    pub tokens_visited: usize,
    pub tokens_stripped: usize,
    pub properties_removed: usize,
}

#[derive(Debug, Clone)]
pub struct StripOutput {
    pub tree: TokenTree,
    pub stats: StripStats,
}

pub fn strip_metadata(tree: &TokenTree) -> StripOutput {
    let mut stats = StripStats::default();
    let mut stripped = tree.clone();

    stripped.for_each_token_mut(|_, token| {
        stats.tokens_visited += 1;
        let removed = token.retain_standard_properties();
        if removed > 0 {
            stats.tokens_stripped += 1;
            stats.properties_removed += removed;
        }
    });

    log_success!(codes::success::METADATA_STRIPPED,
        "Token metadata stripped",
        "tokens" => stats.tokens_visited,
        "properties_removed" => stats.properties_removed
    );

    StripOutput {
        tree: stripped,
        stats,
    }
}
