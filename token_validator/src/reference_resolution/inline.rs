//! Literal substitution of references
//!
//! The opt-in counterpart of annotation: each resolvable reference `$value`
//! is replaced by the concrete value and the original string is kept under
//! `nl.nldesignsystem.resolved-from`.

use super::{InlineOutput, InlineStats, Resolver};
use crate::logging::codes;
use crate::tree::{extensions, TokenTree};
use crate::{log_debug, log_success};
use serde_json::Value;

pub fn inline_references(tree: &TokenTree, root: &TokenTree) -> InlineOutput {
    let mut resolver = Resolver::new(root);
    let mut stats = InlineStats::default();
    let mut inlined = tree.clone();

    inlined.for_each_token_mut(|path, token| {
        let Some(reference) = token.reference() else {
            return;
        };

        match resolver.resolve(path, &reference) {
            Ok(value) => {
                token.set_value(value);
                token.remove_extension(extensions::RESOLVED_AS);
                token.set_extension(extensions::RESOLVED_FROM, Value::from(reference.to_string()));
                stats.inlined += 1;
            }
            Err(reason) => {
                stats.unresolved += 1;
                log_debug!("Reference kept as is",
                    "token" => path,
                    "reference" => reference,
                    "reason" => reason.as_str()
                );
            }
        }
    });

    log_success!(codes::success::REFERENCES_INLINED,
        "References inlined",
        "inlined" => stats.inlined,
        "unresolved" => stats.unresolved
    );

    InlineOutput {
        tree: inlined,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TokenPath;
    use serde_json::json;

    #[test]
    fn test_inline_replaces_value_and_records_origin() {
        let tree = TokenTree::from_value(&json!({
            "brand": {"space": {"md": {"$type": "dimension", "$value": {"value": 16, "unit": "px"}}}},
            "basis": {
                "space": {
                    "block": {"$type": "dimension", "$value": "{space.md}"},
                    "broken": {"$type": "dimension", "$value": "{space.xl}"}
                }
            }
        }))
        .unwrap();

        let output = inline_references(&tree, &tree);
        let block = output
            .tree
            .get_token(&TokenPath::from(["basis", "space", "block"]))
            .unwrap();

        assert_eq!(block.value(), &json!({"value": 16, "unit": "px"}));
        assert_eq!(
            block.extension(extensions::RESOLVED_FROM),
            Some(&json!("{space.md}"))
        );
        assert_eq!(output.stats, InlineStats { inlined: 1, unresolved: 1 });

        let broken = output
            .tree
            .get_token(&TokenPath::from(["basis", "space", "broken"]))
            .unwrap();
        assert_eq!(broken.value(), &json!("{space.xl}"));
    }
}
