//! Reference lookup as a graph function over the token tree
//!
//! A reference resolves against the root: the literal path first, then the
//! same path under `brand`. Chains are followed with a visited set so loops
//! and runaway chains terminate.

use crate::config::compile_time::references::MAX_REFERENCE_DEPTH;
use crate::tree::{Token, TokenNode, TokenReference, TokenTree};
use crate::utils::TokenPath;
use std::collections::HashSet;

/// Group searched when the literal path does not exist
pub const FALLBACK_ROOT: &str = "brand";

/// Find the node a reference points at, with the path it was found under
pub fn lookup_reference<'a>(
    root: &'a TokenTree,
    reference: &TokenReference,
) -> Option<(TokenPath, &'a TokenNode)> {
    let literal = reference.path();
    if let Some(node) = root.get(literal) {
        return Some((literal.clone(), node));
    }

    let prefixed = literal.prefixed(FALLBACK_ROOT);
    root.get(&prefixed).map(|node| (prefixed, node))
}

/// Where a reference chain ends
#[derive(Debug, Clone, PartialEq)]
pub enum ChainEnd<'a> {
    /// First token in the chain whose `$value` is not a reference
    Concrete { path: TokenPath, token: &'a Token },
    /// `from` points at a path that does not exist
    Missing { from: TokenPath, reference: TokenReference },
    /// `from` points at a group or plain value
    NotAToken { from: TokenPath, target: TokenPath },
    /// The chain came back to `revisited`
    Circular { revisited: TokenPath },
    TooDeep,
}

impl ChainEnd<'_> {
    pub fn concrete(&self) -> Option<(&TokenPath, &Token)> {
        match self {
            Self::Concrete { path, token } => Some((path, *token)),
            _ => None,
        }
    }
}

/// Follow `reference`, held by the token at `start`, to the end of its chain
pub fn follow<'a>(
    root: &'a TokenTree,
    start: &TokenPath,
    reference: &TokenReference,
) -> ChainEnd<'a> {
    let mut visited: HashSet<TokenPath> = HashSet::new();
    visited.insert(start.clone());

    let mut from = start.clone();
    let mut current = reference.clone();
    let mut hops = 0;

    loop {
        hops += 1;
        if hops > MAX_REFERENCE_DEPTH {
            return ChainEnd::TooDeep;
        }

        let Some((path, node)) = lookup_reference(root, &current) else {
            return ChainEnd::Missing {
                from,
                reference: current,
            };
        };

        let Some(token) = node.as_token() else {
            return ChainEnd::NotAToken { from, target: path };
        };

        if !visited.insert(path.clone()) {
            return ChainEnd::Circular { revisited: path };
        }

        match token.reference() {
            Some(next) => {
                from = path;
                current = next;
            }
            None => return ChainEnd::Concrete { path, token },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn tree() -> TokenTree {
        TokenTree::from_value(&json!({
            "basis": {
                "color": {
                    "a": {"$type": "color", "$value": "{basis.color.b}"},
                    "b": {"$type": "color", "$value": "{color.primary}"},
                    "loop-1": {"$type": "color", "$value": "{basis.color.loop-2}"},
                    "loop-2": {"$type": "color", "$value": "{basis.color.loop-1}"},
                    "outer": {"$type": "color", "$value": "{basis.color.loop-1}"},
                    "dangling": {"$type": "color", "$value": "{basis.color.nope}"},
                    "group-ref": {"$type": "color", "$value": "{basis.color}"}
                }
            },
            "brand": {
                "color": {
                    "primary": {"$type": "color", "$value": "#0055aa"}
                }
            }
        }))
        .unwrap()
    }

    fn reference(path: &str) -> TokenReference {
        TokenReference::parse(path).unwrap()
    }

    #[test]
    fn test_lookup_literal_then_brand() {
        let tree = tree();
        let (path, node) = lookup_reference(&tree, &reference("{color.primary}")).unwrap();
        assert_eq!(path, TokenPath::from(["brand", "color", "primary"]));
        assert!(node.as_token().is_some());

        let (path, _) = lookup_reference(&tree, &reference("{brand.color.primary}")).unwrap();
        assert_eq!(path, TokenPath::from(["brand", "color", "primary"]));

        assert!(lookup_reference(&tree, &reference("{color.secondary}")).is_none());
    }

    #[test]
    fn test_follow_chain_to_concrete() {
        let tree = tree();
        let start = TokenPath::from(["basis", "color", "a"]);
        let end = follow(&tree, &start, &reference("{basis.color.b}"));
        let (path, token) = end.concrete().unwrap();
        assert_eq!(path, &TokenPath::from(["brand", "color", "primary"]));
        assert_eq!(token.value(), &json!("#0055aa"));
    }

    #[test]
    fn test_follow_detects_loops() {
        let tree = tree();
        let start = TokenPath::from(["basis", "color", "loop-1"]);
        assert_matches!(
            follow(&tree, &start, &reference("{basis.color.loop-2}")),
            ChainEnd::Circular { revisited } if revisited == start
        );

        let outer = TokenPath::from(["basis", "color", "outer"]);
        assert_matches!(
            follow(&tree, &outer, &reference("{basis.color.loop-1}")),
            ChainEnd::Circular { revisited } if revisited != outer
        );
    }

    #[test]
    fn test_follow_reports_where_chain_breaks() {
        let tree = tree();
        let start = TokenPath::from(["basis", "color", "dangling"]);
        assert_matches!(
            follow(&tree, &start, &reference("{basis.color.nope}")),
            ChainEnd::Missing { from, .. } if from == start
        );

        let start = TokenPath::from(["basis", "color", "group-ref"]);
        assert_matches!(
            follow(&tree, &start, &reference("{basis.color}")),
            ChainEnd::NotAToken { .. }
        );
    }

    #[test]
    fn test_follow_depth_limit() {
        let mut group = serde_json::Map::new();
        for i in 0..=MAX_REFERENCE_DEPTH + 1 {
            group.insert(
                format!("t{i}"),
                json!({"$type": "number", "$value": format!("{{chain.t{}}}", i + 1)}),
            );
        }
        group.insert(
            format!("t{}", MAX_REFERENCE_DEPTH + 2),
            json!({"$type": "number", "$value": 1}),
        );
        let tree = TokenTree::from_value(&json!({ "chain": group })).unwrap();

        assert_eq!(
            follow(&tree, &TokenPath::from(["chain", "t0"]), &reference("{chain.t1}")),
            ChainEnd::TooDeep
        );
    }
}
