//! Reference Resolution
//!
//! Annotates every reference-valued token with the concrete value at the end
//! of its chain (`$extensions["nl.nldesignsystem.resolved-as"]`). `$value` is
//! never altered and nothing is diagnosed here; unresolvable references just
//! stay unannotated for the validator to report.

use crate::config::compile_time::references::MAX_REFERENCE_DEPTH;
use crate::logging::codes;
use crate::tree::{extensions, TokenReference, TokenTree};
use crate::utils::TokenPath;
use crate::{log_debug, log_success};
use serde_json::Value;
use std::collections::HashMap;

pub mod inline;
pub mod lookup;
pub mod types;

pub use inline::inline_references;
pub use lookup::{follow, lookup_reference, ChainEnd};
pub use types::{
    InlineOutput, InlineStats, ResolutionOutput, ResolutionState, ResolutionStats,
    UnresolvedReason,
};

/// Annotate the references in `tree`, looking targets up in `root`
pub fn resolve_references(tree: &TokenTree, root: &TokenTree) -> ResolutionOutput {
    let mut resolver = Resolver::new(root);
    let mut stats = ResolutionStats::default();
    let mut resolved = tree.clone();

    resolved.for_each_token_mut(|path, token| {
        let Some(reference) = token.reference() else {
            return;
        };
        stats.references_found += 1;

        match resolver.resolve(path, &reference) {
            Ok(value) => {
                token.set_extension(extensions::RESOLVED_AS, value);
                stats.resolved += 1;
            }
            Err(reason) => {
                token.remove_extension(extensions::RESOLVED_AS);
                stats.record_failure(reason);
                log_debug!("Reference left unresolved",
                    "token" => path,
                    "reference" => reference,
                    "reason" => reason.as_str()
                );
            }
        }
    });

    log_success!(codes::success::REFERENCE_RESOLUTION_COMPLETE,
        "Reference resolution completed",
        "references" => stats.references_found,
        "resolved" => stats.resolved,
        "unresolved" => stats.unresolved()
    );

    ResolutionOutput {
        tree: resolved,
        stats,
    }
}

enum Failure {
    Unresolved(UnresolvedReason),
    /// Recursion stopped at the depth limit. Only the token that started the
    /// walk is known to be too deep, so nothing in between is memoised.
    Cutoff,
}

type Step = Result<(Value, usize), Failure>;

/// Memoised chain walker over one root
pub struct Resolver<'a> {
    root: &'a TokenTree,
    memo: HashMap<TokenPath, ResolutionState>,
}

impl<'a> Resolver<'a> {
    pub fn new(root: &'a TokenTree) -> Self {
        Self {
            root,
            memo: HashMap::new(),
        }
    }

    pub fn state(&self, path: &TokenPath) -> Option<&ResolutionState> {
        self.memo.get(path)
    }

    /// Concrete value for `reference`, held by the token at `start`
    pub fn resolve(
        &mut self,
        start: &TokenPath,
        reference: &TokenReference,
    ) -> Result<Value, UnresolvedReason> {
        if let Some(state) = self.memo.get(start) {
            match state {
                ResolutionState::Resolved { value, .. } => return Ok(value.clone()),
                ResolutionState::Unresolved(reason) => return Err(*reason),
                ResolutionState::Resolving => return Err(UnresolvedReason::Circular),
            }
        }

        self.memo.insert(start.clone(), ResolutionState::Resolving);
        let outcome = self.step(reference, 1).map_err(|failure| match failure {
            Failure::Unresolved(reason) => reason,
            Failure::Cutoff => UnresolvedReason::TooDeep,
        });

        let (state, result) = match outcome {
            Ok((_, hops)) if hops > MAX_REFERENCE_DEPTH => (
                ResolutionState::Unresolved(UnresolvedReason::TooDeep),
                Err(UnresolvedReason::TooDeep),
            ),
            Ok((value, hops)) => (
                ResolutionState::Resolved {
                    value: value.clone(),
                    hops,
                },
                Ok(value),
            ),
            Err(reason) => (ResolutionState::Unresolved(reason), Err(reason)),
        };
        self.memo.insert(start.clone(), state);
        result
    }

    /// Take hop number `hop` of a chain
    fn step(&mut self, reference: &TokenReference, hop: usize) -> Step {
        if hop > MAX_REFERENCE_DEPTH {
            return Err(Failure::Cutoff);
        }

        let root = self.root;
        match lookup_reference(root, reference) {
            None => Err(Failure::Unresolved(UnresolvedReason::Missing)),
            Some((_, node)) if node.as_token().is_none() => {
                Err(Failure::Unresolved(UnresolvedReason::NotAToken))
            }
            Some((target, _)) => self
                .visit(&target, hop)
                .map(|(value, hops)| (value, hops + 1)),
        }
    }

    fn visit(&mut self, path: &TokenPath, hop: usize) -> Step {
        match self.memo.get(path) {
            Some(ResolutionState::Resolving) => {
                return Err(Failure::Unresolved(UnresolvedReason::Circular))
            }
            Some(ResolutionState::Resolved { value, hops }) => return Ok((value.clone(), *hops)),
            Some(ResolutionState::Unresolved(reason)) => {
                return Err(Failure::Unresolved(*reason))
            }
            None => {}
        }

        let root = self.root;
        let Some(token) = root.get_token(path) else {
            return Err(Failure::Unresolved(UnresolvedReason::NotAToken));
        };
        let Some(next) = token.reference() else {
            return Ok((token.value().clone(), 0));
        };

        self.memo.insert(path.clone(), ResolutionState::Resolving);
        let outcome = self.step(&next, hop + 1);

        match &outcome {
            Err(Failure::Cutoff) => {
                self.memo.remove(path);
            }
            Err(Failure::Unresolved(reason)) => {
                self.memo
                    .insert(path.clone(), ResolutionState::Unresolved(*reason));
            }
            Ok((_, hops)) if *hops > MAX_REFERENCE_DEPTH => {
                self.memo.insert(
                    path.clone(),
                    ResolutionState::Unresolved(UnresolvedReason::TooDeep),
                );
                return Err(Failure::Unresolved(UnresolvedReason::TooDeep));
            }
            Ok((value, hops)) => {
                self.memo.insert(
                    path.clone(),
                    ResolutionState::Resolved {
                        value: value.clone(),
                        hops: *hops,
                    },
                );
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "basis": {
                "color": {
                    "bg-default": {"$type": "color", "$value": "{color.white}"},
                    "color-default": {"$type": "color", "$value": "{basis.color.text}"},
                    "text": {"$type": "color", "$value": "{brand.color.black}"},
                    "self": {"$type": "color", "$value": "{basis.color.self}"},
                    "ping": {"$type": "color", "$value": "{basis.color.pong}"},
                    "pong": {"$type": "color", "$value": "{basis.color.ping}"},
                    "broken": {"$type": "color", "$value": "{basis.color.absent}"},
                    "stale": {
                        "$type": "color",
                        "$value": "{basis.color.absent}",
                        "$extensions": {"nl.nldesignsystem.resolved-as": "#123456"}
                    }
                }
            },
            "brand": {
                "color": {
                    "white": {"$type": "color", "$value": "#ffffff"},
                    "black": {"$type": "color", "$value": "#000000"}
                }
            }
        })
    }

    fn resolved(tree: &TokenTree, path: [&str; 3]) -> Option<Value> {
        tree.get_token(&TokenPath::from(path))
            .and_then(|t| t.extension(extensions::RESOLVED_AS))
            .cloned()
    }

    #[test]
    fn test_resolves_chains_and_brand_fallback() {
        let tree = TokenTree::from_value(&document()).unwrap();
        let output = resolve_references(&tree, &tree);

        assert_eq!(
            resolved(&output.tree, ["basis", "color", "bg-default"]),
            Some(json!("#ffffff"))
        );
        assert_eq!(
            resolved(&output.tree, ["basis", "color", "color-default"]),
            Some(json!("#000000"))
        );
        // $value itself is untouched
        assert_eq!(
            output
                .tree
                .get_token(&TokenPath::from(["basis", "color", "color-default"]))
                .unwrap()
                .value(),
            &json!("{basis.color.text}")
        );
    }

    #[test]
    fn test_failures_leave_no_annotation() {
        let tree = TokenTree::from_value(&document()).unwrap();
        let output = resolve_references(&tree, &tree);

        for name in ["self", "ping", "pong", "broken", "stale"] {
            assert_eq!(resolved(&output.tree, ["basis", "color", name]), None, "{name}");
        }
        assert_eq!(output.stats.references_found, 8);
        assert_eq!(output.stats.resolved, 3);
        assert_eq!(output.stats.circular, 3);
        assert_eq!(output.stats.missing, 2);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let tree = TokenTree::from_value(&document()).unwrap();
        let once = resolve_references(&tree, &tree).tree;
        let twice = resolve_references(&once, &once).tree;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_tree_is_not_modified() {
        let tree = TokenTree::from_value(&document()).unwrap();
        let before = tree.clone();
        let _ = resolve_references(&tree, &tree);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_memo_tracks_states() {
        let tree = TokenTree::from_value(&document()).unwrap();
        let mut resolver = Resolver::new(&tree);
        let start = TokenPath::from(["basis", "color", "color-default"]);
        let reference = TokenReference::parse("{basis.color.text}").unwrap();

        assert_eq!(resolver.resolve(&start, &reference), Ok(json!("#000000")));
        assert_eq!(
            resolver.state(&start),
            Some(&ResolutionState::Resolved {
                value: json!("#000000"),
                hops: 2
            })
        );
        assert!(resolver
            .state(&TokenPath::from(["basis", "color", "text"]))
            .is_some());
    }

    #[test]
    fn test_depth_limit_is_per_token() {
        let mut group = serde_json::Map::new();
        let length = MAX_REFERENCE_DEPTH + 3;
        for i in 0..length {
            group.insert(
                format!("t{i}"),
                json!({"$type": "number", "$value": format!("{{chain.t{}}}", i + 1)}),
            );
        }
        group.insert(format!("t{length}"), json!({"$type": "number", "$value": 1}));
        let tree = TokenTree::from_value(&json!({ "chain": group })).unwrap();

        let output = resolve_references(&tree, &tree);
        let annotated = |i: usize| {
            output
                .tree
                .get_token(&TokenPath::from(vec!["chain".to_string(), format!("t{i}")]))
                .and_then(|t| t.extension(extensions::RESOLVED_AS))
                .cloned()
        };

        // t0 needs `length` hops; the tail of the chain is short enough
        assert_eq!(annotated(0), None);
        assert_eq!(annotated(length - 1), Some(json!(1)));
        assert_eq!(annotated(length - MAX_REFERENCE_DEPTH), Some(json!(1)));
        assert_eq!(annotated(length - MAX_REFERENCE_DEPTH - 1), None);
    }
}
