//! Reference validity and type compatibility
//!
//! A token is only blamed for its own hop: a missing or non-token target,
//! a direct target of another type, or a chain that loops back to it or runs
//! too long from it. A chain that breaks further down is reported on the
//! token where it breaks.

use super::issues::{InvalidRefReason, IssueCollector, ValidationIssue};
use crate::reference_resolution::{follow, lookup_reference, ChainEnd};
use crate::tree::{Token, TokenReference, TokenTree};
use crate::utils::TokenPath;

/// Check the reference held by `token`; returns whether one was present
pub fn check_reference(
    tree: &TokenTree,
    path: &TokenPath,
    token: &Token,
    issues: &mut IssueCollector,
) -> bool {
    let Some(reference) = token.reference() else {
        return false;
    };

    let invalid = |reason: InvalidRefReason| ValidationIssue::InvalidRef {
        path: path.clone(),
        reference: reference.to_string(),
        reason,
        expected_type: None,
        actual_type: None,
    };

    let Some((_, node)) = lookup_reference(tree, &reference) else {
        issues.push(invalid(InvalidRefReason::Missing));
        return true;
    };
    let Some(target) = node.as_token() else {
        issues.push(invalid(InvalidRefReason::NotAToken));
        return true;
    };

    if target.type_name() != token.type_name() {
        issues.push(ValidationIssue::InvalidRef {
            path: path.clone(),
            reference: reference.to_string(),
            reason: InvalidRefReason::TypeMismatch,
            expected_type: token.type_name().map(str::to_string),
            actual_type: target.type_name().map(str::to_string),
        });
    }

    if let Some(reason) = chain_failure(tree, path, &reference) {
        issues.push(invalid(reason));
    }

    true
}

fn chain_failure(
    tree: &TokenTree,
    path: &TokenPath,
    reference: &TokenReference,
) -> Option<InvalidRefReason> {
    match follow(tree, path, reference) {
        ChainEnd::Circular { revisited } if &revisited == path => Some(InvalidRefReason::Circular),
        ChainEnd::TooDeep => Some(InvalidRefReason::TooDeep),
        _ => None,
    }
}
