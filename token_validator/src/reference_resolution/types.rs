use crate::tree::TokenTree;
use serde::Serialize;
use serde_json::Value;

/// Per-token progress through resolution. Paths absent from the memo are
/// unvisited.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionState {
    Resolving,
    /// `hops` is the chain length from this token to `value`
    Resolved { value: Value, hops: usize },
    Unresolved(UnresolvedReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedReason {
    Missing,
    NotAToken,
    Circular,
    TooDeep,
}

impl UnresolvedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::NotAToken => "not-a-token",
            Self::Circular => "circular",
            Self::TooDeep => "too-deep",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionStats {
    pub references_found: usize,
    pub resolved: usize,
    pub missing: usize,
    pub not_a_token: usize,
    pub circular: usize,
    pub too_deep: usize,
}

impl ResolutionStats {
    pub fn unresolved(&self) -> usize {
        self.missing + self.not_a_token + self.circular + self.too_deep
    }

    pub(crate) fn record_failure(&mut self, reason: UnresolvedReason) {
        match reason {
            UnresolvedReason::Missing => self.missing += 1,
            UnresolvedReason::NotAToken => self.not_a_token += 1,
            UnresolvedReason::Circular => self.circular += 1,
            UnresolvedReason::TooDeep => self.too_deep += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolutionOutput {
    pub tree: TokenTree,
    pub stats: ResolutionStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineStats {
    pub inlined: usize,
    pub unresolved: usize,
}

#[derive(Debug, Clone)]
pub struct InlineOutput {
    pub tree: TokenTree,
    pub stats: InlineStats,
}
