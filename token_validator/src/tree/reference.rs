//! Token reference grammar: `{identifier(.identifier)*}`
//!
//! Identifiers are non-empty, contain none of `{`, `}`, `.` and do not start
//! with `$`. A reference is only recognized when it is the whole string.

use crate::utils::TokenPath;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{([^{}.$][^{}.]*(?:\.[^{}.$][^{}.]*)*)\}$").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenReference {
    path: TokenPath,
}

impl TokenReference {
    pub fn parse(input: &str) -> Option<Self> {
        let captures = REFERENCE_PATTERN.captures(input)?;
        let body = captures.get(1)?.as_str();
        Some(Self {
            path: TokenPath::new(body.split('.').map(str::to_string).collect()),
        })
    }

    /// Reference held by a `$value`, if it is one
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::parse)
    }

    pub fn is_reference(input: &str) -> bool {
        REFERENCE_PATTERN.is_match(input)
    }

    pub fn to(path: TokenPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &TokenPath {
        &self.path
    }
}

impl fmt::Display for TokenReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.to_reference())
    }
}
