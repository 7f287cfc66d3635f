//! Token paths
//!
//! A path is the sequence of group names leading to a token, root first.
//! It serializes as a string array and displays dot-joined, which is also
//! the syntax used inside `{a.b.c}` references.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenPath(Vec<String>);

impl TokenPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, i.e. the token's own name
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Path of the enclosing group
    pub fn parent(&self) -> Option<TokenPath> {
        match self.0.split_last() {
            Some((_, rest)) => Some(Self(rest.to_vec())),
            None => None,
        }
    }

    pub fn child(&self, name: &str) -> TokenPath {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// Same path under an extra leading segment, e.g. `brand.<path>`
    pub fn prefixed(&self, first: &str) -> TokenPath {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.push(first.to_string());
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    pub fn push(&mut self, segment: &str) {
        self.0.push(segment.to_string());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    /// Whether any segment contains `needle`, e.g. `font-size`
    pub fn mentions(&self, needle: &str) -> bool {
        self.0.iter().any(|segment| segment.contains(needle))
    }

    /// Reference string pointing at this path: `{a.b.c}`
    pub fn to_reference(&self) -> String {
        format!("{{{}}}", self)
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl<const N: usize> From<[&str; N]> for TokenPath {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<String>> for TokenPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_reference() {
        let path = TokenPath::from(["basis", "color", "bg-default"]);
        assert_eq!(path.to_string(), "basis.color.bg-default");
        assert_eq!(path.to_reference(), "{basis.color.bg-default}");
        assert_eq!(path.name(), Some("bg-default"));
    }

    #[test]
    fn test_parent_child_roundtrip() {
        let path = TokenPath::from(["a", "b"]);
        assert_eq!(path.parent().unwrap().child("b"), path);
        assert_eq!(TokenPath::root().parent(), None);
    }

    #[test]
    fn test_prefixed() {
        let path = TokenPath::from(["color", "primary"]);
        assert_eq!(path.prefixed("brand").to_string(), "brand.color.primary");
    }

    #[test]
    fn test_serializes_as_array() {
        let path = TokenPath::from(["basis", "text"]);
        assert_eq!(
            serde_json::to_value(&path).unwrap(),
            serde_json::json!(["basis", "text"])
        );
    }

    #[test]
    fn test_mentions() {
        let path = TokenPath::from(["basis", "text", "font-size", "md"]);
        assert!(path.mentions("font-size"));
        assert!(!path.mentions("line-height"));
    }
}
