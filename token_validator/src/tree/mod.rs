//! Token tree model
//!
//! A JSON document is classified once into groups, tokens and opaque values.
//! Every stage receives a `&TokenTree` and hands back a new tree, so the
//! caller's document is never touched.

pub mod error;
pub mod extensions;
pub mod reference;
pub mod token;

pub use error::TreeError;
pub use reference::TokenReference;
pub use token::Token;

use crate::config::compile_time::tree::{
    MAX_IDENTIFIER_LENGTH, MAX_TOKEN_COUNT, MAX_TREE_DEPTH,
};
use crate::utils::TokenPath;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Token(Token),
    Group(TokenGroup),
    /// Group properties (`$type`, `$description`, ...) and non-object members
    Value(Value),
}

impl TokenNode {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&TokenGroup> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Token(token) => token.to_value(),
            Self::Group(group) => group.to_value(),
            Self::Value(value) => value.clone(),
        }
    }
}

/// Named members in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenGroup {
    entries: Vec<(String, TokenNode)>,
}

impl TokenGroup {
    pub fn entries(&self) -> &[(String, TokenNode)] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&TokenNode> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TokenNode> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    pub fn insert(&mut self, name: &str, node: TokenNode) {
        match self.get_mut(name) {
            Some(slot) => *slot = node,
            None => self.entries.push((name.to_string(), node)),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, node)| (key.clone(), node.to_value()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTree {
    root: TokenGroup,
}

struct BuildState {
    token_count: usize,
}

impl TokenTree {
    /// Classify a JSON document; the input is copied, never borrowed into the tree
    pub fn from_value(document: &Value) -> Result<Self, TreeError> {
        let object = document.as_object().ok_or(TreeError::RootNotObject {
            found: error::json_kind(document),
        })?;

        let mut state = BuildState { token_count: 0 };
        let mut path = TokenPath::root();
        let root = build_group(object, &mut path, 0, &mut state)?;
        Ok(Self { root })
    }

    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }

    pub fn root(&self) -> &TokenGroup {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut TokenGroup {
        &mut self.root
    }

    pub fn get(&self, path: &TokenPath) -> Option<&TokenNode> {
        let (first, rest) = path.segments().split_first()?;
        let mut node = self.root.get(first)?;
        for segment in rest {
            node = node.as_group()?.get(segment)?;
        }
        Some(node)
    }

    pub fn get_token(&self, path: &TokenPath) -> Option<&Token> {
        self.get(path).and_then(TokenNode::as_token)
    }

    pub fn get_token_mut(&mut self, path: &TokenPath) -> Option<&mut Token> {
        let mut group = &mut self.root;
        let (last, parents) = path.segments().split_last()?;
        for segment in parents {
            group = match group.get_mut(segment)? {
                TokenNode::Group(child) => child,
                _ => return None,
            };
        }
        match group.get_mut(last)? {
            TokenNode::Token(token) => Some(token),
            _ => None,
        }
    }

    /// All tokens with their paths, depth-first in document order
    pub fn tokens(&self) -> Vec<(TokenPath, &Token)> {
        fn visit<'a>(
            group: &'a TokenGroup,
            path: &mut TokenPath,
            out: &mut Vec<(TokenPath, &'a Token)>,
        ) {
            for (name, node) in &group.entries {
                match node {
                    TokenNode::Token(token) => out.push((path.child(name), token)),
                    TokenNode::Group(child) => {
                        path.push(name);
                        visit(child, path, out);
                        path.pop();
                    }
                    TokenNode::Value(_) => {}
                }
            }
        }

        let mut out = Vec::new();
        visit(&self.root, &mut TokenPath::root(), &mut out);
        out
    }

    /// Visit every token mutably, depth-first in document order
    pub fn for_each_token_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&TokenPath, &mut Token),
    {
        fn visit<F: FnMut(&TokenPath, &mut Token)>(
            group: &mut TokenGroup,
            path: &mut TokenPath,
            f: &mut F,
        ) {
            for (name, node) in group.entries.iter_mut() {
                path.push(name);
                match node {
                    TokenNode::Token(token) => f(path, token),
                    TokenNode::Group(child) => visit(child, path, f),
                    TokenNode::Value(_) => {}
                }
                path.pop();
            }
        }

        visit(&mut self.root, &mut TokenPath::root(), &mut f);
    }

    pub fn token_count(&self) -> usize {
        self.tokens().len()
    }
}

fn build_group(
    object: &Map<String, Value>,
    path: &mut TokenPath,
    depth: usize,
    state: &mut BuildState,
) -> Result<TokenGroup, TreeError> {
    if depth > MAX_TREE_DEPTH {
        return Err(TreeError::TooDeep {
            path: path.clone(),
            limit: MAX_TREE_DEPTH,
        });
    }

    let mut entries = Vec::with_capacity(object.len());
    for (name, value) in object {
        if name.chars().count() > MAX_IDENTIFIER_LENGTH {
            return Err(TreeError::IdentifierTooLong {
                path: path.child(name),
                limit: MAX_IDENTIFIER_LENGTH,
            });
        }

        let node = match value {
            // Group properties are data, never children
            _ if name.starts_with('$') => TokenNode::Value(value.clone()),
            Value::Object(child) if Token::is_token_shaped(child) => {
                state.token_count += 1;
                if state.token_count > MAX_TOKEN_COUNT {
                    return Err(TreeError::TooManyTokens {
                        limit: MAX_TOKEN_COUNT,
                    });
                }
                TokenNode::Token(Token::from_object(child.clone()))
            }
            Value::Object(child) => {
                path.push(name);
                let group = build_group(child, path, depth + 1, state)?;
                path.pop();
                TokenNode::Group(group)
            }
            other => TokenNode::Value(other.clone()),
        };
        entries.push((name.clone(), node));
    }

    Ok(TokenGroup { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "name": "Example theme",
            "brand": {
                "$description": "Brand colors",
                "color": {
                    "primary": {"$type": "color", "$value": "#0055aa"},
                    "$extensions": {"com.example": {"$type": "x", "$value": "y"}}
                }
            },
            "basis": {
                "text": {
                    "font-size": {"$type": "fontSizes", "$value": "16px", "filePath": "a.json"}
                }
            }
        })
    }

    #[test]
    fn test_roundtrip_preserves_document() {
        let document = sample();
        let tree = TokenTree::from_value(&document).unwrap();
        assert_eq!(tree.to_value(), document);
    }

    #[test]
    fn test_classification() {
        let tree = TokenTree::from_value(&sample()).unwrap();

        assert_matches!(
            tree.get(&TokenPath::from(["brand", "color", "primary"])),
            Some(TokenNode::Token(_))
        );
        assert_matches!(tree.get(&TokenPath::from(["brand", "color"])), Some(TokenNode::Group(_)));
        assert_matches!(tree.get(&TokenPath::from(["name"])), Some(TokenNode::Value(_)));
        // `$extensions` on a group is data even when it looks token-shaped inside
        assert_matches!(
            tree.get(&TokenPath::from(["brand", "color", "$extensions"])),
            Some(TokenNode::Value(_))
        );
        assert!(tree.get(&TokenPath::from(["brand", "missing"])).is_none());
        assert!(tree.get(&TokenPath::root()).is_none());
    }

    #[test]
    fn test_tokens_in_document_order() {
        let tree = TokenTree::from_value(&sample()).unwrap();
        let paths: Vec<String> = tree.tokens().iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(paths, vec!["brand.color.primary", "basis.text.font-size"]);
        assert_eq!(tree.token_count(), 2);
    }

    #[test]
    fn test_for_each_token_mut_sees_paths() {
        let mut tree = TokenTree::from_value(&sample()).unwrap();
        tree.for_each_token_mut(|path, token| {
            token.set_extension("test.path", json!(path.to_string()));
        });

        let token = tree
            .get_token(&TokenPath::from(["basis", "text", "font-size"]))
            .unwrap();
        assert_eq!(
            token.extension("test.path"),
            Some(&json!("basis.text.font-size"))
        );
    }

    #[test]
    fn test_get_token_mut() {
        let mut tree = TokenTree::from_value(&sample()).unwrap();
        let path = TokenPath::from(["brand", "color", "primary"]);
        tree.get_token_mut(&path).unwrap().set_value(json!("#000"));
        assert_eq!(tree.get_token(&path).unwrap().value(), &json!("#000"));
        assert!(tree.get_token_mut(&TokenPath::from(["brand", "color"])).is_none());
    }

    #[test]
    fn test_root_must_be_object() {
        assert_matches!(
            TokenTree::from_value(&json!([1, 2])),
            Err(TreeError::RootNotObject { found: "array" })
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut document = json!({"$type": "number", "$value": 1});
        for _ in 0..=MAX_TREE_DEPTH + 1 {
            document = json!({ "g": document });
        }
        assert_matches!(
            TokenTree::from_value(&document),
            Err(TreeError::TooDeep { .. })
        );
    }

    #[test]
    fn test_input_is_not_aliased() {
        let document = sample();
        let mut tree = TokenTree::from_value(&document).unwrap();
        tree.for_each_token_mut(|_, token| token.set_value(json!(null)));
        assert_eq!(document, sample());
    }
}
