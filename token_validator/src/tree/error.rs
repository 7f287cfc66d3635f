use crate::logging::codes::{self, Code};
use crate::utils::TokenPath;
use thiserror::Error;

/// Structural problems that stop a document from becoming a token tree
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TreeError {
    #[error("Token document root must be a JSON object, found {found}")]
    RootNotObject { found: &'static str },

    #[error("Group nesting at '{path}' exceeds the maximum depth of {limit}")]
    TooDeep { path: TokenPath, limit: usize },

    #[error("Document contains more than {limit} tokens")]
    TooManyTokens { limit: usize },

    #[error("Name at '{path}' is longer than {limit} characters")]
    IdentifierTooLong { path: TokenPath, limit: usize },
}

impl TreeError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::RootNotObject { .. } => codes::document::ROOT_NOT_OBJECT,
            Self::TooDeep { .. } => codes::document::TREE_TOO_DEEP,
            Self::TooManyTokens { .. } => codes::document::TOO_MANY_TOKENS,
            Self::IdentifierTooLong { .. } => codes::document::IDENTIFIER_TOO_LONG,
        }
    }
}

/// JSON type name for error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
