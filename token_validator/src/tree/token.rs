//! A single token-shaped object
//!
//! Properties are kept in document order exactly as read; the typed
//! accessors below are the only way stages look into them.

use super::extensions;
use super::reference::TokenReference;
use serde_json::{Map, Value};

pub const TYPE_KEY: &str = "$type";
pub const VALUE_KEY: &str = "$value";
pub const DESCRIPTION_KEY: &str = "$description";
pub const DEPRECATED_KEY: &str = "$deprecated";
pub const EXTENSIONS_KEY: &str = "$extensions";

static NULL: Value = Value::Null;

/// Properties a token keeps after metadata stripping
pub const STANDARD_PROPERTIES: [&str; 5] = [
    TYPE_KEY,
    VALUE_KEY,
    DESCRIPTION_KEY,
    DEPRECATED_KEY,
    EXTENSIONS_KEY,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    properties: Map<String, Value>,
}

impl Token {
    /// Objects with both `$type` and `$value` are tokens; everything else is not
    pub fn is_token_shaped(object: &Map<String, Value>) -> bool {
        object.contains_key(TYPE_KEY) && object.contains_key(VALUE_KEY)
    }

    pub(crate) fn from_object(properties: Map<String, Value>) -> Self {
        Self { properties }
    }

    /// Build a token from scratch (tests and fixtures)
    pub fn new(token_type: &str, value: Value) -> Self {
        let mut properties = Map::new();
        properties.insert(TYPE_KEY.to_string(), Value::from(token_type));
        properties.insert(VALUE_KEY.to_string(), value);
        Self { properties }
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.properties.clone())
    }

    /// `$type` when it is a string
    pub fn type_name(&self) -> Option<&str> {
        self.properties.get(TYPE_KEY).and_then(Value::as_str)
    }

    pub fn set_type(&mut self, token_type: &str) {
        self.properties
            .insert(TYPE_KEY.to_string(), Value::from(token_type));
    }

    pub fn value(&self) -> &Value {
        self.properties.get(VALUE_KEY).unwrap_or(&NULL)
    }

    pub fn set_value(&mut self, value: Value) {
        self.properties.insert(VALUE_KEY.to_string(), value);
    }

    /// The reference held by `$value`, if any
    pub fn reference(&self) -> Option<TokenReference> {
        TokenReference::from_value(self.value())
    }

    pub fn extensions(&self) -> Option<&Map<String, Value>> {
        self.properties.get(EXTENSIONS_KEY).and_then(Value::as_object)
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions().and_then(|ext| ext.get(key))
    }

    /// Write one extension key; a non-object `$extensions` is replaced
    pub fn set_extension(&mut self, key: &str, value: Value) {
        let slot = self
            .properties
            .entry(EXTENSIONS_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(ext) = slot {
            ext.insert(key.to_string(), value);
        }
    }

    pub fn remove_extension(&mut self, key: &str) -> Option<Value> {
        let ext = self
            .properties
            .get_mut(EXTENSIONS_KEY)
            .and_then(Value::as_object_mut)?;
        let removed = ext.shift_remove(key)?;
        if ext.is_empty() {
            self.properties.shift_remove(EXTENSIONS_KEY);
        }
        Some(removed)
    }

    /// Concrete value for checks: `resolved-as` when present, else `$value`
    pub fn effective_value(&self) -> &Value {
        self.extension(extensions::RESOLVED_AS)
            .unwrap_or_else(|| self.value())
    }

    pub fn subtype(&self) -> Option<&str> {
        self.extension(extensions::TOKEN_SUBTYPE)
            .and_then(Value::as_str)
    }

    /// Drop every property outside [`STANDARD_PROPERTIES`]; returns how many went
    pub fn retain_standard_properties(&mut self) -> usize {
        let before = self.properties.len();
        self.properties
            .retain(|key, _| STANDARD_PROPERTIES.contains(&key.as_str()));
        before - self.properties.len()
    }
}
