//! Contrast-pair annotations
//!
//! Each entry in `nl.nldesignsystem.contrast-with` names a background, either
//! as a `{path}` reference to a sibling token or as a literal color, and the
//! minimum ratio the token must reach on it.

use crate::config::AccessibilityConfig;
use crate::tree::extensions::{self, contrast_entry};
use crate::tree::{Token, TokenTree};
use crate::utils::{json_number, TokenPath};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct ContrastEntry {
    /// Reference string or literal color
    pub color: Value,
    pub expected_ratio: f64,
}

impl ContrastEntry {
    pub fn to_json(&self) -> Value {
        let mut entry = Map::new();
        entry.insert(contrast_entry::COLOR.to_string(), self.color.clone());
        entry.insert(
            contrast_entry::EXPECTED_RATIO.to_string(),
            json_number(self.expected_ratio),
        );
        Value::Object(entry)
    }

    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let color = object.get(contrast_entry::COLOR)?;
        let expected_ratio = object.get(contrast_entry::EXPECTED_RATIO)?.as_f64()?;
        if color.is_null() || !expected_ratio.is_finite() {
            return None;
        }
        Some(Self {
            color: color.clone(),
            expected_ratio,
        })
    }
}

/// Read a token's contrast entries; malformed entries are returned as `Err`
pub fn entries(token: &Token) -> Vec<Result<ContrastEntry, Value>> {
    match token.extension(extensions::CONTRAST_WITH) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| ContrastEntry::from_json(item).ok_or_else(|| item.clone()))
            .collect(),
        Some(other) => vec![Err(other.clone())],
        None => Vec::new(),
    }
}

/// Entries a token at `path` should receive under the configured rules
pub fn pairs_for(
    tree: &TokenTree,
    path: &TokenPath,
    config: &AccessibilityConfig,
) -> Vec<ContrastEntry> {
    let (Some(name), Some(parent)) = (path.name(), path.parent()) else {
        return Vec::new();
    };
    if parent.name().is_some_and(|group| config.is_exempt(group)) {
        return Vec::new();
    }

    config
        .rules_for_foreground(name)
        .filter_map(|rule| {
            let background = parent.child(&rule.background);
            tree.get_token(&background).map(|_| ContrastEntry {
                color: Value::from(background.to_reference()),
                expected_ratio: rule.ratio,
            })
        })
        .collect()
}

/// Append entries that are not already present. Returns how many were added;
/// `Err` when an existing non-array value had to be replaced.
pub fn append(token: &mut Token, new_entries: &[ContrastEntry]) -> Result<usize, usize> {
    let (mut items, replaced) = match token.extension(extensions::CONTRAST_WITH) {
        Some(Value::Array(items)) => (items.clone(), false),
        Some(_) => (Vec::new(), true),
        None => (Vec::new(), false),
    };

    let mut added = 0;
    for entry in new_entries {
        let value = entry.to_json();
        if !items.contains(&value) {
            items.push(value);
            added += 1;
        }
    }

    if added > 0 || replaced {
        token.set_extension(extensions::CONTRAST_WITH, Value::Array(items));
    }

    if replaced {
        Err(added)
    } else {
        Ok(added)
    }
}
