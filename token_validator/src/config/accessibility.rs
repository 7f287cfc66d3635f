//! Accessibility lookup tables
//!
//! The contrast-pair table, the exempt groups and the color-scale order are
//! plain data handed to the annotator. The built-in defaults describe the
//! `basis.color.<scale>.*` naming scheme; a theme with a different scheme can
//! ship its own table as TOML:
//!
//! ```toml
//! exempt_groups = ["disabled"]
//! scale_steps = ["bg-document", "bg-default", "color-default"]
//!
//! [[contrast_rules]]
//! foreground = "color-default"
//! background = "bg-default"
//! ratio = 4.5
//! ```

use super::compile_time::accessibility::DEFAULT_CONTRAST_RATIO;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// WCAG contrast ratios live in 1:1 ..= 21:1
const MAX_CONTRAST_RATIO: f64 = 21.0;

#[derive(Debug, Error)]
pub enum AccessibilityConfigError {
    #[error("Failed to read accessibility config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid accessibility config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Contrast rule '{foreground}' -> '{background}' has ratio {ratio}, expected 1..=21")]
    InvalidRatio {
        foreground: String,
        background: String,
        ratio: f64,
    },

    #[error("Accessibility config contains an empty {field} name")]
    EmptyName { field: &'static str },

    #[error("Color scale step '{0}' appears more than once")]
    DuplicateScaleStep(String),
}

/// A foreground role that must reach `ratio` against a sibling background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastRule {
    pub foreground: String,
    pub background: String,
    #[serde(default = "default_ratio")]
    pub ratio: f64,
}

fn default_ratio() -> f64 {
    DEFAULT_CONTRAST_RATIO
}

impl ContrastRule {
    pub fn new(foreground: &str, background: &str, ratio: f64) -> Self {
        Self {
            foreground: foreground.to_string(),
            background: background.to_string(),
            ratio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessibilityConfig {
    pub contrast_rules: Vec<ContrastRule>,
    /// Parent group names whose tokens never get contrast pairs
    pub exempt_groups: Vec<String>,
    /// Canonical scale steps, lightest surface first
    pub scale_steps: Vec<String>,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        let text_pairs = [
            ("color-document", "bg-document"),
            ("color-default", "bg-default"),
            ("color-subtle", "bg-subtle"),
            ("color-hover", "bg-hover"),
            ("color-active", "bg-active"),
        ];

        Self {
            contrast_rules: text_pairs
                .iter()
                .map(|(fg, bg)| ContrastRule::new(fg, bg, DEFAULT_CONTRAST_RATIO))
                .collect(),
            exempt_groups: vec!["disabled".to_string()],
            scale_steps: [
                "bg-document",
                "bg-subtle",
                "bg-default",
                "bg-hover",
                "bg-active",
                "border-subtle",
                "border-default",
                "border-hover",
                "border-active",
                "color-subtle",
                "color-default",
                "color-document",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl AccessibilityConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, AccessibilityConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, AccessibilityConfigError> {
        let content = fs::read_to_string(path).map_err(|source| AccessibilityConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), AccessibilityConfigError> {
        for rule in &self.contrast_rules {
            if rule.foreground.is_empty() || rule.background.is_empty() {
                return Err(AccessibilityConfigError::EmptyName {
                    field: "contrast rule",
                });
            }
            if !(1.0..=MAX_CONTRAST_RATIO).contains(&rule.ratio) {
                return Err(AccessibilityConfigError::InvalidRatio {
                    foreground: rule.foreground.clone(),
                    background: rule.background.clone(),
                    ratio: rule.ratio,
                });
            }
        }

        if self.exempt_groups.iter().any(|g| g.is_empty()) {
            return Err(AccessibilityConfigError::EmptyName {
                field: "exempt group",
            });
        }

        let mut seen = HashSet::new();
        for step in &self.scale_steps {
            if step.is_empty() {
                return Err(AccessibilityConfigError::EmptyName {
                    field: "scale step",
                });
            }
            if !seen.insert(step.as_str()) {
                return Err(AccessibilityConfigError::DuplicateScaleStep(step.clone()));
            }
        }

        Ok(())
    }

    pub fn is_exempt(&self, group_name: &str) -> bool {
        self.exempt_groups.iter().any(|g| g == group_name)
    }

    pub fn rules_for_foreground<'a>(
        &'a self,
        token_name: &'a str,
    ) -> impl Iterator<Item = &'a ContrastRule> + 'a {
        self.contrast_rules
            .iter()
            .filter(move |rule| rule.foreground == token_name)
    }

    /// 1-based position of the scale step a token name ends in.
    ///
    /// `"bg-default"` and `"primary-bg-default"` both match `bg-default`;
    /// when several steps match, the longest one wins.
    pub fn scale_position(&self, token_name: &str) -> Option<usize> {
        self.scale_steps
            .iter()
            .enumerate()
            .filter(|(_, step)| {
                token_name == step.as_str()
                    || token_name
                        .strip_suffix(step.as_str())
                        .is_some_and(|prefix| prefix.ends_with('-'))
            })
            .max_by_key(|(_, step)| step.len())
            .map(|(index, _)| index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_config_is_valid() {
        let config = AccessibilityConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.contrast_rules.len(), 5);
        assert!(config.is_exempt("disabled"));
        assert!(!config.is_exempt("default"));
    }

    #[test]
    fn test_scale_position_is_one_based() {
        let config = AccessibilityConfig::default();
        assert_eq!(config.scale_position("bg-document"), Some(1));
        assert_eq!(config.scale_position("color-document"), Some(12));
        assert_eq!(config.scale_position("primary-border-hover"), Some(8));
        assert_eq!(config.scale_position("xbg-default"), None);
        assert_eq!(config.scale_position("accent"), None);
    }

    #[test]
    fn test_rules_for_foreground() {
        let config = AccessibilityConfig::default();
        let rules: Vec<_> = config.rules_for_foreground("color-default").collect();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].background, "bg-default");
        assert_eq!(config.rules_for_foreground("bg-default").count(), 0);
    }

    #[test]
    fn test_from_toml_str_applies_default_ratio() {
        let config = AccessibilityConfig::from_toml_str(
            r#"
            exempt_groups = ["disabled", "decorative"]

            [[contrast_rules]]
            foreground = "fg"
            background = "bg"
            "#,
        )
        .unwrap();

        assert_eq!(config.contrast_rules[0].ratio, DEFAULT_CONTRAST_RATIO);
        assert!(config.is_exempt("decorative"));
        // Unspecified tables keep their defaults
        assert_eq!(config.scale_steps.len(), 12);
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        assert_matches!(
            AccessibilityConfig::from_toml_str(
                "[[contrast_rules]]\nforeground = \"a\"\nbackground = \"b\"\nratio = 40.0\n"
            ),
            Err(AccessibilityConfigError::InvalidRatio { .. })
        );
        assert_matches!(
            AccessibilityConfig::from_toml_str("scale_steps = [\"a\", \"a\"]"),
            Err(AccessibilityConfigError::DuplicateScaleStep(step)) if step == "a"
        );
        assert_matches!(
            AccessibilityConfig::from_toml_str("unknown = 1"),
            Err(AccessibilityConfigError::Parse(_))
        );
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a11y.toml");
        std::fs::write(&path, "exempt_groups = []\n").unwrap();

        let config = AccessibilityConfig::from_toml_file(&path).unwrap();
        assert!(config.exempt_groups.is_empty());

        assert_matches!(
            AccessibilityConfig::from_toml_file(&dir.path().join("missing.toml")),
            Err(AccessibilityConfigError::Io { .. })
        );
    }
}
