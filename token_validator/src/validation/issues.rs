//! Validation issues and the collector that accumulates them

use crate::logging::codes::{self, Code};
use crate::utils::number::serialize_number;
use crate::utils::TokenPath;
use crate::log_warning;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidRefReason {
    Missing,
    NotAToken,
    TypeMismatch,
    Circular,
    TooDeep,
}

impl InvalidRefReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::NotAToken => "not-a-token",
            Self::TypeMismatch => "type-mismatch",
            Self::Circular => "circular",
            Self::TooDeep => "too-deep",
        }
    }
}

/// A single finding, serialized as `{"code": "...", "path": [...], ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationIssue {
    InvalidRef {
        path: TokenPath,
        reference: String,
        reason: InvalidRefReason,
        #[serde(rename = "expectedType", skip_serializing_if = "Option::is_none")]
        expected_type: Option<String>,
        #[serde(rename = "actualType", skip_serializing_if = "Option::is_none")]
        actual_type: Option<String>,
    },
    InsufficientContrast {
        path: TokenPath,
        tokens: Vec<TokenPath>,
        #[serde(serialize_with = "serialize_number")]
        actual: f64,
        #[serde(serialize_with = "serialize_number")]
        minimum: f64,
    },
    UnexpectedUnit {
        path: TokenPath,
        value: Value,
        unit: String,
        allowed: Vec<&'static str>,
    },
    FontSizeTooSmall {
        path: TokenPath,
        #[serde(serialize_with = "serialize_number")]
        actual: f64,
        #[serde(serialize_with = "serialize_number")]
        minimum: f64,
    },
    LineHeightTooSmall {
        path: TokenPath,
        #[serde(serialize_with = "serialize_number")]
        actual: f64,
        #[serde(serialize_with = "serialize_number")]
        minimum: f64,
    },
}

impl ValidationIssue {
    pub fn path(&self) -> &TokenPath {
        match self {
            Self::InvalidRef { path, .. }
            | Self::InsufficientContrast { path, .. }
            | Self::UnexpectedUnit { path, .. }
            | Self::FontSizeTooSmall { path, .. }
            | Self::LineHeightTooSmall { path, .. } => path,
        }
    }

    /// Issue code as it appears in output
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRef { .. } => "INVALID_REF",
            Self::InsufficientContrast { .. } => "INSUFFICIENT_CONTRAST",
            Self::UnexpectedUnit { .. } => "UNEXPECTED_UNIT",
            Self::FontSizeTooSmall { .. } => "FONT_SIZE_TOO_SMALL",
            Self::LineHeightTooSmall { .. } => "LINE_HEIGHT_TOO_SMALL",
        }
    }

    /// Logging code the issue is reported under
    pub fn log_code(&self) -> Code {
        match self {
            Self::InvalidRef { reason, .. } => match reason {
                InvalidRefReason::Circular => codes::references::CIRCULAR_REFERENCE,
                InvalidRefReason::TooDeep => codes::references::REFERENCE_DEPTH_EXCEEDED,
                InvalidRefReason::TypeMismatch => codes::references::REFERENCE_TYPE_MISMATCH,
                InvalidRefReason::Missing | InvalidRefReason::NotAToken => {
                    codes::references::INVALID_REFERENCE
                }
            },
            Self::InsufficientContrast { .. } => codes::accessibility::INSUFFICIENT_CONTRAST,
            Self::UnexpectedUnit { .. } => codes::validation::UNEXPECTED_UNIT,
            Self::FontSizeTooSmall { .. } => codes::validation::FONT_SIZE_TOO_SMALL,
            Self::LineHeightTooSmall { .. } => codes::validation::LINE_HEIGHT_TOO_SMALL,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::InvalidRef {
                reference,
                reason: InvalidRefReason::TypeMismatch,
                expected_type,
                actual_type,
                ..
            } => format!(
                "Reference {} points at a {} token, expected {}",
                reference,
                actual_type.as_deref().unwrap_or("untyped"),
                expected_type.as_deref().unwrap_or("untyped")
            ),
            Self::InvalidRef {
                reference, reason, ..
            } => format!("Invalid reference {} ({})", reference, reason.as_str()),
            Self::InsufficientContrast {
                tokens,
                actual,
                minimum,
                ..
            } => format!(
                "Contrast {}:1 between {} is below {}:1",
                actual,
                tokens
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" and "),
                minimum
            ),
            Self::UnexpectedUnit {
                value, unit, allowed, ..
            } if unit.is_empty() => format!(
                "{} is not a dimension, expected a number with one of {}",
                value,
                allowed.join(", ")
            ),
            Self::UnexpectedUnit { unit, allowed, .. } => {
                format!("Unexpected unit '{}', expected one of {}", unit, allowed.join(", "))
            }
            Self::FontSizeTooSmall { actual, minimum, .. } => {
                format!("Font size {}px is below the {}px minimum", actual, minimum)
            }
            Self::LineHeightTooSmall { actual, minimum, .. } => {
                format!("Line height {} is below the {} minimum", actual, minimum)
            }
        }
    }
}

/// Accumulates every issue found, logging each as a warning
#[derive(Debug, Default)]
pub struct IssueCollector {
    issues: Vec<ValidationIssue>,
}

impl IssueCollector {
    pub fn push(&mut self, issue: ValidationIssue) {
        log_warning!(issue.log_code(),
            &issue.message(),
            path = issue.path().clone(),
            "issue" => issue.code()
        );
        self.issues.push(issue);
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}
