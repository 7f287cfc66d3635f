//! Units, font-size floor and line-height floor

use super::issues::{IssueCollector, ValidationIssue};
use super::ValidationOptions;
use crate::codecs::{split_number_unit, CodecError, DimensionValue};
use crate::tree::{Token, TokenReference};
use crate::utils::{round_to, TokenPath};
use serde_json::Value;

const ALLOWED_UNITS: [&str; 2] = ["px", "rem"];

const FONT_SIZE: &str = "font-size";
const LINE_HEIGHT: &str = "line-height";

pub fn is_font_size(path: &TokenPath, token: &Token) -> bool {
    token.type_name() == Some("fontSize")
        || token.subtype() == Some(FONT_SIZE)
        || (token.type_name() == Some("dimension") && path.mentions(FONT_SIZE))
}

pub fn is_line_height(path: &TokenPath, token: &Token) -> bool {
    token.type_name() == Some("lineHeight")
        || token.subtype() == Some(LINE_HEIGHT)
        || path.mentions(LINE_HEIGHT)
}

pub fn check_numeric(
    path: &TokenPath,
    token: &Token,
    options: &ValidationOptions,
    issues: &mut IssueCollector,
) {
    let value = token.effective_value();
    if TokenReference::from_value(value).is_some() {
        return;
    }

    let font_size = is_font_size(path, token);
    let mut unit_reported = false;
    if font_size || token.type_name() == Some("dimension") {
        unit_reported = check_dimension(path, value, font_size, options, issues);
    }

    if is_line_height(path, token) {
        check_line_height(path, value, unit_reported, options, issues);
    }
}

/// Returns whether an `UNEXPECTED_UNIT` issue was pushed
fn check_dimension(
    path: &TokenPath,
    value: &Value,
    font_size: bool,
    options: &ValidationOptions,
    issues: &mut IssueCollector,
) -> bool {
    match DimensionValue::from_json(value) {
        Ok(dimension) => {
            let px = dimension.to_px(options.rem_base_px);
            if font_size && px < options.min_font_size_px {
                issues.push(ValidationIssue::FontSizeTooSmall {
                    path: path.clone(),
                    actual: round_to(px, 2),
                    minimum: options.min_font_size_px,
                });
            }
            false
        }
        Err(CodecError::UnsupportedUnit { unit, .. }) => {
            issues.push(unexpected_unit(path, value, unit));
            true
        }
        Err(CodecError::Malformed { .. }) => {
            // Keywords, booleans and bare numbers carry no usable unit
            let unit = value.as_str().and_then(unit_of).unwrap_or_default();
            issues.push(unexpected_unit(path, value, unit));
            true
        }
    }
}

fn check_line_height(
    path: &TokenPath,
    value: &Value,
    unit_reported: bool,
    options: &ValidationOptions,
    issues: &mut IssueCollector,
) {
    let mut report_unit = |unit: String| {
        if !unit_reported {
            issues.push(unexpected_unit(path, value, unit));
        }
    };

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match split_number_unit(s) {
            Some((number, "")) => Some(number),
            Some((percent, "%")) => Some(percent / 100.0),
            Some((_, unit)) => {
                report_unit(unit.to_string());
                None
            }
            None => None,
        },
        Value::Object(_) => match DimensionValue::from_json(value) {
            Ok(dimension) => {
                report_unit(dimension.unit.as_str().to_string());
                None
            }
            Err(_) => None,
        },
        _ => None,
    };

    if let Some(number) = number {
        if number < options.min_line_height {
            issues.push(ValidationIssue::LineHeightTooSmall {
                path: path.clone(),
                actual: number,
                minimum: options.min_line_height,
            });
        }
    }
}

fn unit_of(input: &str) -> Option<String> {
    split_number_unit(input).map(|(_, unit)| unit.to_string())
}

fn unexpected_unit(path: &TokenPath, value: &Value, unit: String) -> ValidationIssue {
    ValidationIssue::UnexpectedUnit {
        path: path.clone(),
        value: value.clone(),
        unit,
        allowed: ALLOWED_UNITS.to_vec(),
    }
}
