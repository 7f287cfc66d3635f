//! Line height codec
//!
//! Numbers, numeric strings and percentages become a unitless number.
//! Anything else (`"24px"`, `"normal"`) is left for the caller to keep as is.

use super::split_number_unit;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeight {
    Number(f64),
    Unconverted,
}

pub fn decode(value: &Value) -> LineHeight {
    match value {
        Value::Number(n) => n.as_f64().map_or(LineHeight::Unconverted, LineHeight::Number),
        Value::String(s) => match split_number_unit(s) {
            Some((number, "")) => LineHeight::Number(number),
            Some((percent, "%")) => LineHeight::Number(percent / 100.0),
            _ => LineHeight::Unconverted,
        },
        _ => LineHeight::Unconverted,
    }
}
