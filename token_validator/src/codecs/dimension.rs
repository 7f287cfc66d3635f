//! Dimension codec: `"16px"` <-> `{"value": 16, "unit": "px"}`

use super::{split_number_unit, CodecError};
use crate::utils::number::serialize_number;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    Px,
    Rem,
}

impl DimensionUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Rem => "rem",
        }
    }

    pub fn parse(unit: &str) -> Option<Self> {
        match unit {
            "px" => Some(Self::Px),
            "rem" => Some(Self::Rem),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionValue {
    #[serde(serialize_with = "serialize_number")]
    pub value: f64,
    pub unit: DimensionUnit,
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

impl DimensionValue {
    pub fn px(value: f64) -> Self {
        Self {
            value,
            unit: DimensionUnit::Px,
        }
    }

    pub fn rem(value: f64) -> Self {
        Self {
            value,
            unit: DimensionUnit::Rem,
        }
    }

    pub fn to_px(&self, rem_base: f64) -> f64 {
        match self.unit {
            DimensionUnit::Px => self.value,
            DimensionUnit::Rem => self.value * rem_base,
        }
    }

    /// Read a canonical `{value, unit}` object, a legacy string, or a bare
    /// number (taken as px)
    pub fn from_json(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::String(s) => decode(s),
            Value::Number(n) => n
                .as_f64()
                .map(Self::px)
                .ok_or_else(|| CodecError::malformed("dimension", n)),
            Value::Object(object) => {
                let number = object
                    .get("value")
                    .and_then(Value::as_f64)
                    .ok_or_else(|| CodecError::malformed("dimension", value))?;
                let unit = object
                    .get("unit")
                    .and_then(Value::as_str)
                    .ok_or_else(|| CodecError::malformed("dimension", value))?;
                let unit = DimensionUnit::parse(unit)
                    .ok_or_else(|| CodecError::unsupported_unit(&value.to_string(), unit))?;
                Ok(Self { value: number, unit })
            }
            other => Err(CodecError::malformed("dimension", other)),
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Decode a legacy dimension string. A bare `0` is accepted as `0px`.
pub fn decode(input: &str) -> Result<DimensionValue, CodecError> {
    let (value, unit) =
        split_number_unit(input).ok_or_else(|| CodecError::malformed("dimension", input))?;

    match unit {
        "" if value == 0.0 => Ok(DimensionValue::px(0.0)),
        "" => Err(CodecError::malformed("dimension", input)),
        unit => DimensionUnit::parse(unit)
            .map(|unit| DimensionValue { value, unit })
            .ok_or_else(|| CodecError::unsupported_unit(input, unit)),
    }
}

pub fn encode(dimension: &DimensionValue) -> String {
    dimension.to_string()
}
