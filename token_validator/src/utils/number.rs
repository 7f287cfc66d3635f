//! JSON number helpers
//!
//! Canonical values are computed as `f64` but written back as integers when
//! they are whole, so `16px` becomes `{"value": 16, ...}` rather than `16.0`.

use serde::Serializer;
use serde_json::{Number, Value};

/// Largest integer an `f64` represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Convert to a JSON number, preferring an integer representation
pub fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// `serialize_with` adapter for `f64` fields
pub fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// `serialize_with` adapter for `[f64; 3]` fields
pub fn serialize_numbers<S: Serializer>(
    values: &[f64; 3],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        seq.serialize_element(&json_number(*value))?;
    }
    seq.end()
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_numbers_become_integers() {
        assert_eq!(json_number(16.0), serde_json::json!(16));
        assert!(json_number(16.0).is_i64());
        assert_eq!(json_number(-2.0), serde_json::json!(-2));
    }

    #[test]
    fn test_fractions_stay_floats() {
        assert_eq!(json_number(1.5), serde_json::json!(1.5));
        assert_eq!(json_number(f64::NAN), Value::Null);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(4.478, 2), 4.48);
        assert_eq!(round_to(1.0, 2), 1.0);
        assert_eq!(round_to(20.999, 2), 21.0);
    }
}
