use crate::utils::json_number;
use serde_json::Value;

/// `"700"` becomes `700`; keywords such as `"bold"` stay strings
pub fn decode(value: &Value) -> Value {
    match value {
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(weight) if weight.is_finite() => json_number(weight),
            _ => value.clone(),
        },
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode() {
        assert_eq!(decode(&json!("700")), json!(700));
        assert_eq!(decode(&json!(" 350 ")), json!(350));
        assert_eq!(decode(&json!("bold")), json!("bold"));
        assert_eq!(decode(&json!(400)), json!(400));
    }
}
