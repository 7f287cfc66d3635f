//! Font family codec: `"Inter, 'Helvetica Neue', sans-serif"` <-> string array

use serde_json::Value;

const GENERIC_FAMILIES: [&str; 13] = [
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "ui-serif",
    "ui-sans-serif",
    "ui-monospace",
    "ui-rounded",
    "math",
    "emoji",
    "fangsong",
];

pub fn decode(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|name| unquote(name.trim()).trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn encode(families: &[String]) -> String {
    families
        .iter()
        .map(|name| {
            if name.contains(char::is_whitespace) && !is_generic(name) {
                format!("'{}'", name)
            } else {
                name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn is_generic(name: &str) -> bool {
    GENERIC_FAMILIES.contains(&name.to_ascii_lowercase().as_str())
}

/// Read a canonical array or a legacy comma-separated string
pub fn from_json(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(decode(s)),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

fn unquote(name: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = name
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_trims_and_unquotes() {
        assert_eq!(
            decode("Inter, 'Helvetica Neue', \"Segoe UI\" ,sans-serif"),
            vec!["Inter", "Helvetica Neue", "Segoe UI", "sans-serif"]
        );
        assert_eq!(decode(" , ,"), Vec::<String>::new());
    }

    #[test]
    fn test_encode_quotes_multiword_names() {
        let families = decode("Inter, 'Helvetica Neue', sans-serif");
        assert_eq!(encode(&families), "Inter, 'Helvetica Neue', sans-serif");
        assert_eq!(decode(&encode(&families)), families);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(
            from_json(&json!(["Inter", "serif"])),
            Some(vec!["Inter".to_string(), "serif".to_string()])
        );
        assert_eq!(from_json(&json!("Inter")), Some(vec!["Inter".to_string()]));
        assert_eq!(from_json(&json!(["Inter", 3])), None);
        assert_eq!(from_json(&json!(3)), None);
    }
}
