//! Legacy token kinds and their canonical encodings

use crate::codecs::{color, dimension, font_family, font_weight, line_height, CodecError};
use crate::codecs::{ColorValue, LineHeight};
use crate::utils::json_number;
use serde_json::Value;

/// Token kinds with a legacy type name or value encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKind {
    Color,
    Dimension,
    FontSize,
    FontFamily,
    LineHeight,
    FontWeight,
}

impl LegacyKind {
    pub fn from_type(token_type: &str) -> Option<Self> {
        match token_type {
            "color" => Some(Self::Color),
            "dimension" | "sizing" | "spacing" | "borderRadius" | "borderWidth" => {
                Some(Self::Dimension)
            }
            "fontSizes" | "fontSize" => Some(Self::FontSize),
            "fontFamilies" | "fontFamily" => Some(Self::FontFamily),
            "lineHeights" | "lineHeight" => Some(Self::LineHeight),
            "fontWeights" | "fontWeight" => Some(Self::FontWeight),
            _ => None,
        }
    }

    /// Canonical types a token of this kind may end up with
    pub fn canonical_types(&self) -> &'static [&'static str] {
        match self {
            Self::Color => &["color"],
            Self::Dimension | Self::FontSize => &["dimension"],
            Self::FontFamily => &["fontFamily"],
            Self::LineHeight => &["number", "lineHeight"],
            Self::FontWeight => &["fontWeight"],
        }
    }

    /// Type used when the value gives no better answer
    pub fn default_type(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Dimension | Self::FontSize => "dimension",
            Self::FontFamily => "fontFamily",
            Self::LineHeight => "lineHeight",
            Self::FontWeight => "fontWeight",
        }
    }

    /// Marker recorded in `token-subtype`. Font families only carry one when
    /// the type name itself was legacy.
    pub fn subtype(&self, renamed: bool) -> Option<&'static str> {
        match self {
            Self::FontSize => Some("font-size"),
            Self::LineHeight => Some("line-height"),
            Self::FontWeight => Some("font-weight"),
            Self::FontFamily if renamed => Some("font-family"),
            _ => None,
        }
    }
}

/// Result of normalizing one concrete value
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub token_type: &'static str,
    /// `None` keeps the value as it was
    pub value: Option<Value>,
    pub failure: Option<ConversionFailure>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionFailure {
    /// Not a color; the value was replaced by opaque black
    UnparseableColor(String),
    Codec(CodecError),
    /// A line height that is not a unitless number
    LineHeightKept(Value),
}

impl Conversion {
    fn kept(token_type: &'static str) -> Self {
        Self {
            token_type,
            value: None,
            failure: None,
        }
    }

    fn reshaped(token_type: &'static str, value: Value) -> Self {
        Self {
            token_type,
            value: Some(value),
            failure: None,
        }
    }

    fn failed(token_type: &'static str, failure: ConversionFailure) -> Self {
        Self {
            token_type,
            value: None,
            failure: Some(failure),
        }
    }
}

/// Convert a concrete (non-reference) value of the given kind
pub fn convert(kind: LegacyKind, value: &Value) -> Conversion {
    match kind {
        LegacyKind::Color => match value {
            Value::String(s) => match color::parse(s) {
                Some(parsed) => Conversion::reshaped("color", parsed.to_json()),
                None => Conversion {
                    token_type: "color",
                    value: Some(ColorValue::black().to_json()),
                    failure: Some(ConversionFailure::UnparseableColor(s.clone())),
                },
            },
            _ => Conversion::kept("color"),
        },

        LegacyKind::Dimension | LegacyKind::FontSize => match value {
            Value::String(s) => match dimension::decode(s) {
                Ok(parsed) => Conversion::reshaped("dimension", parsed.to_json()),
                Err(error) => Conversion::failed("dimension", ConversionFailure::Codec(error)),
            },
            _ => Conversion::kept("dimension"),
        },

        LegacyKind::FontFamily => match value {
            Value::String(s) => Conversion::reshaped(
                "fontFamily",
                Value::from(font_family::decode(s)),
            ),
            _ => Conversion::kept("fontFamily"),
        },

        LegacyKind::LineHeight => match line_height::decode(value) {
            LineHeight::Number(number) => {
                let canonical = json_number(number);
                if &canonical == value {
                    Conversion::kept("number")
                } else {
                    Conversion::reshaped("number", canonical)
                }
            }
            LineHeight::Unconverted => Conversion::failed(
                "lineHeight",
                ConversionFailure::LineHeightKept(value.clone()),
            ),
        },

        LegacyKind::FontWeight => {
            let canonical = font_weight::decode(value);
            if &canonical == value {
                Conversion::kept("fontWeight")
            } else {
                Conversion::reshaped("fontWeight", canonical)
            }
        }
    }
}

/// Canonical type of a concrete value of the given kind, without converting it
pub fn canonical_type_of(kind: LegacyKind, value: &Value) -> &'static str {
    convert(kind, value).token_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_kind_table() {
        assert_eq!(LegacyKind::from_type("fontSizes"), Some(LegacyKind::FontSize));
        assert_eq!(LegacyKind::from_type("spacing"), Some(LegacyKind::Dimension));
        assert_eq!(LegacyKind::from_type("fontWeights"), Some(LegacyKind::FontWeight));
        assert_eq!(LegacyKind::from_type("string"), None);
        assert_eq!(LegacyKind::FontFamily.subtype(false), None);
        assert_eq!(LegacyKind::FontFamily.subtype(true), Some("font-family"));
    }

    #[test]
    fn test_convert_color() {
        let conversion = convert(LegacyKind::Color, &json!("#ff0000"));
        assert_eq!(conversion.token_type, "color");
        assert_eq!(
            conversion.value,
            Some(json!({"colorSpace": "srgb", "components": [1, 0, 0], "alpha": 1}))
        );

        let conversion = convert(LegacyKind::Color, &json!("not-a-color"));
        assert_eq!(conversion.value, Some(ColorValue::black().to_json()));
        assert_matches!(conversion.failure, Some(ConversionFailure::UnparseableColor(_)));
    }

    #[test]
    fn test_convert_dimension() {
        let conversion = convert(LegacyKind::FontSize, &json!("1rem"));
        assert_eq!(conversion.token_type, "dimension");
        assert_eq!(conversion.value, Some(json!({"value": 1, "unit": "rem"})));

        let conversion = convert(LegacyKind::Dimension, &json!("2em"));
        assert_eq!(conversion.value, None);
        assert_matches!(
            conversion.failure,
            Some(ConversionFailure::Codec(CodecError::UnsupportedUnit { .. }))
        );
    }

    #[test]
    fn test_convert_line_height() {
        let conversion = convert(LegacyKind::LineHeight, &json!("150%"));
        assert_eq!(conversion.token_type, "number");
        assert_eq!(conversion.value, Some(json!(1.5)));

        assert_eq!(convert(LegacyKind::LineHeight, &json!(1.5)), Conversion::kept("number"));
        assert_eq!(canonical_type_of(LegacyKind::LineHeight, &json!("24px")), "lineHeight");
    }

    #[test]
    fn test_convert_font_family_and_weight() {
        let conversion = convert(LegacyKind::FontFamily, &json!("Inter, sans-serif"));
        assert_eq!(conversion.value, Some(json!(["Inter", "sans-serif"])));

        let conversion = convert(LegacyKind::FontWeight, &json!("700"));
        assert_eq!(conversion.value, Some(json!(700)));
        assert_eq!(convert(LegacyKind::FontWeight, &json!("bold")), Conversion::kept("fontWeight"));
    }
}
