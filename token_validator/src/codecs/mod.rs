//! Value codecs
//!
//! Pure conversions between legacy scalar encodings (`"#ff0000"`, `"16px"`,
//! `"Inter, sans-serif"`) and the canonical structured values stored in a
//! normalized tree. Nothing here knows about token paths or logging.

pub mod color;
pub mod dimension;
pub mod error;
pub mod font_family;
pub mod font_weight;
pub mod line_height;
mod named_colors;

pub use color::{ColorSpace, ColorValue};
pub use dimension::{DimensionUnit, DimensionValue};
pub use error::CodecError;
pub use line_height::LineHeight;

use regex::Regex;
use std::sync::LazyLock;

static NUMBER_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)\s*([a-zA-Z%]*)$").unwrap()
});

/// Split `"1.5rem"` into `(1.5, "rem")`; the unit may be empty
pub fn split_number_unit(input: &str) -> Option<(f64, &str)> {
    let captures = NUMBER_WITH_UNIT.captures(input.trim())?;
    let number = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = captures.get(2).map_or("", |m| m.as_str());
    Some((number, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_number_unit() {
        assert_eq!(split_number_unit("16px"), Some((16.0, "px")));
        assert_eq!(split_number_unit(" 1.5rem "), Some((1.5, "rem")));
        assert_eq!(split_number_unit(".5em"), Some((0.5, "em")));
        assert_eq!(split_number_unit("150%"), Some((150.0, "%")));
        assert_eq!(split_number_unit("-2"), Some((-2.0, "")));
        assert_eq!(split_number_unit("px"), None);
        assert_eq!(split_number_unit("1 2px"), None);
    }
}
