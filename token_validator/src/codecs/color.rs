//! Color codec
//!
//! Canonical form is `{colorSpace, components, alpha, hex?}`. Legacy strings
//! go through a small CSS color parser covering hex notation, `rgb()`/`rgba()`,
//! `hsl()`/`hsla()` and the named colors. Strings that are not colors decode
//! to opaque black; callers that need to know use [`parse`].
//!
//! Lossy cases: `encode` writes sRGB through 8-bit channels, so components
//! that are not multiples of 1/255 do not survive a round trip, and
//! `display-p3` values are gamut-mapped to sRGB.

use super::named_colors;
use crate::utils::number::{serialize_number, serialize_numbers};
use crate::utils::round_to;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static FUNCTIONAL_NOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(rgba?|hsla?)\(\s*(.*?)\s*\)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSpace {
    Srgb,
    /// Components are hue in degrees, saturation and lightness in 0..=100
    Hsl,
    DisplayP3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorValue {
    pub color_space: ColorSpace,
    #[serde(serialize_with = "serialize_numbers")]
    pub components: [f64; 3],
    #[serde(default = "opaque", serialize_with = "serialize_number")]
    pub alpha: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
}

fn opaque() -> f64 {
    1.0
}

impl ColorValue {
    pub fn srgb(r: f64, g: f64, b: f64, alpha: f64) -> Self {
        Self {
            color_space: ColorSpace::Srgb,
            components: [r, g, b],
            alpha,
            hex: None,
        }
    }

    pub fn black() -> Self {
        Self::srgb(0.0, 0.0, 0.0, 1.0)
    }

    pub fn transparent() -> Self {
        Self::srgb(0.0, 0.0, 0.0, 0.0)
    }

    /// Read a canonical color object or a legacy color string
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => parse(s),
            Value::Object(_) => {
                let color: Self = serde_json::from_value(value.clone()).ok()?;
                color.is_well_formed().then_some(color)
            }
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn is_well_formed(&self) -> bool {
        self.components.iter().all(|c| c.is_finite())
            && self.alpha.is_finite()
            && (0.0..=1.0).contains(&self.alpha)
    }

    /// Components in gamma-encoded sRGB, clamped to 0..=1
    pub fn to_srgb(&self) -> [f64; 3] {
        let [a, b, c] = self.components;
        let rgb = match self.color_space {
            ColorSpace::Srgb => [a, b, c],
            ColorSpace::Hsl => hsl_to_srgb(a, b / 100.0, c / 100.0),
            ColorSpace::DisplayP3 => display_p3_to_srgb([a, b, c]),
        };
        rgb.map(|channel| channel.clamp(0.0, 1.0))
    }

    /// Composite this color over an opaque backdrop
    pub fn over(&self, backdrop: [f64; 3]) -> [f64; 3] {
        let top = self.to_srgb();
        let alpha = self.alpha.clamp(0.0, 1.0);
        [0, 1, 2].map(|i| top[i] * alpha + backdrop[i] * (1.0 - alpha))
    }
}

/// Decode a legacy color string; anything unparseable becomes opaque black
pub fn decode(input: &str) -> ColorValue {
    parse(input).unwrap_or_else(ColorValue::black)
}

/// Parse a CSS color string, `None` when it is not one
pub fn parse(input: &str) -> Option<ColorValue> {
    let normalized = input.trim().to_ascii_lowercase();

    if normalized == "transparent" {
        return Some(ColorValue::transparent());
    }

    if let Some(digits) = normalized.strip_prefix('#') {
        return parse_hex(digits);
    }

    if let Some(captures) = FUNCTIONAL_NOTATION.captures(&normalized) {
        let function = captures.get(1)?.as_str();
        let arguments = split_arguments(captures.get(2)?.as_str())?;
        return if function.starts_with("rgb") {
            parse_rgb(&arguments)
        } else {
            parse_hsl(&arguments)
        };
    }

    named_colors::lookup(&normalized).map(|rgb| {
        ColorValue::srgb(
            ((rgb >> 16) & 0xff) as f64 / 255.0,
            ((rgb >> 8) & 0xff) as f64 / 255.0,
            (rgb & 0xff) as f64 / 255.0,
            1.0,
        )
    })
}

/// Encode a canonical color as the shortest common CSS form
pub fn encode(color: &ColorValue) -> String {
    match color.color_space {
        ColorSpace::Hsl => {
            let [h, s, l] = color.components;
            if color.alpha >= 1.0 {
                format!("hsl({} {}% {}%)", round_to(h, 2), round_to(s, 2), round_to(l, 2))
            } else {
                format!(
                    "hsl({} {}% {}% / {})",
                    round_to(h, 2),
                    round_to(s, 2),
                    round_to(l, 2),
                    round_to(color.alpha, 3)
                )
            }
        }
        ColorSpace::Srgb | ColorSpace::DisplayP3 => {
            let [r, g, b] = color.to_srgb().map(to_byte);
            if color.alpha >= 1.0 {
                match (&color.hex, color.color_space) {
                    (Some(hex), ColorSpace::Srgb) => hex.clone(),
                    _ => format!("#{:02x}{:02x}{:02x}", r, g, b),
                }
            } else {
                format!("rgba({}, {}, {}, {})", r, g, b, round_to(color.alpha, 3))
            }
        }
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(digits: &str) -> Option<ColorValue> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => digits.to_string(),
        _ => return None,
    };

    let byte = |i: usize| -> Option<f64> {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .ok()
            .map(|b| b as f64 / 255.0)
    };

    let alpha = if expanded.len() == 8 { byte(6)? } else { 1.0 };
    Some(ColorValue::srgb(byte(0)?, byte(2)?, byte(4)?, alpha))
}

/// Split function arguments in either comma or space syntax.
///
/// Returns the channel arguments followed by the alpha argument, if any.
fn split_arguments(body: &str) -> Option<Vec<&str>> {
    let arguments: Vec<&str> = if body.contains(',') {
        body.split(',').map(str::trim).collect()
    } else {
        let (channels, alpha) = match body.split_once('/') {
            Some((channels, alpha)) => (channels, Some(alpha.trim())),
            None => (body, None),
        };
        channels.split_whitespace().chain(alpha).collect()
    };

    if (3..=4).contains(&arguments.len()) && arguments.iter().all(|a| !a.is_empty()) {
        Some(arguments)
    } else {
        None
    }
}

fn parse_alpha(argument: Option<&&str>) -> Option<f64> {
    let Some(raw) = argument else {
        return Some(1.0);
    };
    let alpha = match raw.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().ok()? / 100.0,
        None => raw.parse::<f64>().ok()?,
    };
    Some(alpha.clamp(0.0, 1.0))
}

fn parse_rgb(arguments: &[&str]) -> Option<ColorValue> {
    let channel = |raw: &str| -> Option<f64> {
        let value = match raw.strip_suffix('%') {
            Some(percent) => percent.trim().parse::<f64>().ok()? / 100.0,
            None => raw.parse::<f64>().ok()? / 255.0,
        };
        Some(value.clamp(0.0, 1.0))
    };

    Some(ColorValue::srgb(
        channel(arguments[0])?,
        channel(arguments[1])?,
        channel(arguments[2])?,
        parse_alpha(arguments.get(3))?,
    ))
}

fn parse_hsl(arguments: &[&str]) -> Option<ColorValue> {
    let hue = parse_hue(arguments[0])?;
    let percentage = |raw: &str| -> Option<f64> {
        let number = raw.strip_suffix('%').unwrap_or(raw).trim();
        number.parse::<f64>().ok().map(|p| (p / 100.0).clamp(0.0, 1.0))
    };

    let [r, g, b] = hsl_to_srgb(hue, percentage(arguments[1])?, percentage(arguments[2])?);
    Some(ColorValue::srgb(r, g, b, parse_alpha(arguments.get(3))?))
}

fn parse_hue(raw: &str) -> Option<f64> {
    let (number, factor) = if let Some(n) = raw.strip_suffix("deg") {
        (n, 1.0)
    } else if let Some(n) = raw.strip_suffix("turn") {
        (n, 360.0)
    } else if let Some(n) = raw.strip_suffix("rad") {
        (n, 180.0 / std::f64::consts::PI)
    } else {
        (raw, 1.0)
    };
    number.trim().parse::<f64>().ok().map(|h| h * factor)
}

/// `s` and `l` in 0..=1, hue in degrees
fn hsl_to_srgb(hue: f64, saturation: f64, lightness: f64) -> [f64; 3] {
    let hue = hue.rem_euclid(360.0);
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = lightness - chroma / 2.0;

    let (r, g, b) = match hue {
        h if h < 60.0 => (chroma, x, 0.0),
        h if h < 120.0 => (x, chroma, 0.0),
        h if h < 180.0 => (0.0, chroma, x),
        h if h < 240.0 => (0.0, x, chroma),
        h if h < 300.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    [r + m, g + m, b + m]
}

fn display_p3_to_srgb(p3: [f64; 3]) -> [f64; 3] {
    // Display P3 and sRGB share the transfer curve; only the primaries differ
    const P3_TO_SRGB: [[f64; 3]; 3] = [
        [1.224_940_2, -0.224_940_2, 0.0],
        [-0.042_056_9, 1.042_056_9, 0.0],
        [-0.019_637_6, -0.078_636_1, 1.098_273_7],
    ];

    let linear = p3.map(srgb_to_linear);
    let mapped = P3_TO_SRGB.map(|row| row[0] * linear[0] + row[1] * linear[1] + row[2] * linear[2]);
    mapped.map(linear_to_srgb)
}

/// sRGB transfer function, as used by the WCAG luminance formula
pub fn srgb_to_linear(channel: f64) -> f64 {
    if channel <= 0.03928 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(channel: f64) -> f64 {
    if channel <= 0.003_130_8 {
        channel * 12.92
    } else {
        1.055 * channel.powf(1.0 / 2.4) - 0.055
    }
}
