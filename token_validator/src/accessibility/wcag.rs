//! WCAG 2.x relative luminance and contrast ratio

use crate::codecs::color::srgb_to_linear;
use crate::codecs::ColorValue;

const WHITE: [f64; 3] = [1.0, 1.0, 1.0];

/// Relative luminance of a gamma-encoded sRGB color
pub fn relative_luminance(rgb: [f64; 3]) -> f64 {
    let [r, g, b] = rgb.map(srgb_to_linear);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Contrast ratio between two opaque colors, from 1.0 to 21.0
pub fn contrast_ratio(a: [f64; 3], b: [f64; 3]) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast of `foreground` drawn on `background`. The background is
/// composited over white first, then the foreground over that.
pub fn color_contrast(foreground: &ColorValue, background: &ColorValue) -> f64 {
    let backdrop = background.over(WHITE);
    let text = foreground.over(backdrop);
    contrast_ratio(text, backdrop)
}
