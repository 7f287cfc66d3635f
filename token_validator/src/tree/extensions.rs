//! Reserved `$extensions` keys written and read by the pipeline

pub const NAMESPACE: &str = "nl.nldesignsystem";

/// Concrete value at the end of a reference chain
pub const RESOLVED_AS: &str = "nl.nldesignsystem.resolved-as";

/// Original reference string of a token whose `$value` was inlined
pub const RESOLVED_FROM: &str = "nl.nldesignsystem.resolved-from";

/// Array of `{ "color": ..., "expectedRatio": ... }` contrast pairs
pub const CONTRAST_WITH: &str = "nl.nldesignsystem.contrast-with";

/// 1-based position on the color scale
pub const COLOR_SCALE_POSITION: &str = "nl.nldesignsystem.color-scale-position";

/// Legacy kind a token was normalized from, e.g. `font-size`
pub const TOKEN_SUBTYPE: &str = "nl.nldesignsystem.token-subtype";

/// Keys of a contrast-pair entry
pub mod contrast_entry {
    pub const COLOR: &str = "color";
    pub const EXPECTED_RATIO: &str = "expectedRatio";
}
