use crate::config::AccessibilityConfig;
use crate::tree::Token;
use crate::utils::TokenPath;

/// Color-scale position for a color token, if its name ends in a scale step
pub fn position_for(path: &TokenPath, token: &Token, config: &AccessibilityConfig) -> Option<usize> {
    if token.type_name() != Some("color") {
        return None;
    }
    path.name().and_then(|name| config.scale_position(name))
}
