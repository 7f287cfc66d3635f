use crate::logging::codes::{self, Code};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CodecError {
    #[error("Unsupported unit '{unit}' in '{input}', expected px or rem")]
    UnsupportedUnit { input: String, unit: String },

    #[error("Malformed {kind} value '{input}'")]
    Malformed { kind: &'static str, input: String },
}

impl CodecError {
    pub fn unsupported_unit(input: &str, unit: &str) -> Self {
        Self::UnsupportedUnit {
            input: input.to_string(),
            unit: unit.to_string(),
        }
    }

    pub fn malformed(kind: &'static str, input: impl ToString) -> Self {
        Self::Malformed {
            kind,
            input: input.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnsupportedUnit { .. } => codes::codecs::UNSUPPORTED_UNIT,
            Self::Malformed { .. } => codes::codecs::MALFORMED_VALUE,
        }
    }
}
