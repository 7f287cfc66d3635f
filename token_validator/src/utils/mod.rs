//! Shared primitive types used across the pipeline stages

pub mod number;
pub mod path;

pub use number::{json_number, round_to};
pub use path::TokenPath;
