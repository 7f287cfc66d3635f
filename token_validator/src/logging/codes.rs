//! Consolidated error codes and classification system
//!
//! Single source of truth for all log codes and their metadata. Validation
//! issue codes (`INVALID_REF`, ...) are part of the output format and live in
//! `validation::issues`; each of them maps onto one of the codes below when it
//! is logged.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a log code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Token document structure codes
pub mod document {
    use super::Code;

    pub const INVALID_JSON: Code = Code::new("E020");
    pub const ROOT_NOT_OBJECT: Code = Code::new("E021");
    pub const TREE_TOO_DEEP: Code = Code::new("E022");
    pub const TOO_MANY_TOKENS: Code = Code::new("E023");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E024");
}

/// Value codec codes
pub mod codecs {
    use super::Code;

    pub const UNPARSEABLE_COLOR: Code = Code::new("E040");
    pub const UNSUPPORTED_UNIT: Code = Code::new("E041");
    pub const MALFORMED_VALUE: Code = Code::new("E042");
}

/// Legacy normalization codes
pub mod normalization {
    use super::Code;

    pub const LEGACY_VALUE_NOT_CONVERTED: Code = Code::new("E060");
}

/// Reference resolution codes
pub mod references {
    use super::Code;

    pub const INVALID_REFERENCE: Code = Code::new("E110");
    pub const CIRCULAR_REFERENCE: Code = Code::new("E111");
    pub const REFERENCE_DEPTH_EXCEEDED: Code = Code::new("E112");
    pub const REFERENCE_TYPE_MISMATCH: Code = Code::new("E113");
}

/// Accessibility annotation and contrast codes
pub mod accessibility {
    use super::Code;

    pub const MALFORMED_CONTRAST_ANNOTATION: Code = Code::new("E130");
    pub const INSUFFICIENT_CONTRAST: Code = Code::new("E140");
}

/// Numeric constraint and validator bookkeeping codes
pub mod validation {
    use super::Code;

    pub const UNEXPECTED_UNIT: Code = Code::new("E150");
    pub const FONT_SIZE_TOO_SMALL: Code = Code::new("E151");
    pub const LINE_HEIGHT_TOO_SMALL: Code = Code::new("E152");
}

/// Batch processing codes
pub mod batch {
    use super::Code;

    pub const DISCOVERY_FAILED: Code = Code::new("E180");
    pub const WORKER_FAILED: Code = Code::new("E181");
}

/// Success and milestone codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I004");
    pub const DOCUMENT_LOADED: Code = Code::new("I020");
    pub const NORMALIZATION_COMPLETE: Code = Code::new("I030");
    pub const METADATA_STRIPPED: Code = Code::new("I035");
    pub const ANNOTATION_COMPLETE: Code = Code::new("I040");
    pub const REFERENCE_RESOLUTION_COMPLETE: Code = Code::new("I060");
    pub const REFERENCES_INLINED: Code = Code::new("I061");
    pub const VALIDATION_COMPLETE: Code = Code::new("I080");
    pub const PIPELINE_COMPLETE: Code = Code::new("I090");
    pub const BATCH_COMPLETE: Code = Code::new("I095");
}

// ============================================================================
// CODE REGISTRY
// ============================================================================

type Entry = (
    Code,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

// (code, category, severity, recoverable, requires_halt, description, action)
const REGISTRY_ENTRIES: &[Entry] = &[
    (
        system::INTERNAL_ERROR,
        "System",
        Severity::Critical,
        false,
        true,
        "Internal validator error",
        "Report the failing document together with the log output",
    ),
    (
        system::INITIALIZATION_FAILURE,
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or configuration initialization failed",
        "Check TOKENS_* environment variables and configuration files",
    ),
    (
        file_processing::FILE_NOT_FOUND,
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Token file not found",
        "Verify the path and that the file exists",
    ),
    (
        file_processing::INVALID_EXTENSION,
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Token file does not have a .json extension",
        "Rename the file or unset TOKENS_REQUIRE_JSON_EXTENSION",
    ),
    (
        file_processing::FILE_TOO_LARGE,
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Token file exceeds the configured size limit",
        "Split the token file or raise max_file_size in the build profile",
    ),
    (
        file_processing::EMPTY_FILE,
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Token file is empty",
        "Provide a JSON object with token groups",
    ),
    (
        file_processing::PERMISSION_DENIED,
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Permission denied reading token file",
        "Check file permissions",
    ),
    (
        file_processing::INVALID_ENCODING,
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Token file is not valid UTF-8",
        "Save the file as UTF-8",
    ),
    (
        file_processing::IO_ERROR,
        "FileProcessing",
        Severity::High,
        false,
        true,
        "I/O error while reading token file",
        "Check disk and filesystem health",
    ),
    (
        file_processing::INVALID_PATH,
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Path is not a regular file",
        "Pass a token file or a directory in batch mode",
    ),
    (
        document::INVALID_JSON,
        "Document",
        Severity::High,
        false,
        true,
        "Token file is not valid JSON",
        "Fix the JSON syntax error at the reported position",
    ),
    (
        document::ROOT_NOT_OBJECT,
        "Document",
        Severity::High,
        false,
        true,
        "Token document root is not a JSON object",
        "Wrap token groups in a top-level object",
    ),
    (
        document::TREE_TOO_DEEP,
        "Document",
        Severity::High,
        false,
        true,
        "Token groups are nested deeper than the configured limit",
        "Flatten the group hierarchy or raise max_tree_depth",
    ),
    (
        document::TOO_MANY_TOKENS,
        "Document",
        Severity::High,
        false,
        true,
        "Token document contains more tokens than the configured limit",
        "Split the document or raise max_token_count",
    ),
    (
        document::IDENTIFIER_TOO_LONG,
        "Document",
        Severity::Medium,
        false,
        true,
        "Group or token name exceeds the configured length limit",
        "Shorten the name",
    ),
    (
        codecs::UNPARSEABLE_COLOR,
        "Codecs",
        Severity::Low,
        true,
        false,
        "Color string could not be parsed and was replaced with opaque black",
        "Use a hex, rgb(), hsl() or named CSS color",
    ),
    (
        codecs::UNSUPPORTED_UNIT,
        "Codecs",
        Severity::Medium,
        true,
        false,
        "Dimension uses a unit other than px or rem",
        "Express the dimension in px or rem",
    ),
    (
        codecs::MALFORMED_VALUE,
        "Codecs",
        Severity::Medium,
        true,
        false,
        "Value does not match the shape expected for its type",
        "Check the $value against the token type",
    ),
    (
        normalization::LEGACY_VALUE_NOT_CONVERTED,
        "Normalization",
        Severity::Low,
        true,
        false,
        "Legacy value could not be converted and was left untouched",
        "Review the token; the validator reports the remaining problem",
    ),
    (
        references::INVALID_REFERENCE,
        "References",
        Severity::Medium,
        true,
        false,
        "Token reference does not point at an existing token",
        "Fix the reference path or add the missing token",
    ),
    (
        references::CIRCULAR_REFERENCE,
        "References",
        Severity::Medium,
        true,
        false,
        "Token reference chain loops back on itself",
        "Break the cycle by giving one token a literal value",
    ),
    (
        references::REFERENCE_DEPTH_EXCEEDED,
        "References",
        Severity::Medium,
        true,
        false,
        "Token reference chain is longer than the configured limit",
        "Shorten the alias chain",
    ),
    (
        references::REFERENCE_TYPE_MISMATCH,
        "References",
        Severity::Medium,
        true,
        false,
        "Token references a token of a different type",
        "Reference a token of the same $type",
    ),
    (
        accessibility::MALFORMED_CONTRAST_ANNOTATION,
        "Accessibility",
        Severity::Low,
        true,
        false,
        "Existing contrast annotation is not a list and was left as is",
        "Make the contrast-with extension an array of {color, expectedRatio}",
    ),
    (
        accessibility::INSUFFICIENT_CONTRAST,
        "Accessibility",
        Severity::Medium,
        true,
        false,
        "Foreground and background colors do not reach the required contrast ratio",
        "Pick a darker or lighter color from the scale",
    ),
    (
        validation::UNEXPECTED_UNIT,
        "Validation",
        Severity::Medium,
        true,
        false,
        "Value has a unit that is not allowed for its type",
        "Use px or rem for dimensions and unitless numbers for line heights",
    ),
    (
        validation::FONT_SIZE_TOO_SMALL,
        "Validation",
        Severity::Medium,
        true,
        false,
        "Font size is below the accessible minimum",
        "Use at least 16px (1rem)",
    ),
    (
        validation::LINE_HEIGHT_TOO_SMALL,
        "Validation",
        Severity::Medium,
        true,
        false,
        "Line height is below the accessible minimum",
        "Use a unitless line height of at least 1",
    ),
    (
        batch::DISCOVERY_FAILED,
        "Batch",
        Severity::High,
        false,
        true,
        "Token file discovery failed",
        "Check the directory path and permissions",
    ),
    (
        batch::WORKER_FAILED,
        "Batch",
        Severity::High,
        false,
        false,
        "A batch worker thread panicked",
        "Re-run the affected files sequentially",
    ),
    (
        success::SYSTEM_INITIALIZATION_COMPLETED,
        "System",
        Severity::Low,
        true,
        false,
        "Logging initialized",
        "Continue",
    ),
    (
        success::FILE_PROCESSING_SUCCESS,
        "FileProcessing",
        Severity::Low,
        true,
        false,
        "Token file read successfully",
        "Continue to document loading",
    ),
    (
        success::DOCUMENT_LOADED,
        "Document",
        Severity::Low,
        true,
        false,
        "Token tree built from JSON",
        "Continue to normalization",
    ),
    (
        success::NORMALIZATION_COMPLETE,
        "Normalization",
        Severity::Low,
        true,
        false,
        "Legacy normalization completed",
        "Continue to metadata stripping",
    ),
    (
        success::METADATA_STRIPPED,
        "Metadata",
        Severity::Low,
        true,
        false,
        "Non-standard token keys removed",
        "Continue to accessibility annotation",
    ),
    (
        success::ANNOTATION_COMPLETE,
        "Accessibility",
        Severity::Low,
        true,
        false,
        "Accessibility annotations derived",
        "Continue to reference resolution",
    ),
    (
        success::REFERENCE_RESOLUTION_COMPLETE,
        "References",
        Severity::Low,
        true,
        false,
        "Token references resolved",
        "Continue to validation",
    ),
    (
        success::REFERENCES_INLINED,
        "References",
        Severity::Low,
        true,
        false,
        "Token references replaced by literal values",
        "Continue",
    ),
    (
        success::VALIDATION_COMPLETE,
        "Validation",
        Severity::Low,
        true,
        false,
        "Validation completed",
        "Review reported issues",
    ),
    (
        success::PIPELINE_COMPLETE,
        "Pipeline",
        Severity::Low,
        true,
        false,
        "Token pipeline completed",
        "Consume the validated tree",
    ),
    (
        success::BATCH_COMPLETE,
        "Batch",
        Severity::Low,
        true,
        false,
        "Batch processing completed",
        "Review the batch summary",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code.as_str(),
                        ErrorMetadata {
                            code: code.as_str(),
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
