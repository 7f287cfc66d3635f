use crate::config::AccessibilityConfig;
use crate::logging::codes;

/// Validate that the pipeline is properly configured
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::file_processor::init_file_processor_logging()?;

    let stage_codes = [
        codes::document::ROOT_NOT_OBJECT,
        codes::document::TREE_TOO_DEEP,
        codes::document::TOO_MANY_TOKENS,
        codes::document::IDENTIFIER_TOO_LONG,
        codes::codecs::UNPARSEABLE_COLOR,
        codes::codecs::UNSUPPORTED_UNIT,
        codes::codecs::MALFORMED_VALUE,
        codes::normalization::LEGACY_VALUE_NOT_CONVERTED,
        codes::references::INVALID_REFERENCE,
        codes::references::CIRCULAR_REFERENCE,
        codes::references::REFERENCE_DEPTH_EXCEEDED,
        codes::references::REFERENCE_TYPE_MISMATCH,
        codes::accessibility::MALFORMED_CONTRAST_ANNOTATION,
        codes::accessibility::INSUFFICIENT_CONTRAST,
        codes::validation::UNEXPECTED_UNIT,
        codes::validation::FONT_SIZE_TOO_SMALL,
        codes::validation::LINE_HEIGHT_TOO_SMALL,
    ];
    for code in &stage_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Pipeline code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    AccessibilityConfig::default()
        .validate()
        .map_err(|e| format!("Default accessibility configuration is invalid: {}", e))?;

    crate::log_success!(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => super::info::STAGES.len(),
        "codes_checked" => stage_codes.len()
    );

    Ok(())
}
