//! File processor: loads token files within compile-time limits

mod processor;

pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

/// Load a token file with default settings
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    processor::process_file(file_path)
}

/// Check that every file processor code is registered (system startup)
pub fn init_file_processor_logging() -> Result<(), String> {
    use crate::logging::codes;

    let registered = [
        codes::file_processing::FILE_NOT_FOUND,
        codes::file_processing::INVALID_EXTENSION,
        codes::file_processing::FILE_TOO_LARGE,
        codes::file_processing::EMPTY_FILE,
        codes::file_processing::PERMISSION_DENIED,
        codes::file_processing::INVALID_ENCODING,
        codes::file_processing::IO_ERROR,
        codes::file_processing::INVALID_PATH,
        codes::document::INVALID_JSON,
    ];

    for code in &registered {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "File processor error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("File processor compile-time configuration loaded",
        "max_file_size" => FileProcessor::max_file_size());

    Ok(())
}
