//! Batch processing of token files
//!
//! Discovers `.json` files under a directory and runs each through the
//! pipeline, sequentially or on a bounded pool of worker threads. Every file
//! gets its own logging file context so the error collector can report per file.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::compile_time::file_processing::MAX_FILE_SIZE;
use crate::logging::codes;
use crate::pipeline::{self, PipelineConfig, PipelineError, PipelineOutput, PipelineResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    pub fail_fast: bool,
    pub pipeline: PipelineConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: std::thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(4),
            recursive: true,
            max_files: None,
            progress_reporting: true,
            fail_fast: false,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Worker count clamped to the compile-time ceiling
    pub fn effective_threads(&self) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS)
    }

    fn file_limit(&self) -> usize {
        self.max_files
            .map_or(MAX_FILES_PER_BATCH, |max| max.min(MAX_FILES_PER_BATCH))
    }
}

/// Batch processing results
#[derive(Debug)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self {
            successful_files: Vec::new(),
            failed_files: Vec::new(),
            processing_duration: Duration::new(0, 0),
            files_processed: 0,
            files_discovered: 0,
        }
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    /// Validation issues across all processed documents
    pub fn issue_count(&self) -> usize {
        self.successful_files
            .iter()
            .map(|(_, result)| result.summary.issue_count)
            .sum()
    }

    /// No failures and no issues
    pub fn is_clean(&self) -> bool {
        self.failed_files.is_empty() && self.issue_count() == 0
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    pub fn add_success(&mut self, file_path: PathBuf, result: PipelineResult) {
        self.successful_files.push((file_path, result));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.successful_files.extend(other.successful_files);
        self.failed_files.extend(other.failed_files);
        self.files_processed += other.files_processed;
    }

    /// Order results by path so reports do not depend on thread scheduling
    pub fn sort(&mut self) {
        self.successful_files.sort_by(|a, b| a.0.cmp(&b.0));
        self.failed_files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} files processed, {} successful ({:.1}%), {} failed, {} issues, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.issue_count(),
            self.processing_duration.as_secs_f64()
        )
    }

    pub fn to_output(&self) -> BatchOutput {
        BatchOutput {
            generated_at: Utc::now(),
            files: self
                .successful_files
                .iter()
                .map(|(_, result)| result.to_output())
                .collect(),
            failures: self
                .failed_files
                .iter()
                .map(|(path, error)| BatchFailure {
                    source: path.display().to_string(),
                    code: error.error_code().as_str(),
                    message: error.to_string(),
                })
                .collect(),
        }
    }
}

impl Default for BatchResults {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable report for a whole batch
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutput {
    pub generated_at: DateTime<Utc>,
    pub files: Vec<PipelineOutput>,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Serialize)]
pub struct BatchFailure {
    pub source: String,
    pub code: &'static str,
    pub message: String,
}

/// Batch processing errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Permission denied accessing directory: {path}")]
    PermissionDenied { path: String },

    #[error("No token files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("Too many files found: more than {max}")]
    TooManyFiles { max: usize },

    #[error("IO error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Thread pool error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> codes::Code {
        match self {
            BatchError::ThreadError { .. } => codes::batch::WORKER_FAILED,
            _ => codes::batch::DISCOVERY_FAILED,
        }
    }
}

fn io_error(dir_path: &Path, error: std::io::Error) -> BatchError {
    match error.kind() {
        std::io::ErrorKind::PermissionDenied => BatchError::PermissionDenied {
            path: dir_path.display().to_string(),
        },
        _ => BatchError::IoError {
            error: format!("{}: {}", dir_path.display(), error),
        },
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Discover token files in a directory
pub fn discover_token_files(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    let result = discover(dir_path, config);
    if let Err(error) = &result {
        crate::log_error!(error.error_code(), &error.to_string(),
            "directory" => dir_path.display());
    }
    result
}

fn discover(dir_path: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    if !dir_path.is_dir() {
        return Err(BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        });
    }

    let mut files = Vec::new();
    visit_directory(dir_path, &mut files, config.recursive)?;

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        });
    }

    // Sort files for deterministic processing order
    files.sort();

    if config.max_files.is_none() && files.len() > MAX_FILES_PER_BATCH {
        return Err(BatchError::TooManyFiles {
            max: MAX_FILES_PER_BATCH,
        });
    }

    let limit = config.file_limit();
    if files.len() > limit {
        crate::log_warning!(codes::batch::DISCOVERY_FAILED,
            "Reached maximum file limit, remaining files skipped",
            "files_found" => files.len(),
            "limit" => limit
        );
        files.truncate(limit);
    }

    crate::log_debug!("File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

fn visit_directory(
    dir_path: &Path,
    files: &mut Vec<PathBuf>,
    recursive: bool,
) -> Result<(), BatchError> {
    let entries = fs::read_dir(dir_path).map_err(|e| io_error(dir_path, e))?;

    for entry in entries {
        let path = entry.map_err(|e| io_error(dir_path, e))?.path();

        if path.is_dir() {
            if recursive {
                visit_directory(&path, files, recursive)?;
            }
        } else if is_token_file(&path) {
            files.push(path);
            // One past the ceiling is enough to know it was exceeded
            if files.len() > MAX_FILES_PER_BATCH {
                return Ok(());
            }
        }
    }

    Ok(())
}

/// Check if a path is a `.json` file
fn is_token_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Validate files before processing
fn validate_files(files: &[PathBuf]) -> (Vec<PathBuf>, Vec<(PathBuf, String)>) {
    let mut valid_files = Vec::new();
    let mut invalid_files = Vec::new();

    for file in files {
        match validate_single_file(file) {
            Ok(()) => valid_files.push(file.clone()),
            Err(reason) => invalid_files.push((file.clone(), reason)),
        }
    }

    for (file_path, reason) in &invalid_files {
        crate::log_error!(
            codes::file_processing::INVALID_PATH,
            "File skipped before processing",
            "file" => file_path.display(),
            "reason" => reason
        );
    }

    (valid_files, invalid_files)
}

fn validate_single_file(file_path: &Path) -> Result<(), String> {
    if !file_path.is_file() {
        return Err("Path is not a file".to_string());
    }

    let metadata =
        fs::metadata(file_path).map_err(|e| format!("Cannot read file metadata: {}", e))?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(format!(
            "File too large: {} bytes (max: {} bytes)",
            metadata.len(),
            MAX_FILE_SIZE
        ));
    }

    Ok(())
}

fn process_one(
    file_path: &Path,
    file_id: usize,
    config: &PipelineConfig,
) -> Result<PipelineResult, PipelineError> {
    pipeline::process_file_with_id(&file_path.to_string_lossy(), file_id, config)
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

/// Process a directory of token files sequentially
pub fn process_directory_sequential(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();

    crate::log_info!("Starting sequential batch processing",
        "directory" => dir_path.display()
    );

    let discovered_files = discover_token_files(dir_path, config)?;
    let (valid_files, _) = validate_files(&discovered_files);

    let mut results = BatchResults::new();
    results.files_discovered = discovered_files.len();

    for (file_id, file_path) in valid_files.iter().enumerate() {
        if config.progress_reporting {
            println!(
                "Processing file {} of {}: {}",
                file_id + 1,
                valid_files.len(),
                file_path.display()
            );
        }

        match process_one(file_path, file_id, &config.pipeline) {
            Ok(pipeline_result) => results.add_success(file_path.clone(), pipeline_result),
            Err(pipeline_error) => {
                results.add_failure(file_path.clone(), pipeline_error);
                if config.fail_fast {
                    crate::log_info!("Fail-fast mode enabled, stopping batch processing");
                    break;
                }
            }
        }
    }

    results.processing_duration = start_time.elapsed();
    log_batch_complete(&results, "sequential", 1);

    Ok(results)
}

/// Process files in parallel on a bounded pool of worker threads
pub fn process_directory_parallel(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let threads = config.effective_threads();

    crate::log_info!("Starting parallel batch processing",
        "directory" => dir_path.display(),
        "max_threads" => threads
    );

    let discovered_files = discover_token_files(dir_path, config)?;
    let (valid_files, _) = validate_files(&discovered_files);

    let mut results = BatchResults::new();
    results.files_discovered = discovered_files.len();

    if valid_files.is_empty() {
        results.processing_duration = start_time.elapsed();
        return Ok(results);
    }

    // Each chunk gives every worker up to `chunk_size` files
    let chunk_size = calculate_chunk_size(&valid_files, threads);
    let files_per_chunk = chunk_size * threads;

    crate::log_debug!("Parallel processing configuration",
        "total_files" => valid_files.len(),
        "chunk_size" => chunk_size,
        "threads" => threads
    );

    let pipeline_config = Arc::new(config.pipeline.clone());
    for (chunk_index, chunk) in valid_files.chunks(files_per_chunk).enumerate() {
        let first_id = chunk_index * files_per_chunk;
        let chunk_results = process_chunk_parallel(chunk, first_id, threads, &pipeline_config)?;
        results.merge(chunk_results);

        if config.fail_fast && results.failure_count() > 0 {
            crate::log_info!("Fail-fast mode enabled, stopping batch processing");
            break;
        }
    }

    results.sort();
    results.processing_duration = start_time.elapsed();
    log_batch_complete(&results, "parallel", threads);

    Ok(results)
}

/// Process a chunk of files in parallel
fn process_chunk_parallel(
    files: &[PathBuf],
    first_id: usize,
    threads: usize,
    pipeline_config: &Arc<PipelineConfig>,
) -> Result<BatchResults, BatchError> {
    let results = Arc::new(Mutex::new(BatchResults::new()));

    let mut handles = Vec::new();
    let files_per_thread = files.len().div_ceil(threads);

    for thread_id in 0..threads {
        let start_idx = thread_id * files_per_thread;
        let end_idx = ((thread_id + 1) * files_per_thread).min(files.len());

        if start_idx >= files.len() {
            break;
        }

        let thread_files: Vec<PathBuf> = files[start_idx..end_idx].to_vec();
        let results_clone = Arc::clone(&results);
        let config = Arc::clone(pipeline_config);

        let handle = thread::spawn(move || {
            for (local_file_id, file_path) in thread_files.iter().enumerate() {
                let file_id = first_id + start_idx + local_file_id;
                let outcome = process_one(file_path, file_id, &config);

                let mut results_guard = results_clone.lock().unwrap_or_else(PoisonError::into_inner);
                match outcome {
                    Ok(pipeline_result) => results_guard.add_success(file_path.clone(), pipeline_result),
                    Err(pipeline_error) => results_guard.add_failure(file_path.clone(), pipeline_error),
                }
            }
        });

        handles.push(handle);
    }

    for handle in handles {
        handle.join().map_err(|_| {
            let error = BatchError::ThreadError {
                message: "Worker thread panicked during processing".to_string(),
            };
            crate::log_error!(error.error_code(), &error.to_string());
            error
        })?;
    }

    let final_results = Arc::try_unwrap(results)
        .map_err(|_| BatchError::ThreadError {
            message: "Failed to extract results from thread pool".to_string(),
        })?
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);

    Ok(final_results)
}

/// Calculate chunk size for parallel processing
fn calculate_chunk_size(files: &[PathBuf], max_threads: usize) -> usize {
    const MIN_CHUNK_SIZE: usize = 1;
    const MAX_CHUNK_SIZE: usize = 50;

    let ideal_chunk_size = files.len().div_ceil(max_threads.max(1));
    ideal_chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

fn log_batch_complete(results: &BatchResults, mode: &str, threads: usize) {
    crate::log_success!(
        codes::success::BATCH_COMPLETE,
        "Batch processing completed",
        "mode" => mode,
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "issues" => results.issue_count(),
        "threads_used" => threads,
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Process a directory with custom configuration
pub fn process_directory_with_config(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if config.effective_threads() == 1 {
        process_directory_sequential(dir_path, config)
    } else {
        process_directory_parallel(dir_path, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    const CLEAN: &str = r#"{"brand": {"space": {"$type": "dimension", "$value": "8px"}}}"#;
    const SMALL_FONT: &str =
        r#"{"brand": {"text": {"$type": "fontSize", "$value": "10px"}}}"#;

    fn quiet_config(threads: usize) -> BatchConfig {
        BatchConfig {
            max_threads: threads,
            progress_reporting: false,
            ..BatchConfig::default()
        }
    }

    #[test]
    fn test_file_discovery() {
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path();

        fs::write(temp_path.join("a.json"), CLEAN).unwrap();
        fs::write(temp_path.join("b.JSON"), CLEAN).unwrap();
        fs::write(temp_path.join("notes.txt"), "not tokens").unwrap();
        fs::create_dir(temp_path.join("nested")).unwrap();
        fs::write(temp_path.join("nested").join("c.json"), CLEAN).unwrap();

        let files = discover_token_files(temp_path, &quiet_config(1)).unwrap();
        assert_eq!(files.len(), 3);

        let flat = BatchConfig {
            recursive: false,
            ..quiet_config(1)
        };
        assert_eq!(discover_token_files(temp_path, &flat).unwrap().len(), 2);
    }

    #[test]
    fn test_discovery_errors() {
        let temp_dir = tempdir().unwrap();
        assert_matches!(
            discover_token_files(temp_dir.path(), &quiet_config(1)),
            Err(BatchError::NoFilesFound { .. })
        );
        assert_matches!(
            discover_token_files(&temp_dir.path().join("missing"), &quiet_config(1)),
            Err(BatchError::DirectoryNotFound { .. })
        );
    }

    #[test]
    fn test_max_files_truncates() {
        let temp_dir = tempdir().unwrap();
        for name in ["a.json", "b.json", "c.json"] {
            fs::write(temp_dir.path().join(name), CLEAN).unwrap();
        }

        let config = BatchConfig {
            max_files: Some(2),
            ..quiet_config(1)
        };
        let files = discover_token_files(temp_dir.path(), &config).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.json"));
    }

    #[test]
    fn test_file_validation() {
        let temp_dir = tempdir().unwrap();
        let valid_file = temp_dir.path().join("valid.json");
        fs::write(&valid_file, CLEAN).unwrap();

        let files = vec![valid_file, temp_dir.path().join("nonexistent.json")];
        let (valid, invalid) = validate_files(&files);

        assert_eq!(valid.len(), 1);
        assert_eq!(invalid.len(), 1);
    }

    #[test]
    fn test_is_token_file() {
        let temp_dir = tempdir().unwrap();
        let json_file = temp_dir.path().join("tokens.json");
        let txt_file = temp_dir.path().join("tokens.txt");
        fs::write(&json_file, CLEAN).unwrap();
        fs::write(&txt_file, CLEAN).unwrap();

        assert!(is_token_file(&json_file));
        assert!(!is_token_file(&txt_file));
        assert!(!is_token_file(temp_dir.path()));
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.json"), CLEAN).unwrap();
        fs::write(temp_dir.path().join("b.json"), SMALL_FONT).unwrap();
        fs::write(temp_dir.path().join("c.json"), "[1, 2]").unwrap();

        let sequential = process_directory_with_config(temp_dir.path(), &quiet_config(1)).unwrap();
        let parallel = process_directory_with_config(temp_dir.path(), &quiet_config(3)).unwrap();

        for results in [&sequential, &parallel] {
            assert_eq!(results.files_discovered, 3);
            assert_eq!(results.success_count(), 2);
            assert_eq!(results.failure_count(), 1);
            assert_eq!(results.issue_count(), 1);
            assert!(!results.is_clean());
        }

        let paths: Vec<_> = parallel.successful_files.iter().map(|(p, _)| p.clone()).collect();
        assert!(paths[0].ends_with("a.json"));
        assert!(paths[1].ends_with("b.json"));
    }

    #[test]
    fn test_fail_fast_stops_sequential_run() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.json"), "{ broken").unwrap();
        fs::write(temp_dir.path().join("b.json"), CLEAN).unwrap();

        let config = BatchConfig {
            fail_fast: true,
            ..quiet_config(1)
        };
        let results = process_directory_with_config(temp_dir.path(), &config).unwrap();
        assert_eq!(results.files_processed, 1);
        assert_eq!(results.failure_count(), 1);
    }

    #[test]
    fn test_batch_output() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.json"), SMALL_FONT).unwrap();
        fs::write(temp_dir.path().join("b.json"), "{ broken").unwrap();

        let results = process_directory_with_config(temp_dir.path(), &quiet_config(1)).unwrap();
        let output = serde_json::to_value(results.to_output()).unwrap();

        assert!(output["generatedAt"].is_string());
        assert_eq!(output["files"][0]["issues"][0]["code"], "FONT_SIZE_TOO_SMALL");
        assert_eq!(output["failures"][0]["code"], "E020");
    }

    #[test]
    fn test_chunk_size_calculation() {
        assert_eq!(calculate_chunk_size(&vec![PathBuf::new(); 100], 4), 25);
        assert_eq!(calculate_chunk_size(&vec![PathBuf::new(); 10], 4), 3);
        assert_eq!(calculate_chunk_size(&vec![PathBuf::new(); 1], 4), 1);
        assert_eq!(calculate_chunk_size(&vec![PathBuf::new(); 200], 4), 50);
    }

    #[test]
    fn test_batch_config_default() {
        let config = BatchConfig::default();
        assert!(config.max_threads >= 1);
        assert!(config.max_threads <= MAX_WORKER_THREADS);
        assert!(config.recursive);
        assert!(!config.fail_fast);
        assert!(config.max_files.is_none());
    }
}
