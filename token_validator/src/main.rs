use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use token_validator::config::RuntimeConfig;
use token_validator::pipeline::{PipelineConfig, PipelineResult};
use token_validator::{batch, logging, pipeline};

/// Parsed command line
#[derive(Debug)]
struct CliOptions {
    input: String,
    json: bool,
    output: Option<PathBuf>,
    accessibility_config: Option<PathBuf>,
    quiet: bool,
    batch: batch::BatchConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = RuntimeConfig::default();
    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    logging::init_global_logging()?;
    pipeline::validate_pipeline()?;

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("token_validator");

    if args.iter().skip(1).any(|arg| arg == "--help" || arg == "-h") {
        print_help(program);
        return Ok(());
    }

    let mut options = match parse_args(&args[1..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} <file.json|directory> [options]", program);
            eprintln!("       {} --help", program);
            std::process::exit(1);
        }
    };

    let mut pipeline_config = PipelineConfig::from_runtime(&runtime);
    if let Some(path) = &options.accessibility_config {
        pipeline_config = match pipeline_config.with_accessibility_file(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Error: {}", error);
                std::process::exit(1);
            }
        };
    }
    options.batch.pipeline = pipeline_config;

    let input_path = Path::new(&options.input);
    let clean = if input_path.is_file() {
        process_single_file(&options)?
    } else if input_path.is_dir() {
        process_directory_batch(input_path, &options)?
    } else {
        eprintln!("Error: Input must be a token file (.json) or directory");
        eprintln!("  Path: {}", input_path.display());
        false
    };

    if !options.quiet && logging::config::use_cargo_style_output() {
        print_cargo_style_summary();
    }

    if !clean {
        std::process::exit(1);
    }
    Ok(())
}

fn print_help(program_name: &str) {
    println!("Design Token Validator v{}", env!("CARGO_PKG_VERSION"));
    println!("Normalizes, resolves and validates design token files");
    println!();
    println!("USAGE:");
    println!("    {} <file.json> [options]          # Process single file", program_name);
    println!("    {} <directory> [options]          # Process directory", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help                      Show this help message");
    println!("    --json                      Print the JSON report to stdout");
    println!("    --output FILE               Write the JSON report to FILE");
    println!("    --accessibility-config FILE Load contrast rules and scale steps from TOML");
    println!("    --sequential                Force sequential processing (no parallelism)");
    println!("    --threads N                 Set maximum number of threads (default: auto)");
    println!("    --no-recursive              Don't search subdirectories");
    println!("    --max-files N               Limit maximum files to process");
    println!("    --fail-fast                 Stop on first file that cannot be processed");
    println!("    --quiet                     Suppress progress and log summaries");
    println!();
    println!("EXIT STATUS:");
    println!("    0 when every document was processed and no issues were found, 1 otherwise");
    println!();
    println!("EXAMPLES:");
    println!("    {} tokens.json", program_name);
    println!("    {} tokens/ --threads 4 --json --output report.json", program_name);
    println!("    {} tokens/ --sequential --fail-fast", program_name);
    println!();

    let pipeline_info = pipeline::get_pipeline_info();
    println!("PIPELINE CAPABILITIES:");
    for line in pipeline_info.report().lines() {
        println!("    {}", line);
    }
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut input = None;
    let mut options = CliOptions {
        input: String::new(),
        json: false,
        output: None,
        accessibility_config: None,
        quiet: false,
        batch: batch::BatchConfig::default(),
    };

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--json" => options.json = true,
            "--sequential" => options.batch.max_threads = 1,
            "--no-recursive" => options.batch.recursive = false,
            "--fail-fast" => options.batch.fail_fast = true,
            "--quiet" => {
                options.quiet = true;
                options.batch.progress_reporting = false;
            }
            "--output" | "--accessibility-config" | "--threads" | "--max-files" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{} requires a value", arg))?;
                i += 1;
                match arg {
                    "--output" => options.output = Some(PathBuf::from(value)),
                    "--accessibility-config" => {
                        options.accessibility_config = Some(PathBuf::from(value))
                    }
                    "--threads" => options.batch.max_threads = parse_count(arg, value)?.max(1),
                    _ => options.batch.max_files = Some(parse_count(arg, value)?),
                }
            }
            _ if arg.starts_with("--") => return Err(format!("Unknown option '{}'", arg)),
            _ if input.is_none() => input = Some(arg.to_string()),
            _ => return Err(format!("Unexpected argument '{}'", arg)),
        }
        i += 1;
    }

    options.input = input.ok_or("Missing input file or directory")?;
    Ok(options)
}

fn parse_count(option: &str, value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", option, value))
}

/// Returns whether the file was processed without issues
fn process_single_file(options: &CliOptions) -> Result<bool, Box<dyn std::error::Error>> {
    if !options.quiet && !options.json {
        println!("Processing file: {}", options.input);
    }

    match pipeline::process_file(&options.input, &options.batch.pipeline) {
        Ok(result) => {
            let output = result.to_output();
            emit_json(options, &output.to_json_pretty()?)?;
            if !options.json {
                print_result(&options.input, &result);
            }
            Ok(!result.has_issues())
        }
        Err(error) => {
            eprintln!("\nFAILED [{}]: {}", error.error_code(), error);
            Ok(false)
        }
    }
}

/// Returns whether every file was processed without issues
fn process_directory_batch(
    dir_path: &Path,
    options: &CliOptions,
) -> Result<bool, Box<dyn std::error::Error>> {
    let config = &options.batch;
    if !options.quiet && !options.json {
        println!("Starting batch processing: {}", dir_path.display());
        println!(
            "Configuration: {} threads, recursive={}, fail_fast={}",
            config.effective_threads(),
            config.recursive,
            config.fail_fast
        );
        if let Some(max_files) = config.max_files {
            println!("File limit: {} files maximum", max_files);
        }
    }

    match batch::process_directory_with_config(dir_path, config) {
        Ok(results) => {
            let output = results.to_output();
            emit_json(options, &serde_json::to_string_pretty(&output)?)?;
            if !options.json {
                print_batch_results(&results);
            }
            Ok(results.is_clean())
        }
        Err(error) => {
            eprintln!("Batch processing failed [{}]: {}", error.error_code(), error);
            Ok(false)
        }
    }
}

fn emit_json(options: &CliOptions, json: &str) -> std::io::Result<()> {
    if let Some(path) = &options.output {
        fs::write(path, json)?;
    } else if options.json {
        println!("{}", json);
    }
    Ok(())
}

fn print_result(source: &str, result: &PipelineResult) {
    for issue in &result.issues {
        println!("  {} {}: {}", issue.code(), issue.path(), issue.message());
    }
    println!("{}: {}", source, result.summary.report());
}

fn print_batch_results(results: &batch::BatchResults) {
    println!("\nBatch Processing Summary:");
    println!("  Files discovered: {}", results.files_discovered);
    println!("  Files processed: {}", results.files_processed);
    println!(
        "  Successful: {} ({:.1}%)",
        results.success_count(),
        results.success_rate() * 100.0
    );
    println!("  Failed: {}", results.failure_count());
    println!("  Issues: {}", results.issue_count());
    println!(
        "  Total time: {:.2}s",
        results.processing_duration.as_secs_f64()
    );

    if results.failure_count() > 0 {
        println!("\nFailed Files:");
        for (file_path, error) in &results.failed_files {
            println!("  {} [{}]: {}", file_path.display(), error.error_code(), error);
        }
    }

    let with_issues: Vec<_> = results
        .successful_files
        .iter()
        .filter(|(_, result)| result.has_issues())
        .collect();
    if !with_issues.is_empty() {
        println!("\nFiles With Issues:");
        for (file_path, result) in with_issues {
            print_result(&file_path.display().to_string(), result);
        }
    }
}

fn print_cargo_style_summary() {
    if let Some(report) = logging::cargo_style_summary() {
        if !report.trim().is_empty() {
            eprintln!("{}", report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = parse_args(&args(&[
            "tokens/",
            "--threads",
            "4",
            "--fail-fast",
            "--no-recursive",
            "--json",
            "--output",
            "report.json",
        ]))
        .unwrap();

        assert_eq!(options.input, "tokens/");
        assert_eq!(options.batch.max_threads, 4);
        assert!(options.batch.fail_fast);
        assert!(!options.batch.recursive);
        assert!(options.json);
        assert_eq!(options.output, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_quiet_and_sequential() {
        let options = parse_args(&args(&["tokens.json", "--quiet", "--sequential"])).unwrap();
        assert!(options.quiet);
        assert!(!options.batch.progress_reporting);
        assert_eq!(options.batch.max_threads, 1);
    }

    #[test]
    fn test_parse_errors() {
        assert_matches!(parse_args(&args(&[])), Err(message) if message.contains("Missing input"));
        assert_matches!(parse_args(&args(&["a.json", "--threads"])), Err(_));
        assert_matches!(parse_args(&args(&["a.json", "--threads", "many"])), Err(_));
        assert_matches!(parse_args(&args(&["a.json", "--bogus"])), Err(_));
        assert_matches!(parse_args(&args(&["a.json", "b.json"])), Err(_));
    }
}
