//! image-preprocess CLI: batch median filtering and histogram equalization.

use std::path::PathBuf;

use clap::Parser;
use image_preprocess::config::AppConfig;
use image_preprocess::logging::init_logging;
use image_preprocess::pipeline::{process_and_save, process_directory};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "image-preprocess")]
#[command(about = "Equalize, median-filter and re-equalize raster images (png, jpg, jpeg, bmp)")]
#[command(version)]
struct Cli {
    /// Directory of input images [default: data/raw].
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Process a single image instead of a directory.
    #[arg(long, conflicts_with = "input_dir")]
    input: Option<PathBuf>,

    /// Directory receiving `<stem>_equalized<ext>` and `<stem>_processed<ext>`
    /// [default: data/preprocessed].
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Median kernel size, odd and at most 255 [default: 5].
    #[arg(long)]
    ksize: Option<usize>,

    /// TOML configuration file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. "info" or "image_preprocess=debug".
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging.level, config.logging.json);

    if let Err(e) = run(&cli, &config) {
        tracing::error!(error = %e, "preprocessing failed");
        std::process::exit(1);
    }
}

/// Merge the optional config file with command-line overrides and validate.
fn load_config(cli: &Cli) -> CliResult<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(dir) = &cli.input_dir {
        config.paths.input_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.paths.output_dir = dir.clone();
    }
    if let Some(ksize) = cli.ksize {
        config.pipeline.kernel_size = ksize;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json_logs {
        config.logging.json = true;
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli, config: &AppConfig) -> CliResult<()> {
    let ksize = config.pipeline.kernel_size;
    let output_dir = &config.paths.output_dir;

    if let Some(input) = &cli.input {
        let result = process_and_save(input, output_dir, ksize)?;
        tracing::info!(
            equalized = %result.equalized_path.display(),
            processed = %result.processed_path.display(),
            "done"
        );
        return Ok(());
    }

    let report = process_directory(&config.paths.input_dir, output_dir, ksize)?;
    if report.succeeded() == 0 && report.failed() > 0 {
        return Err(format!("all {} input files failed", report.failed()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::try_parse_from(["image-preprocess"]).unwrap();
        let config = load_config(&cli).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "image-preprocess",
            "--input-dir",
            "in",
            "--output-dir",
            "out",
            "--ksize",
            "3",
            "--json-logs",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();

        assert_eq!(config.paths.input_dir, PathBuf::from("in"));
        assert_eq!(config.paths.output_dir, PathBuf::from("out"));
        assert_eq!(config.pipeline.kernel_size, 3);
        assert!(config.logging.json);
    }

    #[test]
    fn test_even_ksize_rejected_up_front() {
        let cli = Cli::try_parse_from(["image-preprocess", "--ksize", "4"]).unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_input_conflicts_with_input_dir() {
        let parsed = Cli::try_parse_from([
            "image-preprocess",
            "--input",
            "a.png",
            "--input-dir",
            "raw",
        ]);
        assert!(parsed.is_err());
    }
}
