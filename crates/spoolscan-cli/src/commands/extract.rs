//! Extract command - pull facts out of a single text file, image, or stdin.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use spoolscan_core::FactExtractor;

use super::{format_report, load_config, read_text, OutputFormat};
use crate::ocr::CommandRecognizer;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (OCR text or image), or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show which rule produced each fact
    #[arg(long)]
    explain: bool,

    /// OCR program to run on images, overriding the config
    #[arg(long)]
    ocr_command: Option<String>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(command) = args.ocr_command.clone() {
        config.ocr.command = command;
    }

    let extractor = FactExtractor::from_config(&config.extraction)?;
    let recognizer = CommandRecognizer::new(config.ocr.clone());

    info!("Processing input: {}", args.input.display());

    let spinner = if config.ocr.is_image(&args.input) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message(format!("Running OCR on {}...", args.input.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let text = read_text(&args.input, &config, &recognizer).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let text = text?;

    let report = extractor.explain(&text);
    match report.facts.found_count() {
        0 => eprintln!("{} No print time, price or weight found.", style("ℹ").blue()),
        3 => {}
        found => eprintln!("{} Found {} of 3 facts.", style("ℹ").blue(), found),
    }

    let output = format_report(&report, args.format, args.explain)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
