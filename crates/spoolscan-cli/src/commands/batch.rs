//! Batch processing command for many text or image files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use spoolscan_core::{FactExtractor, FactReport, ScanConfig};

use super::{format_report, load_config, read_text, OutputFormat};
use crate::ocr::CommandRecognizer;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of files processed at once
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    report: Option<FactReport>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let extractor = FactExtractor::from_config(&config.extraction)?;
    let recognizer = CommandRecognizer::new(config.ocr.clone());

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && is_supported(p, &config))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files",
            )?
            .progress_chars("=>-"),
    );

    let mut pending = stream::iter(files)
        .map(|path| {
            let config = &config;
            let extractor = &extractor;
            let recognizer = &recognizer;
            async move {
                let file_start = Instant::now();
                let outcome = read_text(&path, config, recognizer)
                    .await
                    .map(|text| extractor.explain(&text));
                (path, outcome, file_start.elapsed().as_millis() as u64)
            }
        })
        .buffered(args.jobs.max(1));

    let mut results = Vec::new();
    while let Some((path, outcome, processing_time_ms)) = pending.next().await {
        match outcome {
            Ok(report) => results.push(ProcessResult {
                path,
                report: Some(report),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        report: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.report.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(report) = &result.report {
                let output_path = output_path_for(output_dir, &result.path, args.format);

                fs::write(&output_path, format_report(report, args.format, false)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    let without_facts = successful
        .iter()
        .filter(|r| r.report.as_ref().is_some_and(|report| report.facts.is_empty()))
        .count();
    if without_facts > 0 {
        eprintln!("   {} with no facts found", style(without_facts).yellow());
    }

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// `a.txt` and `a.png` each get their own result, `a.txt.json` and `a.png.json`.
fn output_path_for(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let file_name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("facts");
    output_dir.join(format!("{}.{}", file_name, format.extension()))
}

fn is_supported(path: &Path, config: &ScanConfig) -> bool {
    let is_text = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

    is_text || config.ocr.is_image(path)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "duration_minutes",
        "price",
        "weight_grams",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let time_ms = result.processing_time_ms.to_string();

        if let Some(report) = &result.report {
            let facts = &report.facts;
            let duration = facts.duration_minutes.map(|m| m.to_string()).unwrap_or_default();
            let price = facts.price.map(|p| p.to_string()).unwrap_or_default();
            let weight = facts.weight_grams.map(|w| w.to_string()).unwrap_or_default();

            wtr.write_record([
                filename,
                "success",
                duration.as_str(),
                price.as_str(),
                weight.as_str(),
                time_ms.as_str(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                time_ms.as_str(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported() {
        let config = ScanConfig::default();
        assert!(is_supported(Path::new("a/receipt.TXT"), &config));
        assert!(is_supported(Path::new("display.png"), &config));
        assert!(!is_supported(Path::new("model.stl"), &config));
    }

    #[test]
    fn test_output_path_keeps_extension() {
        let dir = Path::new("out");
        let txt = output_path_for(dir, Path::new("in/a.txt"), OutputFormat::Json);
        let png = output_path_for(dir, Path::new("in/a.png"), OutputFormat::Json);

        assert_eq!(txt, PathBuf::from("out/a.txt.json"));
        assert_eq!(png, PathBuf::from("out/a.png.json"));
        assert_eq!(
            output_path_for(dir, Path::new("shot.jpg"), OutputFormat::Csv),
            PathBuf::from("out/shot.jpg.csv")
        );
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let results = vec![
            ProcessResult {
                path: PathBuf::from("in/a.txt"),
                report: Some(spoolscan_core::explain_facts("2h 35m 25g $12.99")),
                error: None,
                processing_time_ms: 3,
            },
            ProcessResult {
                path: PathBuf::from("in/b.png"),
                report: None,
                error: Some("OCR error: no text recognized".to_string()),
                processing_time_ms: 7,
            },
        ];

        write_summary(&path, &results).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[1], "a.txt,success,155,12.99,25,3,");
        assert_eq!(lines[2], "b.png,error,,,,7,OCR error: no text recognized");
    }
}
