//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::Path;

use tokio::io::AsyncReadExt;
use tracing::debug;

use spoolscan_core::{FactReport, ScanConfig};

use crate::ocr::CommandRecognizer;

/// Output format for extracted facts.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Load the config named on the command line, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ScanConfig> {
    if let Some(path) = config_path {
        return Ok(ScanConfig::load(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config at {}", default_path.display());
        Ok(ScanConfig::load(&default_path)?)
    } else {
        Ok(ScanConfig::default())
    }
}

/// Get the text for an input: stdin for `-`, OCR for images, file contents otherwise.
pub async fn read_text(
    input: &Path,
    config: &ScanConfig,
    recognizer: &CommandRecognizer,
) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    if config.ocr.is_image(input) {
        Ok(recognizer.recognize(input).await?)
    } else {
        Ok(tokio::fs::read_to_string(input).await?)
    }
}

/// Render a report in the requested format.
pub fn format_report(
    report: &FactReport,
    format: OutputFormat,
    explain: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if explain => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report.facts)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report, explain)),
    }
}

fn format_csv(report: &FactReport) -> anyhow::Result<String> {
    let facts = &report.facts;
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["duration_minutes", "price", "weight_grams", "raw_text"])?;
    wtr.write_record([
        &facts.duration_minutes.map(|m| m.to_string()).unwrap_or_default(),
        &facts.price.map(|p| p.to_string()).unwrap_or_default(),
        &facts.weight_grams.map(|w| w.to_string()).unwrap_or_default(),
        &facts.raw_text,
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &FactReport, explain: bool) -> String {
    let facts = &report.facts;
    let mut output = String::new();

    let duration = match facts.hours_minutes() {
        Some((h, m)) => format!("{}h {}m ({} min)", h, m, h * 60 + m),
        None => "-".to_string(),
    };
    let price = facts.price.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
    let weight = facts
        .weight_grams
        .map(|w| format!("{} g", w))
        .unwrap_or_else(|| "-".to_string());

    output.push_str(&format!("Print time: {}\n", duration));
    output.push_str(&format!("Price:      {}\n", price));
    output.push_str(&format!("Weight:     {}\n", weight));

    if explain {
        output.push('\n');
        output.push_str("Matched rules:\n");
        let rows = [
            ("duration", report.duration.as_ref().map(|m| (m.rule, m.source.as_str()))),
            ("price", report.price.as_ref().map(|m| (m.rule, m.source.as_str()))),
            ("weight", report.weight.as_ref().map(|m| (m.rule, m.source.as_str()))),
        ];
        for (field, hit) in rows {
            match hit {
                Some((rule, source)) => {
                    output.push_str(&format!("  {:<9} {} \"{}\"\n", field, rule, source))
                }
                None => output.push_str(&format!("  {:<9} -\n", field)),
            }
        }
    }

    output
}
