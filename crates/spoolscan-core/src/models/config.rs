//! Configuration structures for the scan pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ScanError;
use crate::facts::rules::patterns::{DEFAULT_GRAM_CONFUSABLES, DEFAULT_WEIGHT_LABELS};
use crate::facts::FactExtractor;

/// Main configuration for spoolscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Fact extraction configuration.
    pub extraction: ExtractionConfig,

    /// External OCR command configuration.
    pub ocr: OcrConfig,
}

/// Fact extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Glyphs the OCR engine is known to produce in place of a gram `g`.
    pub gram_confusables: Vec<char>,

    /// Words that mark a nearby number as the material weight.
    pub weight_labels: Vec<String>,

    /// Upper bound (exclusive) for gram readings.
    pub max_grams: Decimal,

    /// Upper bound (exclusive) for kilogram readings, before conversion.
    pub max_kilograms: Decimal,

    /// Upper bound (exclusive) for the low-confidence small-number fallback.
    pub fallback_max_grams: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            gram_confusables: DEFAULT_GRAM_CONFUSABLES.to_vec(),
            weight_labels: DEFAULT_WEIGHT_LABELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_grams: Decimal::from(10_000),
            max_kilograms: Decimal::from(100),
            fallback_max_grams: Decimal::from(1_000),
        }
    }
}

/// External OCR command configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Program to run, looked up on `PATH`.
    pub command: String,

    /// Arguments; `{input}` is replaced with the image path.
    pub args: Vec<String>,

    /// Seconds to wait for the command before giving up.
    pub timeout_secs: u64,

    /// File extensions treated as images (lowercase, no dot).
    pub image_extensions: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            args: vec!["{input}".to_string(), "stdout".to_string()],
            timeout_secs: 30,
            image_extensions: ["png", "jpg", "jpeg", "webp", "bmp", "tif", "tiff"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl OcrConfig {
    /// Whether a path looks like an image this config should OCR.
    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|ext| self.image_extensions.iter().any(|x| *x == ext))
    }

    /// Arguments with `{input}` substituted.
    pub fn args_for(&self, input: &Path) -> Vec<String> {
        let input = input.display().to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{input}", &input))
            .collect()
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Load a configuration file and check that it is usable.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let config = Self::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that an extractor can be built and the OCR command can run.
    pub fn validate(&self) -> crate::Result<()> {
        FactExtractor::from_config(&self.extraction)?;

        if self.ocr.command.trim().is_empty() {
            return Err(ScanError::Config("ocr.command must not be empty".to_string()));
        }
        if self.ocr.timeout_secs == 0 {
            return Err(ScanError::Config("ocr.timeout_secs must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"extraction": {"gram_confusables": ["q"]}}"#).unwrap();

        assert_eq!(config.extraction.gram_confusables, vec!['q']);
        assert_eq!(config.extraction.max_grams, Decimal::from(10_000));
        assert_eq!(config.ocr.command, "tesseract");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ScanConfig::default();
        config.ocr.timeout_secs = 5;
        config.save(&path).unwrap();

        let loaded = ScanConfig::from_file(&path).unwrap();
        assert_eq!(loaded.ocr.timeout_secs, 5);
        assert_eq!(loaded.extraction.weight_labels.len(), 4);
    }

    #[test]
    fn test_invalid_json_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ScanConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{"ocr": {"timeout_secs": 0}}"#).unwrap();
        let err = ScanConfig::load(&path).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));

        std::fs::write(&path, r#"{"extraction": {"fallback_max_grams": -1}}"#).unwrap();
        let err = ScanConfig::load(&path).unwrap_err();
        assert!(matches!(err, ScanError::Extraction(_)));

        std::fs::write(&path, r#"{"ocr": {"command": "ocrmypdf"}}"#).unwrap();
        assert_eq!(ScanConfig::load(&path).unwrap().ocr.command, "ocrmypdf");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = ScanConfig::load(Path::new("/nonexistent/spoolscan.json")).unwrap_err();
        assert!(matches!(err, ScanError::Io(_)));
    }

    #[test]
    fn test_ocr_args_substitution() {
        let ocr = OcrConfig::default();
        let args = ocr.args_for(&PathBuf::from("shot.png"));
        assert_eq!(args, vec!["shot.png".to_string(), "stdout".to_string()]);
    }

    #[test]
    fn test_is_image() {
        let ocr = OcrConfig::default();
        assert!(ocr.is_image(&PathBuf::from("a/B.JPG")));
        assert!(!ocr.is_image(&PathBuf::from("notes.txt")));
        assert!(!ocr.is_image(&PathBuf::from("noext")));
    }
}
