//! Error types for the spoolscan-core library.
//!
//! Fact extraction itself never fails; these errors cover building a
//! configured extractor, loading configuration and driving the external OCR
//! step that produces the text in the first place.

use thiserror::Error;

/// Main error type for the spoolscan library.
#[derive(Error, Debug)]
pub enum ScanError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Extractor construction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors reported by the external OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR command could not be started.
    #[error("failed to start OCR command `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    /// The OCR command did not finish in time.
    #[error("OCR timed out after {0}s")]
    Timeout(u64),

    /// The OCR command exited unsuccessfully.
    #[error("OCR command exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// The OCR output was not valid UTF-8.
    #[error("OCR produced invalid text: {0}")]
    InvalidOutput(String),

    /// The OCR step ran but recognized nothing.
    #[error("no text recognized")]
    NoText,
}

/// Errors raised while building an extractor from configuration.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A rule pattern could not be compiled.
    #[error("invalid pattern for {rule}: {reason}")]
    Pattern { rule: String, reason: String },

    /// A sanity bound is not usable.
    #[error("invalid bound {name}: {reason}")]
    Bound { name: String, reason: String },
}

/// Result type for the spoolscan library.
pub type Result<T> = std::result::Result<T, ScanError>;
