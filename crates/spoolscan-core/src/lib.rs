//! Core library for 3D-printing OCR text.
//!
//! This crate provides:
//! - Whitespace normalization of raw OCR output
//! - Rule-based extraction of print duration, price and material weight
//! - Form prefill values derived from the extracted facts
//! - Configuration for the extractor and the external OCR command
//!
//! ```
//! use spoolscan_core::extract_facts;
//!
//! let facts = extract_facts("Print time: 2h 35m  Weight: 25.3g  Price: $12.99");
//! assert_eq!(facts.duration_minutes, Some(155));
//! ```

pub mod error;
pub mod facts;
pub mod models;

pub use error::{ExtractionError, OcrError, Result, ScanError};
pub use facts::rules::{ExtractionMatch, FieldExtractor};
pub use facts::{explain_facts, extract_facts, normalize, FactExtractor, FactReport};
pub use models::config::{ExtractionConfig, OcrConfig, ScanConfig};
pub use models::facts::{ParsedFacts, PartDraft};
