//! Data models for extracted facts and configuration.

pub mod config;
pub mod facts;

pub use config::{ExtractionConfig, OcrConfig, ScanConfig};
pub use facts::{ParsedFacts, PartDraft};
