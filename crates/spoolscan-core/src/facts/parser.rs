//! Fact extraction over whole OCR texts.

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::facts::ParsedFacts;

use super::normalize::normalize;
use super::rules::{
    DurationExtractor, ExtractionMatch, FieldExtractor, PriceExtractor, WeightExtractor,
};

lazy_static! {
    static ref DEFAULT_EXTRACTOR: FactExtractor = FactExtractor::new();
}

/// Extraction result with the winning match behind each fact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactReport {
    /// The facts themselves.
    pub facts: ParsedFacts,
    /// The text the rules ran against.
    pub normalized_text: String,
    pub duration: Option<ExtractionMatch<u32>>,
    pub price: Option<ExtractionMatch<Decimal>>,
    pub weight: Option<ExtractionMatch<Decimal>>,
}

/// Runs the duration, price and weight extractors over one text.
///
/// Holds only compiled rule tables, so one instance can serve any number of
/// threads at once.
#[derive(Debug, Clone, Default)]
pub struct FactExtractor {
    duration: DurationExtractor,
    price: PriceExtractor,
    weight: WeightExtractor,
}

impl FactExtractor {
    /// Create an extractor with the stock rule tables.
    pub fn new() -> Self {
        Self {
            duration: DurationExtractor::new(),
            price: PriceExtractor::new(),
            weight: WeightExtractor::new(),
        }
    }

    /// Create an extractor whose weight rules follow `config`.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        Ok(Self {
            duration: DurationExtractor::new(),
            price: PriceExtractor::new(),
            weight: WeightExtractor::from_config(config)?,
        })
    }

    /// Extract all facts from raw OCR text.
    pub fn extract(&self, raw_text: &str) -> ParsedFacts {
        self.explain(raw_text).facts
    }

    /// Extract all facts and report which rule produced each one.
    pub fn explain(&self, raw_text: &str) -> FactReport {
        let text = normalize(raw_text);

        let duration = self.duration.extract(&text);
        let price = self.price.extract(&text);
        let weight = self.weight.extract(&text);

        debug!(
            duration_rule = duration.as_ref().map(|m| m.rule),
            price_rule = price.as_ref().map(|m| m.rule),
            weight_rule = weight.as_ref().map(|m| m.rule),
            "extracted facts from {} chars",
            raw_text.len()
        );

        let facts = ParsedFacts {
            duration_minutes: duration.as_ref().map(|m| m.value),
            price: price.as_ref().map(|m| m.value),
            weight_grams: weight.as_ref().map(|m| m.value),
            raw_text: raw_text.to_string(),
        };

        FactReport {
            facts,
            normalized_text: text,
            duration,
            price,
            weight,
        }
    }
}

/// Extract facts with the stock rule tables.
pub fn extract_facts(raw_text: &str) -> ParsedFacts {
    DEFAULT_EXTRACTOR.extract(raw_text)
}

/// Extract facts with the stock rule tables, keeping the matches.
pub fn explain_facts(raw_text: &str) -> FactReport {
    DEFAULT_EXTRACTOR.explain(raw_text)
}
