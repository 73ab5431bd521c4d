//! Rule-based extractors for print duration, price and material weight.
//!
//! Every extractor owns an ordered rule table. Rules are tried in priority
//! order and the first one that yields an in-bounds value wins; a rule whose
//! match fails to parse or falls outside its bound hands over to the next.

pub mod duration;
pub mod patterns;
pub mod price;
pub mod weight;

pub use duration::{DurationExtractor, DurationRule};
pub use price::{PriceExtractor, PriceRule};
pub use weight::{WeightExtractor, WeightRule};

use std::str::FromStr;

use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde::Serialize;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text, using the highest-priority rule that matches.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Every accepted candidate, at most one per rule, in priority order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An accepted candidate together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that produced it.
    pub rule: &'static str,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span in the normalized text.
    pub position: Option<(usize, usize)>,
    /// Text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// One row of a rule table.
#[derive(Debug, Clone)]
pub struct Rule<K> {
    pub kind: K,
    pub name: &'static str,
    pub confidence: f32,
    pub pattern: Regex,
}

impl<K: Copy> Rule<K> {
    pub fn new(kind: K, name: &'static str, confidence: f32, pattern: &Regex) -> Self {
        Self {
            kind,
            name,
            confidence,
            pattern: pattern.clone(),
        }
    }

    /// Wrap a value in a match located at the `hit` group of `caps`.
    pub(crate) fn matched<T>(&self, value: T, caps: &Captures<'_>) -> ExtractionMatch<T> {
        let hit = caps
            .name("hit")
            .or_else(|| caps.get(0))
            .map(|m| (m.start(), m.end(), m.as_str()));

        match hit {
            Some((start, end, source)) => {
                ExtractionMatch::new(value, self.name, self.confidence, source)
                    .with_position(start, end)
            }
            None => ExtractionMatch::new(value, self.name, self.confidence, ""),
        }
    }
}

/// Parse a non-negative integer capture.
pub fn parse_count(s: &str) -> Option<u32> {
    s.trim().parse().ok()
}

/// Parse a number that may use `,` as its decimal separator.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.trim().replace(',', ".")).ok()
}

/// Parse an amount from its integer part (possibly digit-grouped with `,` or
/// `.`) and its two fractional digits.
pub fn parse_amount(integer_part: &str, fraction: &str) -> Option<Decimal> {
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Decimal::from_str(&format!("{}.{}", digits, fraction)).ok()
}
