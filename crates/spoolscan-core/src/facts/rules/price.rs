//! Price extraction.
//!
//! A price is any number with exactly two fractional digits, optionally led
//! by `$`, `€` or `£`. Plain integers are never prices, which keeps weights
//! and durations out.

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use tracing::trace;

use super::patterns::PRICE;
use super::{parse_amount, ExtractionMatch, FieldExtractor, Rule};

/// Price notations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRule {
    /// `$12.99`, `€ 4,50`, `1,234.56`, `12.99`
    TwoDecimals,
}

lazy_static! {
    static ref PRICE_RULES: Vec<Rule<PriceRule>> = vec![
        Rule::new(PriceRule::TwoDecimals, "two_decimals", 0.9, &PRICE),
    ];
}

/// Price extractor.
#[derive(Debug, Clone)]
pub struct PriceExtractor {
    rules: &'static [Rule<PriceRule>],
}

impl PriceExtractor {
    pub fn new() -> Self {
        Self { rules: &PRICE_RULES }
    }

    fn evaluate(&self, rule: &Rule<PriceRule>, text: &str) -> Option<ExtractionMatch<Decimal>> {
        // Only the first two-decimal number counts
        let caps = rule.pattern.captures(text)?;

        match parse_amount(&caps["int"], &caps["frac"]) {
            Some(amount) => Some(rule.matched(amount, &caps)),
            None => {
                trace!(rule = rule.name, source = &caps[0], "unparseable price");
                None
            }
        }
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PriceExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.rules.iter().find_map(|rule| self.evaluate(rule, text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.rules
            .iter()
            .filter_map(|rule| self.evaluate(rule, text))
            .collect()
    }
}

/// Extract a price.
pub fn extract_price(text: &str) -> Option<Decimal> {
    PriceExtractor::new().extract(text).map(|m| m.value)
}
