//! Material weight extraction, in grams.
//!
//! OCR often turns the `g` of a gram reading into `q` or `9`, and slicer
//! screens mix grams with kilograms. Rules, highest priority first:
//!
//! 1. a labeled gram reading (`Weight: 25.3g`, `Filament used 12 grams`)
//! 2. any gram reading, confusable glyphs included (`25.3q`, `259`)
//! 3. a kilogram reading, converted to grams
//! 4. a one- or two-digit number glued to `g`
//!
//! Each rule looks at its first match only. A value outside the rule's bound
//! is discarded and the next rule gets a turn.

use regex::Captures;
use rust_decimal::Decimal;
use tracing::trace;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;

use super::patterns::{WeightPatterns, CURRENCY_SYMBOLS, DEFAULT_WEIGHT_PATTERNS};
use super::{parse_decimal, ExtractionMatch, FieldExtractor, Rule};

/// Weight notations, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightRule {
    LabeledGrams,
    Grams,
    Kilograms,
    SmallGrams,
}

/// Material weight extractor.
#[derive(Debug, Clone)]
pub struct WeightExtractor {
    rules: Vec<Rule<WeightRule>>,
    max_grams: Decimal,
    max_kilograms: Decimal,
    fallback_max_grams: Decimal,
}

impl WeightExtractor {
    /// Extractor with the stock label set, glyph table and bounds.
    pub fn new() -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            rules: Self::rule_table(&DEFAULT_WEIGHT_PATTERNS),
            max_grams: defaults.max_grams,
            max_kilograms: defaults.max_kilograms,
            fallback_max_grams: defaults.fallback_max_grams,
        }
    }

    /// Extractor compiled for a custom label set, glyph table and bounds.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        for (name, bound) in [
            ("max_grams", config.max_grams),
            ("max_kilograms", config.max_kilograms),
            ("fallback_max_grams", config.fallback_max_grams),
        ] {
            if bound <= Decimal::ZERO {
                return Err(ExtractionError::Bound {
                    name: name.to_string(),
                    reason: format!("must be positive, got {}", bound),
                });
            }
        }

        let patterns = WeightPatterns::build(
            config.weight_labels.as_slice(),
            config.gram_confusables.as_slice(),
        )?;

        Ok(Self {
            rules: Self::rule_table(&patterns),
            max_grams: config.max_grams,
            max_kilograms: config.max_kilograms,
            fallback_max_grams: config.fallback_max_grams,
        })
    }

    fn rule_table(patterns: &WeightPatterns) -> Vec<Rule<WeightRule>> {
        let mut rules = Vec::with_capacity(4);
        if let Some(labeled) = &patterns.labeled {
            rules.push(Rule::new(WeightRule::LabeledGrams, "labeled_grams", 0.95, labeled));
        }
        rules.push(Rule::new(WeightRule::Grams, "grams", 0.85, &patterns.grams));
        rules.push(Rule::new(WeightRule::Kilograms, "kilograms", 0.8, &patterns.kilograms));
        rules.push(Rule::new(WeightRule::SmallGrams, "small_grams", 0.5, &patterns.small_grams));
        rules
    }

    fn evaluate(&self, rule: &Rule<WeightRule>, text: &str) -> Option<ExtractionMatch<Decimal>> {
        let caps = rule
            .pattern
            .captures_iter(text)
            .find(|caps| !follows_currency(text, caps))?;

        let Some(value) = parse_decimal(&caps["num"]) else {
            trace!(rule = rule.name, source = &caps[0], "unparseable weight");
            return None;
        };

        let grams = match rule.kind {
            WeightRule::LabeledGrams | WeightRule::Grams => {
                (value < self.max_grams).then_some(value)
            }
            WeightRule::Kilograms => (value < self.max_kilograms)
                .then(|| value.checked_mul(Decimal::ONE_THOUSAND))
                .flatten(),
            WeightRule::SmallGrams => {
                (value > Decimal::ZERO && value < self.fallback_max_grams).then_some(value)
            }
        };

        match grams {
            Some(grams) => Some(rule.matched(grams.normalize(), &caps)),
            None => {
                trace!(rule = rule.name, %value, "weight outside sanity bound");
                None
            }
        }
    }
}

/// `€ 29,99` is a price even with the space that gets past the pattern guard.
fn follows_currency(text: &str, caps: &Captures<'_>) -> bool {
    let start = caps.name("hit").map_or(0, |m| m.start());
    text[..start].trim_end().ends_with(CURRENCY_SYMBOLS)
}

impl Default for WeightExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for WeightExtractor {
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

/// Extract a material weight in grams.
pub fn extract_weight(text: &str) -> Option<Decimal> {
    WeightExtractor::new().extract(text).map(|m| m.value)
}
