//! Extracted facts and the form draft derived from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Facts recovered from one piece of OCR text.
///
/// Each measurement is either found or absent; none depends on another.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFacts {
    /// Elapsed print time in whole minutes.
    pub duration_minutes: Option<u32>,

    /// Monetary amount, currency dropped.
    pub price: Option<Decimal>,

    /// Material mass in grams.
    pub weight_grams: Option<Decimal>,

    /// The input text exactly as received.
    pub raw_text: String,
}

impl ParsedFacts {
    /// Facts with nothing found.
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    /// True when no measurement was found.
    pub fn is_empty(&self) -> bool {
        self.duration_minutes.is_none() && self.price.is_none() && self.weight_grams.is_none()
    }

    /// Number of measurements found (0 to 3).
    pub fn found_count(&self) -> usize {
        [
            self.duration_minutes.is_some(),
            self.price.is_some(),
            self.weight_grams.is_some(),
        ]
        .iter()
        .filter(|found| **found)
        .count()
    }

    /// Duration split into whole hours and remaining minutes.
    pub fn hours_minutes(&self) -> Option<(u32, u32)> {
        self.duration_minutes.map(|m| (m / 60, m % 60))
    }
}

/// Prefill values for a new-part form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_hours: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_minutes: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_grams: Option<Decimal>,

    /// Price and weight rendered for the free-text notes field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&ParsedFacts> for PartDraft {
    fn from(facts: &ParsedFacts) -> Self {
        let (print_hours, print_minutes) = match facts.hours_minutes() {
            Some((h, m)) => (Some(h), Some(m)),
            None => (None, None),
        };

        let mut parts = Vec::new();
        if let Some(price) = facts.price {
            parts.push(format!("Price: {}", price));
        }
        if let Some(weight) = facts.weight_grams {
            parts.push(format!("Weight: {} g", weight));
        }

        Self {
            print_hours,
            print_minutes,
            weight_grams: facts.weight_grams,
            notes: (!parts.is_empty()).then(|| parts.join(" | ")),
        }
    }
}
