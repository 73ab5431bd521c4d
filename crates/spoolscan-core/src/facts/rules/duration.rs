//! Print duration extraction.

use lazy_static::lazy_static;
use regex::Captures;
use tracing::trace;

use super::patterns::{
    DURATION_BARE_CLOCK, DURATION_CLOCK, DURATION_HOURS, DURATION_HOURS_MINUTES, DURATION_MINUTES,
};
use super::{parse_count, ExtractionMatch, FieldExtractor, Rule};

/// Duration notations, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationRule {
    /// `2h 35m`, `2 hours 35 min`
    HoursMinutes,
    /// `2:35`, `1:5h`, `2:35 h`
    Clock,
    /// `3h`, `3 hours`, not followed by minute digits
    Hours,
    /// `45m`, `45 minutes`
    Minutes,
    /// Leading `H:MM` of anything else, e.g. `1:23:45`
    BareClock,
}

lazy_static! {
    static ref DURATION_RULES: Vec<Rule<DurationRule>> = vec![
        Rule::new(DurationRule::HoursMinutes, "hours_minutes", 0.95, &DURATION_HOURS_MINUTES),
        Rule::new(DurationRule::Clock, "clock", 0.9, &DURATION_CLOCK),
        Rule::new(DurationRule::Hours, "hours", 0.85, &DURATION_HOURS),
        Rule::new(DurationRule::Minutes, "minutes", 0.8, &DURATION_MINUTES),
        Rule::new(DurationRule::BareClock, "bare_clock", 0.6, &DURATION_BARE_CLOCK),
    ];
}

/// Print duration extractor, in whole minutes.
#[derive(Debug, Clone)]
pub struct DurationExtractor {
    rules: &'static [Rule<DurationRule>],
}

impl DurationExtractor {
    pub fn new() -> Self {
        Self {
            rules: &DURATION_RULES,
        }
    }

    fn evaluate(&self, rule: &Rule<DurationRule>, text: &str) -> Option<ExtractionMatch<u32>> {
        let caps = rule
            .pattern
            .captures_iter(text)
            .find(|caps| match rule.kind {
                DurationRule::Hours => !followed_by_digits(text, caps),
                DurationRule::Clock => is_clock_reading(caps),
                _ => true,
            })?;

        let minutes = match rule.kind {
            DurationRule::HoursMinutes | DurationRule::Clock | DurationRule::BareClock => {
                parse_count(&caps["h"])
                    .zip(parse_count(&caps["m"]))
                    .and_then(|(h, m)| h.checked_mul(60)?.checked_add(m))
            }
            DurationRule::Hours => parse_count(&caps["h"]).and_then(|h| h.checked_mul(60)),
            DurationRule::Minutes => parse_count(&caps["m"]),
        };

        match minutes {
            Some(minutes) => Some(rule.matched(minutes, &caps)),
            None => {
                trace!(rule = rule.name, source = &caps[0], "unparseable duration");
                None
            }
        }
    }
}

/// "3h 20" is an hour reading with its minutes unlabeled, not "3h".
fn followed_by_digits(text: &str, caps: &Captures<'_>) -> bool {
    caps.name("hit").is_none_or(|hit| {
        text[hit.end()..]
            .trim_start()
            .starts_with(|c: char| c.is_ascii_digit())
    })
}

/// `1:5h` carries its unit; without one the minutes must be two digits, as
/// on a `2:35` display.
fn is_clock_reading(caps: &Captures<'_>) -> bool {
    caps.name("unit").is_some()
        || (caps["h"].chars().count() <= 3 && caps["m"].chars().count() == 2)
}

impl Default for DurationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DurationExtractor {
    type Output = ExtractionMatch<u32>;

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

/// Extract a print duration in minutes.
pub fn extract_duration(text: &str) -> Option<u32> {
    DurationExtractor::new().extract(text).map(|m| m.value)
}
