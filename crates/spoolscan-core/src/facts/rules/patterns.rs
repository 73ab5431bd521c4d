//! Regex patterns for print duration, price and weight extraction.
//!
//! The `regex` crate has no look-around, so patterns that must not start
//! inside a larger number open with a consumed guard and put the meaningful
//! span in a `hit` group. The guard rejects a digit or a separator glued to
//! a digit (`1.5h`, `12,99`); a separator after a letter (`time,2h`) is fine.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ExtractionError;

/// Start of a number that is not the tail of another number.
const NUMBER_START: &str = r"(?:^|[^\d.,]|[^\d][.,])";

/// Start of a duration number: like [`NUMBER_START`], and not the minutes
/// after a `<digits>:`.
const DURATION_START: &str = r"(?:^|[^\d.,:]|[^\d][.,:])";

/// Start of a weight number: like [`NUMBER_START`], and not right after a
/// currency symbol.
const WEIGHT_START: &str = r"(?:^|[^\d.,$€£]|[^\d$€£][.,])";

/// Hour unit: `h`, `hr`, `hrs`, `hour`, `hours`.
const HOUR_UNIT: &str = r"h(?:ours?|rs?)?";

/// Minute unit: `m`, `min`, `mins`, `minute`, `minutes`.
const MINUTE_UNIT: &str = r"m(?:in(?:ute)?s?)?";

/// Gram unit spelled out: `g`, `gr`, `gram`, `grams`.
const GRAM_UNIT: &str = r"(?:grams?|gr|g)";

/// Words that mark a nearby reading as the material weight.
pub const DEFAULT_WEIGHT_LABELS: [&str; 4] = ["weight", "filament", "used", "material"];

/// Symbols that mark a number as money rather than mass.
pub const CURRENCY_SYMBOLS: [char; 3] = ['$', '€', '£'];

/// Glyphs OCR commonly returns in place of a trailing `g`.
pub const DEFAULT_GRAM_CONFUSABLES: [char; 2] = ['q', '9'];

lazy_static! {
    // Whitespace runs, newlines included
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Durations
    pub static ref DURATION_HOURS_MINUTES: Regex = Regex::new(&format!(
        r"(?i){DURATION_START}(?P<hit>(?P<h>\d+)\s*{HOUR_UNIT}\s*(?P<m>\d+)\s*{MINUTE_UNIT})\b"
    )).unwrap();

    // `<H>:<M>` with a unit marker, or `<H>:<MM>` ending the token
    pub static ref DURATION_CLOCK: Regex = Regex::new(&format!(
        r"(?i){DURATION_START}(?P<hit>(?P<h>\d+)\s*:\s*(?P<m>\d+)(?:\s*(?P<unit>{HOUR_UNIT}|{MINUTE_UNIT})\b)?)(?:$|[^\d:a-z])"
    )).unwrap();

    pub static ref DURATION_HOURS: Regex = Regex::new(&format!(
        r"(?i){DURATION_START}(?P<hit>(?P<h>\d+)\s*{HOUR_UNIT})\b"
    )).unwrap();

    pub static ref DURATION_MINUTES: Regex = Regex::new(&format!(
        r"(?i){DURATION_START}(?P<hit>(?P<m>\d+)\s*{MINUTE_UNIT})\b"
    )).unwrap();

    pub static ref DURATION_BARE_CLOCK: Regex = Regex::new(&format!(
        r"{DURATION_START}(?P<hit>(?P<h>\d{{1,3}}):(?P<m>\d{{2}}))"
    )).unwrap();

    // Prices: exactly two fractional digits, optional grouping in the integer part
    pub static ref PRICE: Regex = Regex::new(&format!(
        r"{NUMBER_START}(?P<hit>(?P<sym>[$€£])?\s?(?P<int>\d{{1,3}}(?:[,.]\d{{3}})+|\d+)[.,](?P<frac>\d{{2}}))(?:$|\D)"
    )).unwrap();

    // Weights with the stock label and glyph tables
    pub static ref DEFAULT_WEIGHT_PATTERNS: WeightPatterns = WeightPatterns::build(
        &DEFAULT_WEIGHT_LABELS,
        &DEFAULT_GRAM_CONFUSABLES,
    ).unwrap();
}

/// Compiled weight patterns for one label set and confusable-glyph table.
#[derive(Debug, Clone)]
pub struct WeightPatterns {
    /// Label word, then a gram reading. `None` when no labels are configured.
    pub labeled: Option<Regex>,
    /// A gram reading on its own.
    pub grams: Regex,
    /// A kilogram reading.
    pub kilograms: Regex,
    /// One or two digits, optionally one decimal, glued to `g`.
    pub small_grams: Regex,
}

impl WeightPatterns {
    /// Compile the weight patterns.
    ///
    /// `confusables` are glyphs OCR returns in place of `g`. Letters stand in
    /// for the unit with or without a space before them; digits only count
    /// when glued to the number.
    pub fn build<S: AsRef<str>>(
        labels: &[S],
        confusables: &[char],
    ) -> Result<Self, ExtractionError> {
        let unit = unit_pattern(confusables);

        let words = labels
            .iter()
            .map(|l| regex::escape(l.as_ref().trim()))
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("|");

        let labeled = if words.is_empty() {
            None
        } else {
            let pattern = format!(
                r"(?i)\b(?P<hit>(?:{words})\b\D{{0,24}}?(?P<num>\d+(?:[.,]\d+)?){unit})\b"
            );
            Some(compile("labeled_grams", &pattern)?)
        };

        let grams = compile(
            "grams",
            &format!(r"(?i){WEIGHT_START}(?P<hit>(?P<num>\d+(?:[.,]\d+)?){unit})\b"),
        )?;

        let kilograms = compile(
            "kilograms",
            &format!(
                r"(?i){WEIGHT_START}(?P<hit>(?P<num>\d+(?:[.,]\d+)?)\s?(?:kg|kilograms?|kilos?))\b"
            ),
        )?;

        let small_grams = compile(
            "small_grams",
            &format!(r"(?i){WEIGHT_START}(?P<hit>(?P<num>\d{{1,2}}(?:[.,]\d)?)g)\b"),
        )?;

        Ok(Self {
            labeled,
            grams,
            kilograms,
            small_grams,
        })
    }
}

/// The gram unit, or a confusable glyph standing in for it.
///
/// `(?:\s?(?:(?P<unit>grams?|gr|g)|[q])|[9])` for the stock table.
fn unit_pattern(confusables: &[char]) -> String {
    let (digits, letters): (Vec<char>, Vec<char>) = confusables
        .iter()
        .copied()
        .filter(|c| !c.is_whitespace())
        .partition(|c| c.is_ascii_digit());

    let spaced = match char_class(&letters) {
        Some(class) => format!(r"(?:(?P<unit>{GRAM_UNIT})|{class})"),
        None => format!(r"(?P<unit>{GRAM_UNIT})"),
    };

    match char_class(&digits) {
        Some(class) => format!(r"(?:\s?{spaced}|{class})"),
        None => format!(r"(?:\s?{spaced})"),
    }
}

/// `[...]` matching any of `chars`, or `None` when there are none.
fn char_class(chars: &[char]) -> Option<String> {
    if chars.is_empty() {
        return None;
    }
    let escaped: String = chars.iter().map(|c| regex::escape(&c.to_string())).collect();
    Some(format!("[{escaped}]"))
}

fn compile(rule: &str, pattern: &str) -> Result<Regex, ExtractionError> {
    Regex::new(pattern).map_err(|e| ExtractionError::Pattern {
        rule: rule.to_string(),
        reason: e.to_string(),
    })
}
