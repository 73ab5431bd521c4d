//! OCR text to structured fact extraction.

mod normalize;
mod parser;
pub mod rules;

pub use normalize::normalize;
pub use parser::{explain_facts, extract_facts, FactExtractor, FactReport};
