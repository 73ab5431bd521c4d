//! WASM bindings for print fact extraction.
//!
//! The browser runs OCR itself and hands the recognized text to these
//! functions, which return plain JS objects.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use spoolscan_core::{ExtractionConfig, FactExtractor, PartDraft};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract print time, price and weight from OCR text.
#[wasm_bindgen(js_name = extractFacts)]
pub fn extract_facts(text: &str) -> Result<JsValue, JsValue> {
    to_js(&spoolscan_core::extract_facts(text))
}

/// Extract facts along with the rule and source span behind each one.
#[wasm_bindgen(js_name = explainFacts)]
pub fn explain_facts(text: &str) -> Result<JsValue, JsValue> {
    to_js(&spoolscan_core::explain_facts(text))
}

/// Extract facts and shape them as new-part form values.
#[wasm_bindgen(js_name = prefillDraft)]
pub fn prefill_draft(text: &str) -> Result<JsValue, JsValue> {
    let facts = spoolscan_core::extract_facts(text);
    to_js(&PartDraft::from(&facts))
}

/// Fact extractor with custom settings, for repeated use from JS.
#[wasm_bindgen]
pub struct Extractor {
    inner: FactExtractor,
}

#[wasm_bindgen]
impl Extractor {
    /// Create an extractor. `config` takes the shape of the `extraction`
    /// config section; missing fields fall back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Extractor, JsValue> {
        let config: ExtractionConfig = if config.is_undefined() || config.is_null() {
            ExtractionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_error)?
        };

        let inner = FactExtractor::from_config(&config).map_err(js_error)?;
        Ok(Self { inner })
    }

    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.extract(text))
    }

    #[wasm_bindgen]
    pub fn explain(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.explain(text))
    }

    #[wasm_bindgen(js_name = prefillDraft)]
    pub fn prefill_draft(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&PartDraft::from(&self.inner.extract(text)))
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use spoolscan_core::ParsedFacts;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[wasm_bindgen_test]
    fn test_extract_facts_round_trips_to_js() {
        let value = extract_facts("Print time: 2h 35m").unwrap();
        let facts: ParsedFacts = serde_wasm_bindgen::from_value(value).unwrap();

        assert_eq!(facts.duration_minutes, Some(155));
        assert!(facts.price.is_none());
        assert_eq!(facts.raw_text, "Print time: 2h 35m");
    }

    #[wasm_bindgen_test]
    fn test_prefill_draft() {
        let value = prefill_draft("1:05 25.3g $12.99").unwrap();
        let draft: PartDraft = serde_wasm_bindgen::from_value(value).unwrap();

        assert_eq!(draft.print_hours, Some(1));
        assert_eq!(draft.print_minutes, Some(5));
        assert_eq!(draft.notes.as_deref(), Some("Price: 12.99 | Weight: 25.3 g"));
    }

    #[wasm_bindgen_test]
    fn test_extractor_with_custom_glyphs() {
        let config = ExtractionConfig {
            gram_confusables: vec!['q'],
            ..ExtractionConfig::default()
        };
        let extractor = Extractor::new(serde_wasm_bindgen::to_value(&config).unwrap()).unwrap();

        let facts: ParsedFacts =
            serde_wasm_bindgen::from_value(extractor.extract("259").unwrap()).unwrap();
        assert!(facts.weight_grams.is_none());

        let facts: ParsedFacts =
            serde_wasm_bindgen::from_value(extractor.extract("25.3q").unwrap()).unwrap();
        assert_eq!(facts.weight_grams.map(|w| w.to_string()), Some("25.3".to_string()));
    }

    #[wasm_bindgen_test]
    fn test_extractor_rejects_bad_bounds() {
        let config = ExtractionConfig {
            max_grams: Default::default(),
            ..ExtractionConfig::default()
        };
        assert!(Extractor::new(serde_wasm_bindgen::to_value(&config).unwrap()).is_err());
    }

    #[wasm_bindgen_test]
    fn test_extractor_defaults_when_config_missing() {
        let extractor = Extractor::new(JsValue::UNDEFINED).unwrap();
        let value = extractor.explain("3:45").unwrap();
        assert!(value.is_object());
    }
}
