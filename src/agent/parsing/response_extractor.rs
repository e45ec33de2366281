//! Extraction of the JSON object embedded in a model turn

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use super::ResponseSanitizer;

/// Parsed JSON object found in a model turn
pub type ParsedPayload = Map<String, Value>;

/// Why no payload could be extracted from a turn
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No `{ ... }` span in the text
    #[error("no JSON object found in turn output")]
    NoJsonFound,

    /// A span was found but it is not a valid JSON object
    #[error("malformed JSON in turn output: {0}")]
    MalformedJson(String),
}

/// Locates and parses the single JSON object embedded in free-form model output.
///
/// Surrounding prose and Markdown code fences are tolerated. Broken JSON is
/// reported, never repaired.
#[derive(Debug, Clone)]
pub struct ResponseExtractor {
    sanitizer: ResponseSanitizer,
    /// First `{` up to the last `}`, across newlines
    json_span_regex: Regex,
}

impl ResponseExtractor {
    pub fn new() -> Self {
        Self {
            sanitizer: ResponseSanitizer::new(),
            json_span_regex: Regex::new(r"(?s)\{.*\}").expect("Invalid JSON span regex"),
        }
    }

    /// Extract the embedded JSON object from a raw turn
    pub fn extract(&self, raw: &str) -> Result<ParsedPayload, ExtractionError> {
        let span = self.find_json_span(raw).ok_or_else(|| {
            log::debug!("No JSON object found in {} bytes of turn output", raw.len());
            ExtractionError::NoJsonFound
        })?;

        serde_json::from_str::<ParsedPayload>(span).map_err(|e| {
            log::debug!("Malformed JSON span in turn output: {}", e);
            ExtractionError::MalformedJson(e.to_string())
        })
    }

    /// Return the candidate JSON span without parsing it
    pub fn find_json_span<'a>(&self, raw: &'a str) -> Option<&'a str> {
        if self.sanitizer.is_fenced(raw) {
            log::debug!("Stripping code fence from turn output");
        }
        let text = self.sanitizer.strip_fences(raw);
        self.json_span_regex.find(text).map(|m| m.as_str())
    }
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::new()
    }
}
