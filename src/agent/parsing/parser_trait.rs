//! Extraction and validation composed into one structured output parser

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::agent::AgentError;

use super::{
    ExtractionError, FieldSchema, ParsedPayload, ResponseExtractor, SchemaValidator,
    ValidatedRecord,
};

/// Reminder appended to the task when a structured turn is retried
pub const DEFAULT_REMINDER: &str = "Remember: return ONLY strict JSON as instructed.";

/// Configuration for structured output parsing and the turns that produce it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Reject keys the top-level schema does not declare
    pub strict_mode: bool,
    /// Marker the prompt asks the model to append, e.g. `TERMINATE`
    pub termination_marker: Option<String>,
    /// Retry a reply that lacks the marker
    pub require_termination_marker: bool,
    /// Also reject a reply without the marker on the final attempt
    pub reject_without_marker: bool,
    /// Total number of turns to try, including the first
    pub max_attempts: usize,
    /// Text appended to the task on retry
    pub reminder: String,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            termination_marker: None,
            require_termination_marker: false,
            reject_without_marker: false,
            max_attempts: 2,
            reminder: DEFAULT_REMINDER.to_string(),
        }
    }
}

impl ParsingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Ask for the given marker; replies without it are retried
    pub fn with_termination_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.termination_marker = Some(marker.into());
        self.require_termination_marker = true;
        self
    }

    pub fn with_reject_without_marker(mut self, reject: bool) -> Self {
        self.reject_without_marker = reject;
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_reminder<S: Into<String>>(mut self, reminder: S) -> Self {
        self.reminder = reminder.into();
        self
    }
}

/// A typed reply that declares the field schema it must satisfy
pub trait StructuredOutput: DeserializeOwned {
    fn field_schema() -> FieldSchema;
}

/// Turns raw model output into a validated record for one schema
#[derive(Debug, Clone)]
pub struct StructuredOutputParser {
    extractor: ResponseExtractor,
    validator: SchemaValidator,
    schema: FieldSchema,
    config: ParsingConfig,
}

impl StructuredOutputParser {
    pub fn new(schema: FieldSchema) -> Self {
        Self {
            extractor: ResponseExtractor::new(),
            validator: SchemaValidator::new(),
            schema,
            config: ParsingConfig::default(),
        }
    }

    /// Parser for the schema declared by `T`
    pub fn for_output<T: StructuredOutput>() -> Self {
        Self::new(T::field_schema())
    }

    pub fn with_config(mut self, config: ParsingConfig) -> Self {
        self.validator = SchemaValidator::new().with_strict_mode(config.strict_mode);
        self.config = config;
        self
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    pub fn extract(&self, raw: &str) -> Result<ParsedPayload, ExtractionError> {
        self.extractor.extract(raw)
    }

    /// Extract the embedded JSON object and validate it against the schema
    pub fn parse(&self, raw: &str) -> Result<ValidatedRecord, AgentError> {
        let payload = self.extractor.extract(raw)?;
        let record = self.validator.validate(&payload, &self.schema)?;
        Ok(record)
    }

    /// Parse and convert the record into `T`
    pub fn parse_as<T: DeserializeOwned>(&self, raw: &str) -> Result<T, AgentError> {
        let record = self.parse(raw)?;
        Ok(record.deserialize()?)
    }
}
