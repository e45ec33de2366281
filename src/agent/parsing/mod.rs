//! Structured output extraction and validation
//!
//! Raw model text is turned into a JSON object by [`ResponseExtractor`] and
//! checked against a [`FieldSchema`] by [`SchemaValidator`]. Both stages are
//! pure and return their failures as values.

pub mod field_schema;
pub mod output_validator;
pub mod parser_trait;
pub mod response_extractor;
pub mod response_sanitizer;

pub use field_schema::*;
pub use output_validator::*;
pub use parser_trait::*;
pub use response_extractor::*;
pub use response_sanitizer::*;
