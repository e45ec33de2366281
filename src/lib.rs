//! Structured output extraction and validation for agent model turns.
//!
//! A model turn is free-form text that should embed one JSON object.
//! [`agent::ResponseExtractor`] finds and parses that object,
//! [`agent::SchemaValidator`] checks it against a declarative
//! [`agent::FieldSchema`], and [`agent::StructuredTurn`] lets a caller retry a
//! turn with a reminder until the reply validates.
//!
//! ```rust,ignore
//! use agent_structured_output::agent::StructuredOutputParser;
//! use agent_structured_output::schemas::PersonalInfo;
//!
//! let parser = StructuredOutputParser::for_output::<PersonalInfo>();
//! let info: PersonalInfo = parser.parse_as("{\"name\":\"John\",\"location\":\"Paris\"}\nTERMINATE")?;
//! ```

pub mod agent;
pub mod schemas;
