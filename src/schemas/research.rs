use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::agent::{FieldKind, FieldSchema, StructuredOutput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

impl Source {
    pub fn field_schema() -> FieldSchema {
        FieldSchema::new()
            .required("title", FieldKind::string())
            .required("url", FieldKind::string())
    }
}

/// Sourced findings for a research question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub question: String,
    pub findings: Vec<String>,
    pub sources: Vec<Source>,
    /// Overall confidence in the findings, between 0 and 1
    pub confidence: f64,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

impl StructuredOutput for ResearchReport {
    fn field_schema() -> FieldSchema {
        FieldSchema::new()
            .required("question", FieldKind::string())
            .required("findings", FieldKind::list_of(FieldKind::string()))
            .required("sources", FieldKind::list_of(FieldKind::object(Source::field_schema())))
            .required("confidence", FieldKind::float_in(0.0, 1.0))
            .optional_with_default("next_steps", FieldKind::list_of(FieldKind::string()), json!([]))
    }
}
