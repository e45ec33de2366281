use serde::{Deserialize, Serialize};

use crate::agent::{FieldKind, FieldSchema, StructuredOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Happy,
    Sad,
    Neutral,
}

impl Sentiment {
    pub const VALUES: [&'static str; 3] = ["happy", "sad", "neutral"];
}

/// Categorization of a user message as happy, sad or neutral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub thoughts: String,
    pub response: Sentiment,
}

impl StructuredOutput for SentimentResponse {
    fn field_schema() -> FieldSchema {
        FieldSchema::new()
            .required("thoughts", FieldKind::string())
            .required("response", FieldKind::enumeration(Sentiment::VALUES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentError, FieldErrorReason, StructuredOutputParser};

    #[test]
    fn test_parse_sentiment() {
        let parser = StructuredOutputParser::for_output::<SentimentResponse>();
        let response: SentimentResponse = parser
            .parse_as(r#"{"thoughts": "The user says they are happy.", "response": "happy"}"#)
            .unwrap();
        assert_eq!(response.response, Sentiment::Happy);
    }

    #[test]
    fn test_reject_unknown_sentiment() {
        let parser = StructuredOutputParser::for_output::<SentimentResponse>();
        match parser.parse(r#"{"thoughts": "hmm", "response": "angry"}"#) {
            Err(AgentError::Validation(failure)) => {
                assert!(failure.contains("response", &FieldErrorReason::NotInEnum));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
