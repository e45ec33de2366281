use thiserror::Error;

use super::parsing::{ExtractionError, ValidationFailure};

/// Errors surfaced to the caller of a structured turn
#[derive(Error, Debug)]
pub enum AgentError {
    /// No usable JSON object in the turn output
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The JSON object did not satisfy the field schema
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationFailure),

    /// The reply did not contain the expected termination marker
    #[error("Missing termination marker: {0}")]
    MissingTerminationMarker(String),

    /// A validated record could not be turned into the requested type
    #[error("Output parsing error: {0}")]
    OutputParsingError(String),

    /// The turn runner itself failed
    #[error("Turn error: {0}")]
    TurnError(String),

    #[error("Error: {0}")]
    OtherError(String),
}

impl AgentError {
    /// Whether re-prompting the model could fix this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AgentError::Extraction(_)
                | AgentError::Validation(_)
                | AgentError::MissingTerminationMarker(_)
        )
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::OutputParsingError(err.to_string())
    }
}
