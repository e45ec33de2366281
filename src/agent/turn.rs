//! Caller-side driver that retries a model turn until its reply validates

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{
    AgentError, RawTurnOutput, StructuredOutput, StructuredOutputParser, TerminationMarker,
    ValidatedRecord,
};

/// Runs one model turn for a task and returns its text.
///
/// Implemented by the integrating application on top of whatever agent
/// framework or model client it uses.
#[async_trait]
pub trait TurnRunner: Send + Sync {
    async fn run_turn(&self, task: &str) -> Result<RawTurnOutput, AgentError>;
}

/// Runs turns through a [`TurnRunner`] until the reply parses into a valid record
#[derive(Debug, Clone)]
pub struct StructuredTurn {
    parser: StructuredOutputParser,
    marker: Option<TerminationMarker>,
}

impl StructuredTurn {
    pub fn new(parser: StructuredOutputParser) -> Self {
        let config = parser.config();
        let marker = config
            .termination_marker
            .as_ref()
            .filter(|_| config.require_termination_marker)
            .map(TerminationMarker::new);

        Self { parser, marker }
    }

    pub fn for_output<T: StructuredOutput>() -> Self {
        Self::new(StructuredOutputParser::for_output::<T>())
    }

    pub fn parser(&self) -> &StructuredOutputParser {
        &self.parser
    }

    /// Run the task, retrying with the configured reminder on recoverable failures
    pub async fn run(
        &self,
        runner: &dyn TurnRunner,
        task: &str,
    ) -> Result<ValidatedRecord, AgentError> {
        let config = self.parser.config();
        let max_attempts = config.max_attempts.max(1);
        let mut prompt = task.to_string();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let output = runner.run_turn(&prompt).await?;

            match self.check(&output, attempt == max_attempts) {
                Ok(record) => {
                    if attempt > 1 {
                        log::info!("Structured turn succeeded on attempt {}", attempt);
                    }
                    return Ok(record);
                }
                Err(e) if e.is_recoverable() => {
                    log::warn!(
                        "Structured turn attempt {}/{} rejected: {}",
                        attempt,
                        max_attempts,
                        e
                    );
                    prompt = format!("{}\n{}\nPrevious reply was rejected: {}", task, config.reminder, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| AgentError::OtherError("No structured turn attempts were made".to_string())))
    }

    /// Run the task and convert the accepted record into `T`
    pub async fn run_as<T: DeserializeOwned>(
        &self,
        runner: &dyn TurnRunner,
        task: &str,
    ) -> Result<T, AgentError> {
        let record = self.run(runner, task).await?;
        Ok(record.deserialize()?)
    }

    /// A missing marker only rejects the reply while retries remain, unless
    /// `reject_without_marker` is set.
    fn check(&self, output: &RawTurnOutput, last_attempt: bool) -> Result<ValidatedRecord, AgentError> {
        if let Some(marker) = &self.marker {
            if !marker.is_present(output.as_str()) {
                if !last_attempt || self.parser.config().reject_without_marker {
                    return Err(AgentError::MissingTerminationMarker(marker.as_str().to_string()));
                }
                log::warn!("Reply still lacks {} on the final attempt, parsing it anyway", marker.as_str());
            }
        }
        self.parser.parse(output.as_str())
    }
}
