use std::sync::atomic::{AtomicUsize, Ordering};

use agent_structured_output::agent::{
    AgentError, ParsingConfig, RawTurnOutput, StructuredOutputParser, StructuredTurn, TurnRunner,
};
use agent_structured_output::schemas::{IssueReport, PersonalInfo};
use async_trait::async_trait;
use serde_json::json;

/// Answers like an agent framework run result, forgetting the marker on the first turn
struct ForgetfulAgent {
    calls: AtomicUsize,
}

#[async_trait]
impl TurnRunner for ForgetfulAgent {
    async fn run_turn(&self, task: &str) -> Result<RawTurnOutput, AgentError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = if call == 0 || !task.contains("Remember") {
            "{\"product\": \"ACME Fiber 300Mbps\", \"issue\": \"internet drops every evening\"}"
        } else {
            "{\"product\": \"ACME Fiber 300Mbps\", \"issue\": \"internet drops every evening\"}\nTERMINATE"
        };

        let result = json!({
            "messages": [
                {"source": "user", "content": task},
                {"source": "Issue_Agent", "content": [{"type": "text", "text": reply}]}
            ]
        });
        Ok(RawTurnOutput::from_value(&result))
    }
}

#[tokio::test]
async fn retries_until_marker_present() {
    let agent = ForgetfulAgent {
        calls: AtomicUsize::new(0),
    };
    let parser = StructuredOutputParser::for_output::<IssueReport>().with_config(
        ParsingConfig::new()
            .with_termination_marker("TERMINATE")
            .with_reminder("Remember: Append TERMINATE."),
    );

    let issue: IssueReport = StructuredTurn::new(parser)
        .run_as(&agent, "User says: my fiber keeps dropping")
        .await
        .unwrap();

    assert_eq!(issue.product, "ACME Fiber 300Mbps");
    assert_eq!(agent.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn valid_reply_accepted_when_marker_never_appended() {
    struct NeverTerminates {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TurnRunner for NeverTerminates {
        async fn run_turn(&self, _task: &str) -> Result<RawTurnOutput, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawTurnOutput::new("Here you go:\n{\"name\": \"John\", \"location\": \"Gurgaon\"}"))
        }
    }

    let agent = NeverTerminates {
        calls: AtomicUsize::new(0),
    };
    let parser = StructuredOutputParser::for_output::<PersonalInfo>().with_config(
        ParsingConfig::new()
            .with_termination_marker("TERMINATE")
            .with_max_attempts(3),
    );

    let info: PersonalInfo = StructuredTurn::new(parser)
        .run_as(&agent, "I am John from Gurgaon")
        .await
        .unwrap();

    assert_eq!(info.location, "Gurgaon");
    assert_eq!(agent.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn concurrent_turns_do_not_interact() {
    struct Echo;

    #[async_trait]
    impl TurnRunner for Echo {
        async fn run_turn(&self, task: &str) -> Result<RawTurnOutput, AgentError> {
            Ok(RawTurnOutput::new(format!(
                "{{\"name\": \"{}\", \"location\": \"Paris\"}}",
                task
            )))
        }
    }

    let turn = StructuredTurn::for_output::<PersonalInfo>();
    let (a, b) = tokio::join!(turn.run_as::<PersonalInfo>(&Echo, "Ada"), turn.run_as::<PersonalInfo>(&Echo, "Grace"));

    assert_eq!(a.unwrap().name, "Ada");
    assert_eq!(b.unwrap().name, "Grace");
}
