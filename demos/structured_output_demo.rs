use agent_structured_output::{
    agent::{
        AgentError, ParsingConfig, RawTurnOutput, StructuredOutputParser, StructuredTurn,
        TerminationMarker, TurnRunner,
    },
    schemas::{PersonalInfo, ResearchReport, SentimentResponse, StockSnapshot},
};
use async_trait::async_trait;
use serde_json::json;

/// Stand-in for a hosted model that needs one reminder before appending TERMINATE
struct CannedOnboardingAgent;

#[async_trait]
impl TurnRunner for CannedOnboardingAgent {
    async fn run_turn(&self, task: &str) -> Result<RawTurnOutput, AgentError> {
        let reply = if task.contains("Remember") {
            "{\"name\":\"John Doe\",\"location\":\"Gurgaon, India\"}\nTERMINATE"
        } else {
            "{\"name\":\"John Doe\",\"location\":\"Gurgaon, India\"}"
        };
        Ok(RawTurnOutput::from_value(&json!({
            "messages": [{"source": "Personal_Info_Agent", "content": reply}]
        })))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("🚀 Structured Output Demo\n");

    // Sentiment categorization
    println!("🔍 Sentiment response...");
    let parser = StructuredOutputParser::for_output::<SentimentResponse>();
    for input in [
        r#"{"thoughts": "The user states they are happy.", "response": "happy"}"#,
        r#"{"thoughts": "Sounds upset.", "response": "angry"}"#,
    ] {
        match parser.parse_as::<SentimentResponse>(input) {
            Ok(response) => println!("  ✅ {:?}: {}", response.response, response.thoughts),
            Err(e) => println!("  ❌ {}", e),
        }
    }

    // Fenced stock data with prose around it
    println!("\n🔍 Stock snapshot...");
    let parser = StructuredOutputParser::for_output::<StockSnapshot>();
    let reply = "```json\n{\"name\": \"Microsoft Corporation\", \"symbol\": \"MSFT\", \"pe_ratio\": 36.2, \
                 \"prices\": {\"2024-05-01\": 394.94, \"2024-05-31\": 415.13}}\n```";
    let snapshot: StockSnapshot = parser.parse_as(reply)?;
    if let Some(change) = snapshot.period_change() {
        println!("  ✅ {} ({}) moved {:.2}% over the period", snapshot.name, snapshot.symbol, change * 100.0);
    }

    // Research report with several problems at once
    println!("\n🔍 Research report...");
    let parser = StructuredOutputParser::for_output::<ResearchReport>();
    if let Err(e) = parser.parse(r#"{"findings": ["x"], "sources": [{"url": "u"}], "confidence": 1.5}"#) {
        println!("  ❌ {}", e);
    }

    // Onboarding turn with a termination marker and one retry
    println!("\n🔍 Onboarding turn...");
    let marker = TerminationMarker::terminate();
    let parser = StructuredOutputParser::for_output::<PersonalInfo>().with_config(
        ParsingConfig::new()
            .with_termination_marker(marker.as_str())
            .with_reminder("Remember: Append TERMINATE."),
    );
    let info: PersonalInfo = StructuredTurn::new(parser)
        .run_as(&CannedOnboardingAgent, "User says:\nI'm John Doe from Gurgaon, India")
        .await?;
    println!("  ✅ Captured: name={}  location={}", info.name, info.location);

    Ok(())
}
