use agent_structured_output::agent::{
    AgentError, ExtractionError, FieldError, FieldErrorReason, FieldKind, FieldSchema,
    ParsedPayload, ResponseExtractor, SchemaValidator, StructuredOutputParser,
};
use serde_json::{json, Value};

fn payload(value: Value) -> ParsedPayload {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn parse(raw: &str, schema: &FieldSchema) -> Result<Value, AgentError> {
    StructuredOutputParser::new(schema.clone())
        .parse(raw)
        .map(|record| record.into_value())
}

fn field_errors(raw: &str, schema: &FieldSchema) -> Vec<FieldError> {
    match parse(raw, schema) {
        Err(AgentError::Validation(failure)) => failure.errors,
        other => panic!("expected validation failure, got {:?}", other),
    }
}

fn research_schema() -> FieldSchema {
    FieldSchema::new()
        .required("question", FieldKind::string())
        .required("confidence", FieldKind::float_in(0.0, 1.0))
        .required("sources", FieldKind::list())
        .optional_with_default("next_steps", FieldKind::list_of(FieldKind::string()), json!([]))
}

#[test]
fn exact_payload_is_extended_with_defaults() {
    let input = json!({"question": "q", "confidence": 0.4, "sources": ["a"]});
    let record = SchemaValidator::new()
        .validate(&payload(input.clone()), &research_schema())
        .unwrap();

    let mut expected = input;
    expected["next_steps"] = json!([]);
    assert_eq!(record.into_value(), expected);
}

#[test]
fn text_without_braces_has_no_json() {
    let extractor = ResponseExtractor::new();
    for raw in ["", "plain prose", "[1, 2, 3]", "only an opening { brace", "closing } only"] {
        assert_eq!(extractor.extract(raw), Err(ExtractionError::NoJsonFound), "{:?}", raw);
    }
}

#[test]
fn prose_around_json_is_ignored() {
    let extractor = ResponseExtractor::new();
    let object = json!({"name": "Ada", "location": "London", "tags": {"a": [1, 2]}});
    let embedded = object.to_string();

    for (before, after) in [
        ("", ""),
        ("Here is the JSON you asked for:\n", "\nTERMINATE"),
        ("Sure!", " Let me know if you need anything else."),
        ("Multi\nline\nintro\n\n", "\n\n(end)"),
    ] {
        let raw = format!("{}{}{}", before, embedded, after);
        assert_eq!(extractor.extract(&raw).unwrap(), payload(object.clone()));
    }
}

#[test]
fn fences_do_not_change_extraction() {
    let extractor = ResponseExtractor::new();
    let raw = r#"{"thoughts": "fine", "response": "neutral"}"#;
    let expected = extractor.extract(raw);

    for wrapped in [
        format!("```\n{}\n```", raw),
        format!("```json\n{}\n```", raw),
        format!("  ```JSON {}```\n", raw),
    ] {
        assert_eq!(extractor.extract(&wrapped), expected);
    }
}

#[test]
fn pipeline_is_idempotent() {
    let schema = research_schema();
    let raw = "Result:\n{\"question\": \"q\", \"confidence\": \"0.5\", \"sources\": []}";
    let first = parse(raw, &schema).unwrap();
    assert_eq!(first["confidence"], json!(0.5));
    assert_eq!(parse(raw, &schema).unwrap(), first);

    let bad = "{\"confidence\": 9}";
    assert_eq!(field_errors(bad, &schema), field_errors(bad, &schema));

    let none = "no structure at all";
    for _ in 0..2 {
        assert!(matches!(
            parse(none, &schema),
            Err(AgentError::Extraction(ExtractionError::NoJsonFound))
        ));
    }
}

#[test]
fn missing_required_field() {
    let schema = FieldSchema::new()
        .required("name", FieldKind::string())
        .required("location", FieldKind::string());
    assert_eq!(
        field_errors(r#"{"location":"Paris"}"#, &schema),
        vec![FieldError::new("name", FieldErrorReason::Missing)]
    );
}

#[test]
fn confidence_out_of_range() {
    let schema = FieldSchema::new().required("confidence", FieldKind::float_in(0.0, 1.0));
    assert_eq!(
        field_errors(r#"{"confidence": 1.5}"#, &schema),
        vec![FieldError::new("confidence", FieldErrorReason::OutOfRange)]
    );
}

#[test]
fn response_enum() {
    let schema = FieldSchema::new().required("response", FieldKind::enumeration(["happy", "sad", "neutral"]));
    assert_eq!(
        field_errors(r#"{"response":"angry"}"#, &schema),
        vec![FieldError::new("response", FieldErrorReason::NotInEnum)]
    );
    assert_eq!(parse(r#"{"response":"happy"}"#, &schema).unwrap(), json!({"response": "happy"}));
}

#[test]
fn all_errors_reported_in_one_pass() {
    let schema = FieldSchema::new()
        .required("name", FieldKind::string())
        .required("location", FieldKind::string())
        .required("confidence", FieldKind::float_in(0.0, 1.0));

    assert_eq!(
        field_errors(r#"{"confidence": -0.1}"#, &schema),
        vec![
            FieldError::new("name", FieldErrorReason::Missing),
            FieldError::new("location", FieldErrorReason::Missing),
            FieldError::new("confidence", FieldErrorReason::OutOfRange),
        ]
    );
}

#[test]
fn malformed_json_is_not_repaired() {
    let extractor = ResponseExtractor::new();
    for raw in ["{'name': 'x'}", "{name: \"x\"}", "{\"name\": \"x\",}", "{\"a\": 1} and {\"b\": 2}"] {
        assert!(
            matches!(extractor.extract(raw), Err(ExtractionError::MalformedJson(_))),
            "{:?}",
            raw
        );
    }
}
