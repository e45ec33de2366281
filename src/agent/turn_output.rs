//! Normalization of agent framework responses into plain turn text

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The complete text produced by one model turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTurnOutput(String);

impl RawTurnOutput {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Normalize a framework run result into turn text.
    ///
    /// Looks, in order, at the last message with non-empty content, a `reply`,
    /// a non-blank `summary` and a string `content`. Unknown shapes yield an
    /// empty output.
    pub fn from_value(value: &Value) -> Self {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Object(result) => {
                let from_messages = result
                    .get("messages")
                    .and_then(Value::as_array)
                    .map(|messages| last_message_text(messages))
                    .filter(|text| !text.is_empty());

                from_messages
                    .or_else(|| {
                        result
                            .get("reply")
                            .map(message_text)
                            .filter(|text| !text.is_empty())
                    })
                    .or_else(|| {
                        result
                            .get("summary")
                            .and_then(Value::as_str)
                            .map(str::trim)
                            .filter(|summary| !summary.is_empty())
                            .map(str::to_string)
                    })
                    .or_else(|| result.get("content").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_default()
            }
            _ => String::new(),
        };

        Self(text)
    }

    /// Text of the last message with non-empty content
    pub fn from_messages(messages: &[Value]) -> Self {
        Self(last_message_text(messages))
    }
}

fn last_message_text(messages: &[Value]) -> String {
    messages
        .iter()
        .rev()
        .map(message_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn message_text(message: &Value) -> String {
    match message {
        Value::String(s) => s.clone(),
        Value::Object(fields) => fields.get("content").map(content_text).unwrap_or_default(),
        _ => String::new(),
    }
}

/// Content is either a string or a list of parts such as `{"type": "text", "text": "..."}`
fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(part_text)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

fn part_text(part: &Value) -> Option<String> {
    match part {
        Value::String(s) => Some(s.clone()),
        Value::Object(fields) => ["text", "content"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_str))
            .find(|text| !text.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

impl fmt::Display for RawTurnOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RawTurnOutput {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawTurnOutput {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for RawTurnOutput {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}
