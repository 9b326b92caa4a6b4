use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One line as delivered by the log source, before any decoding.
///
/// Partition exports store these as newline-delimited JSON, one object per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub message: String,
    /// Originating log group. Filled from the partition file name when absent.
    #[serde(default)]
    pub source: String,
}

impl RawEvent {
    pub fn new(timestamp: i64, message: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
            source: source.into(),
        }
    }
}

/// Embedded payload of a decoded line.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Single JSON object lines.
    Object(Map<String, Value>),
    /// Trailing text of a pipe-delimited line, with any inner `|` kept.
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub severity: Severity,
    pub payload: Payload,
}

/// Whatever is left of the payload once the correlation fields are pulled out.
#[derive(Debug, Clone, PartialEq)]
pub enum SubMessage {
    /// The JSON payload itself, kept for the `stats` block and the `message` text.
    Structured(Map<String, Value>),
    /// Free text after the leading object literal of a pipe line.
    Text(String),
}

impl SubMessage {
    /// Free text carried by the event: the `message` key of a structured payload, or the text itself.
    pub fn text(&self) -> Option<&str> {
        match self {
            SubMessage::Structured(map) => map.get("message").and_then(Value::as_str),
            SubMessage::Text(text) => Some(text),
        }
    }

    /// Numeric `stats.time` of a structured payload, rendered as the source wrote it.
    /// True when the payload carries a non-empty `stats` object.
    pub fn has_stats(&self) -> bool {
        match self {
            SubMessage::Structured(map) => map
                .get("stats")
                .and_then(Value::as_object)
                .is_some_and(|stats| !stats.is_empty()),
            SubMessage::Text(_) => false,
        }
    }

    pub fn stats_time(&self) -> Option<String> {
        let SubMessage::Structured(map) = self else {
            return None;
        };
        match map.get("stats")?.get("time")? {
            Value::Number(number) => Some(number.to_string()),
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            _ => None,
        }
    }
}

/// A decoded event with its correlation fields resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEvent {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub severity: Severity,
    pub request_uuid: Option<String>,
    /// Known service name (JSON lines) or the text before the first hyphen (pipe lines).
    pub service_label: Option<String>,
    /// `calling_function` of JSON lines, the whole payload tail of pipe lines.
    pub function: Option<String>,
    pub sub_message: SubMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structured(value: Value) -> SubMessage {
        match value {
            Value::Object(map) => SubMessage::Structured(map),
            _ => unreachable!("test payloads are objects"),
        }
    }

    #[test]
    fn test_raw_event_source_defaults_to_empty() {
        let event: RawEvent =
            serde_json::from_str(r#"{"timestamp": 1700000000000, "message": "hello"}"#).unwrap();
        assert_eq!(event, RawEvent::new(1_700_000_000_000, "hello", ""));
    }

    #[test]
    fn test_stats_time_rendering() {
        assert_eq!(
            structured(json!({"stats": {"time": 0.42}})).stats_time(),
            Some("0.42".to_string())
        );
        assert_eq!(
            structured(json!({"stats": {"time": 3}})).stats_time(),
            Some("3".to_string())
        );
        assert_eq!(
            structured(json!({"stats": {"time": "1.5"}})).stats_time(),
            Some("1.5".to_string())
        );
        assert_eq!(structured(json!({"stats": {}})).stats_time(), None);
        assert_eq!(structured(json!({"stats": {"time": null}})).stats_time(), None);
        assert_eq!(SubMessage::Text("Took 1s".into()).stats_time(), None);
    }

    #[test]
    fn test_has_stats() {
        assert!(structured(json!({"stats": {"rows": 3}})).has_stats());
        assert!(!structured(json!({"stats": {}})).has_stats());
        assert!(!structured(json!({"stats": 1.5})).has_stats());
        assert!(!structured(json!({"message": "done"})).has_stats());
        assert!(!SubMessage::Text("Took 1s".into()).has_stats());
    }

    #[test]
    fn test_sub_message_text() {
        assert_eq!(
            structured(json!({"message": "GRPC Request {}"})).text(),
            Some("GRPC Request {}")
        );
        assert_eq!(structured(json!({"message": 5})).text(), None);
        assert_eq!(SubMessage::Text(" Took 2s".into()).text(), Some(" Took 2s"));
    }
}
