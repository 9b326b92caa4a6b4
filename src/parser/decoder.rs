use super::error::DecodeError;
use super::regex_patterns::is_health_check;
use crate::domain::{DecodedEvent, Payload, RawEvent, Severity};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimum `|` separated segments of a pipe line: source, severity, payload.
const PIPE_SEGMENTS: usize = 3;

/// Shape of the raw lines in a batch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON when the line starts with `{`, pipe-delimited otherwise.
    #[default]
    Auto,
    Json,
    Pipe,
}

impl LogFormat {
    fn resolve(self, line: &str) -> LogFormat {
        match self {
            LogFormat::Auto if line.trim_start().starts_with('{') => LogFormat::Json,
            LogFormat::Auto => LogFormat::Pipe,
            explicit => explicit,
        }
    }
}

/// Turns one raw line into a `DecodedEvent`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageDecoder {
    format: LogFormat,
}

impl MessageDecoder {
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Decodes a raw line. Health-check noise yields `Ok(None)`.
    pub fn decode(&self, raw: &RawEvent) -> Result<Option<DecodedEvent>, DecodeError> {
        if is_health_check(&raw.message) {
            return Ok(None);
        }

        let timestamp = DateTime::from_timestamp_millis(raw.timestamp)
            .ok_or(DecodeError::InvalidTimestamp(raw.timestamp))?;

        let decoded = match self.format.resolve(&raw.message) {
            LogFormat::Json => {
                let (severity, payload) = Self::decode_json(&raw.message)?;
                DecodedEvent {
                    timestamp,
                    source: raw.source.clone(),
                    severity,
                    payload,
                }
            }
            LogFormat::Pipe | LogFormat::Auto => {
                let (source, severity, payload) = Self::decode_pipe(&raw.message)?;
                DecodedEvent {
                    timestamp,
                    source: if raw.source.is_empty() {
                        source.to_string()
                    } else {
                        raw.source.clone()
                    },
                    severity,
                    payload,
                }
            }
        };

        Ok(Some(decoded))
    }

    fn decode_json(line: &str) -> Result<(Severity, Payload), DecodeError> {
        let Value::Object(map) = serde_json::from_str::<Value>(line.trim())? else {
            return Err(DecodeError::NotAnObject);
        };
        let severity = Severity::from_level_field(map.get("level").and_then(Value::as_str));
        Ok((severity, Payload::Object(map)))
    }

    fn decode_pipe(line: &str) -> Result<(&str, Severity, Payload), DecodeError> {
        // splitn keeps any further '|' inside the payload segment
        let segments: Vec<&str> = line.splitn(PIPE_SEGMENTS, '|').collect();
        let [source, severity, payload] = segments[..] else {
            return Err(DecodeError::TooFewSegments {
                expected: PIPE_SEGMENTS,
                found: segments.len(),
            });
        };

        let label = severity.trim();
        if label.contains('-') {
            return Err(DecodeError::InvalidSeverity(label.to_string()));
        }
        let severity =
            Severity::from_label(label).ok_or_else(|| DecodeError::InvalidSeverity(label.to_string()))?;

        Ok((
            source.trim(),
            severity,
            Payload::Text(payload.trim().to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn raw(message: &str) -> RawEvent {
        RawEvent::new(1_700_000_000_123, message, "/ecs/concierge")
    }

    #[test]
    fn test_pipe_line() {
        let decoder = MessageDecoder::default();
        let event = decoder
            .decode(&raw("2024-01-01 | INFO | sabre-adapter - {'request_uuid': 'A'} Took 1s"))
            .unwrap()
            .unwrap();

        assert_eq!(
            event.timestamp,
            Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
        );
        assert_eq!(event.source, "/ecs/concierge");
        assert_eq!(event.severity, Severity::Info);
        assert_eq!(
            event.payload,
            Payload::Text("sabre-adapter - {'request_uuid': 'A'} Took 1s".into())
        );
    }

    #[test]
    fn test_pipe_payload_keeps_inner_delimiters() {
        let decoder = MessageDecoder::new(LogFormat::Pipe);
        let event = decoder
            .decode(&raw("src|ERROR|svc - {'a': 'x|y'} tail|more"))
            .unwrap()
            .unwrap();
        assert_eq!(
            event.payload,
            Payload::Text("svc - {'a': 'x|y'} tail|more".into())
        );
    }

    #[test]
    fn test_pipe_source_falls_back_to_first_segment() {
        let decoder = MessageDecoder::default();
        let event = decoder
            .decode(&RawEvent::new(0, "router | DEBUG | x", ""))
            .unwrap()
            .unwrap();
        assert_eq!(event.source, "router");
    }

    #[test]
    fn test_pipe_errors() {
        let decoder = MessageDecoder::new(LogFormat::Pipe);
        assert_eq!(
            decoder.decode(&raw("only|two")),
            Err(DecodeError::TooFewSegments {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            decoder.decode(&raw("src|-|payload")),
            Err(DecodeError::InvalidSeverity("-".into()))
        );
        assert_eq!(
            decoder.decode(&raw("src|IN-FO|payload")),
            Err(DecodeError::InvalidSeverity("IN-FO".into()))
        );
        assert_eq!(
            decoder.decode(&raw("src|LOUD|payload")),
            Err(DecodeError::InvalidSeverity("LOUD".into()))
        );
    }

    #[test]
    fn test_json_line() {
        let decoder = MessageDecoder::default();
        let event = decoder
            .decode(&raw(
                r#"{"level": "error", "request_uuid": "X", "stats": {"time": 0.42}}"#,
            ))
            .unwrap()
            .unwrap();
        assert_eq!(event.severity, Severity::Error);
        let Payload::Object(map) = event.payload else {
            panic!("expected object payload");
        };
        assert_eq!(map["stats"], json!({"time": 0.42}));
    }

    #[test]
    fn test_json_level_defaults_to_undefined() {
        let decoder = MessageDecoder::new(LogFormat::Json);
        let event = decoder.decode(&raw(r#"{"msg": "x"}"#)).unwrap().unwrap();
        assert_eq!(event.severity, Severity::Undefined);
    }

    #[test]
    fn test_json_errors() {
        let decoder = MessageDecoder::new(LogFormat::Json);
        assert!(matches!(
            decoder.decode(&raw(r#"{"level": "#)),
            Err(DecodeError::InvalidJson(_))
        ));
        assert_eq!(decoder.decode(&raw("[1, 2]")), Err(DecodeError::NotAnObject));
    }

    #[test]
    fn test_health_check_is_noise() {
        let decoder = MessageDecoder::default();
        let health_check = r#"10.0.0.1 - - [01/Jan/2024] "GET / HTTP/1.1" 200 2 "-" "ELB-HealthChecker/2.0""#;
        assert_eq!(decoder.decode(&raw(health_check)), Ok(None));
    }

    #[test]
    fn test_invalid_timestamp() {
        let decoder = MessageDecoder::default();
        assert_eq!(
            decoder.decode(&RawEvent::new(i64::MAX, "a|INFO|b", "")),
            Err(DecodeError::InvalidTimestamp(i64::MAX))
        );
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let decoder = MessageDecoder::default();
        for line in [
            r#"{"level": "info", "requestUuid": "Y", "calling_function": "oracle.GetPackage"}"#,
            "s | WARNING | windsurfer - {'requestUuid': 'Y'} Took 0.3s",
        ] {
            let event = raw(line);
            assert_eq!(decoder.decode(&event), decoder.decode(&event));
        }
    }
}
