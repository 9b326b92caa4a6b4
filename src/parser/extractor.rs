use super::braces::find_object;
use super::error::MalformedPayloadError;
use super::literal::parse_literal;
use crate::domain::{DecodedEvent, ExtractedEvent, Payload, Service, SubMessage};
use serde_json::{Map, Value};

/// Accepted spellings of the correlation key, in lookup order for JSON lines.
pub const REQUEST_ID_KEYS: [&str; 2] = ["request_uuid", "requestUuid"];

/// Pipe lines carry the camel-case key as the authoritative one.
pub const PIPE_REQUEST_ID_KEYS: [&str; 2] = ["requestUuid", "request_uuid"];

/// Pulls the correlation id, service label and remaining sub-message out of a decoded payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadExtractor;

impl PayloadExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, event: DecodedEvent) -> Result<ExtractedEvent, MalformedPayloadError> {
        let DecodedEvent {
            timestamp,
            source,
            severity,
            payload,
        } = event;

        let fields = match payload {
            Payload::Object(map) => Self::from_object(map),
            Payload::Text(tail) => Self::from_text(&tail)?,
        };

        Ok(ExtractedEvent {
            timestamp,
            source,
            severity,
            request_uuid: fields.request_uuid,
            service_label: fields.service_label,
            function: fields.function,
            sub_message: fields.sub_message,
        })
    }

    fn from_object(map: Map<String, Value>) -> Fields {
        let calling_function = map
            .get("calling_function")
            .and_then(Value::as_str)
            .map(str::to_string);

        Fields {
            request_uuid: request_id(&map, REQUEST_ID_KEYS),
            service_label: calling_function
                .as_deref()
                .and_then(Service::find_in)
                .map(|service| service.as_str().to_string()),
            function: calling_function,
            sub_message: SubMessage::Structured(map),
        }
    }

    fn from_text(tail: &str) -> Result<Fields, MalformedPayloadError> {
        let (label, rest) = tail.split_once('-').unwrap_or((tail, ""));

        let span = find_object(rest)?;
        let Value::Object(literal) = parse_literal(span.slice(rest))? else {
            return Err(MalformedPayloadError::NotADict);
        };

        let label = label.trim();
        Ok(Fields {
            request_uuid: request_id(&literal, PIPE_REQUEST_ID_KEYS),
            service_label: (!label.is_empty()).then(|| label.to_string()),
            function: Some(tail.to_string()),
            sub_message: SubMessage::Text(span.rest(rest).to_string()),
        })
    }
}

struct Fields {
    request_uuid: Option<String>,
    service_label: Option<String>,
    function: Option<String>,
    sub_message: SubMessage,
}

/// First usable value under `keys`: a non-empty string, or a number rendered as text.
pub fn request_id(map: &Map<String, Value>, keys: [&str; 2]) -> Option<String> {
    keys.into_iter().find_map(|key| match map.get(key)? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    })
}
