use super::correlator::Trace;
use super::error::ClassificationError;
use crate::domain::{ExtractedEvent, Operation, Service, SubMessage};
use crate::parser::braces::find_object;
use crate::parser::error::MalformedPayloadError;
use crate::parser::literal::parse_literal;
use crate::parser::regex_patterns::took_latency;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

/// Free-text marker of a downstream request line that embeds the request body.
pub const TENANT_MARKER: &str = "GRPC Request";

/// Latency of a trace that never reported a measurement. Below the validity epsilon.
pub const DEFAULT_LATENCY: &str = "0";

/// Request bodies that carry the hotel one level down.
const HOTEL_CONTAINERS: [&str; 2] = ["availabilityRequest", "reservationDetails"];

/// One trace, labelled.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub correlation_id: String,
    pub initial_time: DateTime<Utc>,
    pub service: Option<Service>,
    pub operation: Option<Operation>,
    /// Numeric token as found in the log, without unit conversion.
    pub end_to_end_latency: String,
    pub tenant_id: Option<String>,
    pub events: Vec<ExtractedEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub record: ClassifiedRecord,
    /// Tenant-bearing lines whose embedded object could not be recovered.
    pub tenant_failures: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TraceClassifier;

impl TraceClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, trace: Trace) -> Result<Classification, ClassificationError> {
        let Trace {
            correlation_id,
            events,
        } = trace;

        let Some(initial_time) = events.first().map(|event| event.timestamp) else {
            return Err(ClassificationError::EmptyTrace { correlation_id });
        };

        let mut latency = None;
        let mut tenant_id = None;
        let mut tenant_failures = 0;

        for event in &events {
            if let Some(measured) = measured_latency(event) {
                latency = Some(measured);
            }

            if let Some(text) = event.sub_message.text()
                && text.contains(TENANT_MARKER)
            {
                match extract_tenant(text) {
                    Ok(Some(tenant)) => tenant_id = Some(tenant),
                    Ok(None) => tenant_id = None,
                    Err(error) => {
                        tenant_failures += 1;
                        warn!(%correlation_id, %error, "could not read tenant from request line");
                    }
                }
            }
        }

        let (service, operation) = resolve_labels(&events);

        Ok(Classification {
            record: ClassifiedRecord {
                correlation_id,
                initial_time,
                service,
                operation,
                end_to_end_latency: latency.unwrap_or_else(|| DEFAULT_LATENCY.to_string()),
                tenant_id,
                events,
            },
            tenant_failures,
        })
    }
}

/// Scans events in order until both labels are known.
fn resolve_labels(events: &[ExtractedEvent]) -> (Option<Service>, Option<Operation>) {
    let mut service = None;
    let mut operation = None;

    for event in events {
        if service.is_some() && operation.is_some() {
            break;
        }
        if service.is_none() {
            service = event.service_label.as_deref().and_then(Service::find_in);
        }
        if operation.is_none() {
            operation = event.function.as_deref().and_then(Operation::find_in);
        }
    }

    (service, operation)
}

/// Latency reported by a single event, if any.
///
/// Structured payloads report through `stats.time`, and a `stats` block without a
/// time reports [`DEFAULT_LATENCY`]. Free text reports through the older
/// `Took <value><unit>` phrase.
pub fn measured_latency(event: &ExtractedEvent) -> Option<String> {
    match &event.sub_message {
        SubMessage::Structured(_) => event.sub_message.has_stats().then(|| {
            event
                .sub_message
                .stats_time()
                .unwrap_or_else(|| DEFAULT_LATENCY.to_string())
        }),
        SubMessage::Text(text) => took_latency(text).map(str::to_string),
    }
}

/// Reads the hotel code out of the first object literal embedded in `message`.
///
/// The hotel sits at the top level, or under `availabilityRequest` or
/// `reservationDetails`; a body with none of these has no tenant.
pub fn extract_tenant(message: &str) -> Result<Option<String>, MalformedPayloadError> {
    let span = find_object(message)?;
    let Value::Object(body) = parse_literal(span.slice(message))? else {
        return Err(MalformedPayloadError::NotADict);
    };

    let hotel = match body.get("hotel").filter(|hotel| !hotel.is_null()) {
        Some(hotel) => Some(hotel),
        None => HOTEL_CONTAINERS
            .into_iter()
            .find_map(|key| body.get(key).filter(|container| !container.is_null()))
            .and_then(|container| container.get("hotel")),
    };

    let tenant = match hotel.and_then(|hotel| hotel.get("imsHotelId")) {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    };
    Ok(tenant)
}
