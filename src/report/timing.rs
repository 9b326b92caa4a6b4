use crate::domain::StatsError;
use crate::trace::{ClassifiedRecord, measured_latency};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One latency-bearing event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingRow {
    pub timestamp: String,
    pub request_uuid: String,
    pub service: String,
    pub function: String,
    pub latency: String,
}

/// Rows for every event that reported a non-zero latency.
pub fn timing_rows(records: &[ClassifiedRecord]) -> Vec<TimingRow> {
    records
        .iter()
        .flat_map(|record| {
            record.events.iter().filter_map(|event| {
                measured_latency(event)
                    .filter(|latency| is_nonzero(latency))
                    .map(|latency| TimingRow {
                        timestamp: event.timestamp.to_rfc3339(),
                        request_uuid: event.request_uuid.clone().unwrap_or_default(),
                        service: event.service_label.clone().unwrap_or_default(),
                        function: event.function.clone().unwrap_or_default(),
                        latency,
                    })
            })
        })
        .collect()
}

// Non-numeric tokens are kept; they still count as reported.
fn is_nonzero(latency: &str) -> bool {
    !matches!(latency.parse::<f64>(), Ok(value) if value == 0.0)
}

pub fn write_timing_table(path: &Path, records: &[ClassifiedRecord]) -> Result<(), StatsError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in timing_rows(records) {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| StatsError::io(path, e))
}
