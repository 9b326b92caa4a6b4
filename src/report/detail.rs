use crate::domain::{Operation, Service, Severity, StatsError};
use crate::stats::StatsAggregator;
use crate::trace::ClassifiedRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One row of the per-trace detail table.
///
/// Unresolved labels and a missing tenant are written as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub request_id: String,
    pub tenant_id: String,
    pub service: String,
    pub operation: String,
    pub latency: String,
    /// JSON array of `[timestamp, service_label, severity, function]` per event.
    pub raw_event_list: String,
}

impl DetailRow {
    pub fn from_record(record: &ClassifiedRecord) -> Result<Self, StatsError> {
        let events: Vec<(String, Option<&str>, Severity, Option<&str>)> = record
            .events
            .iter()
            .map(|event| {
                (
                    event.timestamp.to_rfc3339(),
                    event.service_label.as_deref(),
                    event.severity,
                    event.function.as_deref(),
                )
            })
            .collect();

        Ok(Self {
            request_id: record.correlation_id.clone(),
            tenant_id: record.tenant_id.clone().unwrap_or_default(),
            service: record
                .service
                .map(|service| service.as_str().to_string())
                .unwrap_or_default(),
            operation: record
                .operation
                .map(|operation| operation.as_str().to_string())
                .unwrap_or_default(),
            latency: record.end_to_end_latency.clone(),
            raw_event_list: serde_json::to_string(&events)?,
        })
    }

    /// Folds this row as if it were the original record.
    ///
    /// The service and operation columns must match catalog names exactly.
    pub fn fold_into(&self, aggregator: &mut StatsAggregator) -> bool {
        let tenant = (!self.tenant_id.is_empty()).then_some(self.tenant_id.as_str());
        aggregator.record(
            self.service.parse::<Service>().ok(),
            self.operation.parse::<Operation>().ok(),
            tenant,
            &self.latency,
        )
    }
}

pub fn write_detail_table(path: &Path, records: &[ClassifiedRecord]) -> Result<(), StatsError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(DetailRow::from_record(record)?)?;
    }
    writer.flush().map_err(|e| StatsError::io(path, e))?;
    debug!(path = %path.display(), rows = records.len(), "Wrote detail table");
    Ok(())
}

pub fn read_detail_table(path: &Path) -> Result<Vec<DetailRow>, StatsError> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize::<DetailRow>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Rebuilds the rollups from previously exported detail tables.
pub fn reaggregate<P: AsRef<Path>>(paths: &[P], epsilon: f64) -> Result<StatsAggregator, StatsError> {
    let mut aggregator = StatsAggregator::with_epsilon(epsilon);
    for path in paths {
        let rows = read_detail_table(path.as_ref())?;
        debug!(path = %path.as_ref().display(), rows = rows.len(), "Re-aggregating detail table");
        for row in &rows {
            row.fold_into(&mut aggregator);
        }
    }
    Ok(aggregator)
}
