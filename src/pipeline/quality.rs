use serde::{Deserialize, Serialize};
use tracing::info;

/// Per-batch data-quality counters.
///
/// Every input line lands in exactly one of: noise, decode failure, malformed
/// payload, uncorrelated, or a correlated trace. Partition lines that were not
/// raw events at all never reach `input_lines` and are counted on their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub invalid_partition_lines: u64,
    pub input_lines: u64,
    pub noise_lines: u64,
    pub decode_failures: u64,
    pub malformed_payloads: u64,
    pub uncorrelated_events: u64,
    pub correlated_events: u64,
    pub traces: u64,
    pub classification_failures: u64,
    pub unresolved_service: u64,
    pub tenant_extraction_failures: u64,
    pub aggregated_records: u64,
}

impl QualityReport {
    /// Lines that never made it into a trace, noise excluded.
    pub fn dropped_events(&self) -> u64 {
        self.invalid_partition_lines
            + self.decode_failures
            + self.malformed_payloads
            + self.uncorrelated_events
    }

    /// Traces that produced no aggregate contribution.
    pub fn unclassified_records(&self) -> u64 {
        self.classification_failures + self.unresolved_service
    }

    pub fn log_summary(&self) {
        info!(
            invalid_partition_lines = self.invalid_partition_lines,
            input_lines = self.input_lines,
            noise_lines = self.noise_lines,
            dropped_events = self.dropped_events(),
            decode_failures = self.decode_failures,
            malformed_payloads = self.malformed_payloads,
            uncorrelated_events = self.uncorrelated_events,
            traces = self.traces,
            unclassified_records = self.unclassified_records(),
            tenant_extraction_failures = self.tenant_extraction_failures,
            aggregated_records = self.aggregated_records,
            "batch quality"
        );
    }
}
