//! Batch driver: raw lines in, classified records and rollups out.
//!
//! Single-threaded and in-memory. Per-line and per-trace failures are counted
//! in the [`QualityReport`] and never abort the batch.

pub mod quality;

pub use quality::QualityReport;

use crate::domain::RawEvent;
use crate::parser::{LogFormat, MessageDecoder, PayloadExtractor};
use crate::stats::{DEFAULT_LATENCY_EPSILON, StatsAggregator};
use crate::trace::{ClassifiedRecord, Trace, TraceClassifier, TraceCorrelator};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// One per classified trace, in order of first appearance, unresolved ones included.
    pub records: Vec<ClassifiedRecord>,
    pub stats: StatsAggregator,
    pub quality: QualityReport,
}

#[derive(Debug, Clone, Copy)]
pub struct TracePipeline {
    decoder: MessageDecoder,
    extractor: PayloadExtractor,
    classifier: TraceClassifier,
    epsilon: f64,
}

impl Default for TracePipeline {
    fn default() -> Self {
        Self::new(LogFormat::Auto, DEFAULT_LATENCY_EPSILON)
    }
}

impl TracePipeline {
    pub fn new(format: LogFormat, epsilon: f64) -> Self {
        Self {
            decoder: MessageDecoder::new(format),
            extractor: PayloadExtractor::new(),
            classifier: TraceClassifier::new(),
            epsilon,
        }
    }

    pub fn run<I>(&self, events: I) -> PipelineOutput
    where
        I: IntoIterator<Item = RawEvent>,
    {
        let mut quality = QualityReport::default();
        let traces = self.correlate(events, &mut quality);
        let records = self.classify(traces, &mut quality);

        let mut stats = StatsAggregator::with_epsilon(self.epsilon);
        for record in &records {
            if stats.fold(record) {
                quality.aggregated_records += 1;
            } else {
                quality.unresolved_service += 1;
            }
        }

        PipelineOutput {
            records,
            stats,
            quality,
        }
    }

    /// Decode, extract and group raw lines. Failed lines are counted and skipped.
    pub fn correlate<I>(&self, events: I, quality: &mut QualityReport) -> Vec<Trace>
    where
        I: IntoIterator<Item = RawEvent>,
    {
        let mut correlator = TraceCorrelator::new();

        for raw in events {
            quality.input_lines += 1;

            let decoded = match self.decoder.decode(&raw) {
                Ok(Some(decoded)) => decoded,
                Ok(None) => {
                    quality.noise_lines += 1;
                    continue;
                }
                Err(error) => {
                    quality.decode_failures += 1;
                    debug!(%error, source = %raw.source, timestamp = raw.timestamp, "dropping undecodable line");
                    continue;
                }
            };

            let extracted = match self.extractor.extract(decoded) {
                Ok(extracted) => extracted,
                Err(error) => {
                    quality.malformed_payloads += 1;
                    debug!(%error, source = %raw.source, timestamp = raw.timestamp, "dropping malformed payload");
                    continue;
                }
            };

            if correlator.push(extracted) {
                quality.correlated_events += 1;
            } else {
                quality.uncorrelated_events += 1;
            }
        }

        quality.traces = correlator.len() as u64;
        correlator.into_traces()
    }

    /// Classify every trace; traces that cannot be classified are counted and dropped.
    pub fn classify(&self, traces: Vec<Trace>, quality: &mut QualityReport) -> Vec<ClassifiedRecord> {
        let mut records = Vec::with_capacity(traces.len());
        for trace in traces {
            match self.classifier.classify(trace) {
                Ok(classification) => {
                    quality.tenant_extraction_failures += classification.tenant_failures as u64;
                    records.push(classification.record);
                }
                Err(error) => {
                    quality.classification_failures += 1;
                    debug!(%error, "dropping unclassifiable trace");
                }
            }
        }
        records
    }
}
