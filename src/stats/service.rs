use super::endpoint::{EndpointStats, Sample};
use super::summary::LatencySummary;
use crate::domain::{Endpoint, Operation};
use std::collections::BTreeMap;

/// Top-level counters for a service (or a tenant) plus one bucket per endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceStats {
    pub name: String,
    overall: EndpointStats,
    endpoints: BTreeMap<Endpoint, EndpointStats>,
}

impl ServiceStats {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            overall: EndpointStats::new(name.clone()),
            endpoints: Endpoint::ALL
                .into_iter()
                .map(|endpoint| (endpoint, EndpointStats::new(endpoint.name())))
                .collect(),
            name,
        }
    }

    /// Top level always counts the sample; an endpoint bucket only when the operation has one.
    pub fn record(&mut self, operation: Option<Operation>, sample: Sample) {
        self.overall.record(sample);
        if let Some(endpoint) = operation.and_then(|operation| operation.endpoint())
            && let Some(bucket) = self.endpoints.get_mut(&endpoint)
        {
            bucket.record(sample);
        }
    }

    pub fn merge(&mut self, other: &ServiceStats) {
        self.overall.merge(&other.overall);
        for (endpoint, bucket) in &other.endpoints {
            self.endpoints
                .entry(*endpoint)
                .or_insert_with(|| EndpointStats::new(endpoint.name()))
                .merge(bucket);
        }
    }

    pub fn overall(&self) -> &EndpointStats {
        &self.overall
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> Option<&EndpointStats> {
        self.endpoints.get(&endpoint)
    }

    /// Buckets in export column order.
    pub fn endpoints(&self) -> impl Iterator<Item = (Endpoint, &EndpointStats)> {
        self.endpoints.iter().map(|(endpoint, stats)| (*endpoint, stats))
    }

    pub fn count(&self) -> u64 {
        self.overall.count()
    }

    pub fn summary(&self) -> LatencySummary {
        self.overall.summary()
    }
}
