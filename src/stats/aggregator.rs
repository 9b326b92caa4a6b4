use super::endpoint::Sample;
use super::service::ServiceStats;
use crate::domain::{Operation, Service};
use crate::trace::ClassifiedRecord;
use std::collections::BTreeMap;

/// Latencies at or below this are sentinels, counted as errors.
pub const DEFAULT_LATENCY_EPSILON: f64 = 1e-6;

/// Aggregation context for one batch (or one shard of it).
///
/// Shards folded independently and combined with [`StatsAggregator::merge`] give
/// the same counters as folding the whole batch; latency lists keep shard order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsAggregator {
    epsilon: f64,
    services: BTreeMap<Service, ServiceStats>,
    tenants: BTreeMap<String, ServiceStats>,
    aggregated: u64,
    unresolved: u64,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::with_epsilon(DEFAULT_LATENCY_EPSILON)
    }

    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            epsilon,
            services: Service::ALL
                .into_iter()
                .map(|service| (service, ServiceStats::new(service.as_str())))
                .collect(),
            tenants: BTreeMap::new(),
            aggregated: 0,
            unresolved: 0,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Folds one classified trace. Returns `false` when its service is unresolved.
    pub fn fold(&mut self, record: &ClassifiedRecord) -> bool {
        self.record(
            record.service,
            record.operation,
            record.tenant_id.as_deref(),
            &record.end_to_end_latency,
        )
    }

    /// Folds one observation given by its parts, as read back from a detail table.
    pub fn record(
        &mut self,
        service: Option<Service>,
        operation: Option<Operation>,
        tenant_id: Option<&str>,
        latency: &str,
    ) -> bool {
        let Some(service) = service else {
            self.unresolved += 1;
            return false;
        };

        let sample = Sample::from_latency(latency, self.epsilon);
        self.services
            .entry(service)
            .or_insert_with(|| ServiceStats::new(service.as_str()))
            .record(operation, sample);

        // Tenant rollups are keyed by tenant alone and named after the first service seen
        self.tenants
            .entry(tenant_id.unwrap_or_default().to_string())
            .or_insert_with(|| ServiceStats::new(service.as_str()))
            .record(operation, sample);

        self.aggregated += 1;
        true
    }

    /// Combines another context into this one. Tenants new to `self` keep `other`'s naming.
    pub fn merge(&mut self, other: &StatsAggregator) {
        for (service, stats) in &other.services {
            self.services
                .entry(*service)
                .or_insert_with(|| ServiceStats::new(service.as_str()))
                .merge(stats);
        }
        for (tenant, stats) in &other.tenants {
            match self.tenants.get_mut(tenant) {
                Some(existing) => existing.merge(stats),
                None => {
                    self.tenants.insert(tenant.clone(), stats.clone());
                }
            }
        }
        self.aggregated += other.aggregated;
        self.unresolved += other.unresolved;
    }

    /// Global rollup in catalog order.
    pub fn services(&self) -> impl Iterator<Item = (Service, &ServiceStats)> {
        self.services.iter().map(|(service, stats)| (*service, stats))
    }

    pub fn service(&self, service: Service) -> Option<&ServiceStats> {
        self.services.get(&service)
    }

    /// Per-tenant rollup ordered by tenant id. Records without a tenant sit under `""`.
    pub fn tenants(&self) -> impl Iterator<Item = (&str, &ServiceStats)> {
        self.tenants
            .iter()
            .map(|(tenant, stats)| (tenant.as_str(), stats))
    }

    pub fn tenant(&self, tenant_id: &str) -> Option<&ServiceStats> {
        self.tenants.get(tenant_id)
    }

    /// Records that reached the rollups.
    pub fn aggregated(&self) -> u64 {
        self.aggregated
    }

    /// Records skipped because no known service was resolved.
    pub fn unresolved(&self) -> u64 {
        self.unresolved
    }
}
