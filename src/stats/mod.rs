//! Two-level latency/error rollups: per service and per tenant.

pub mod aggregator;
pub mod endpoint;
pub mod service;
pub mod summary;

pub use aggregator::{DEFAULT_LATENCY_EPSILON, StatsAggregator};
pub use endpoint::{EndpointStats, Sample};
pub use service::ServiceStats;
pub use summary::{LATENCY_THRESHOLDS, LatencySummary};
