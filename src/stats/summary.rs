use serde::Serialize;

/// Thresholds of the slow-request counters, in the unit of the stored latency.
pub const LATENCY_THRESHOLDS: [f64; 3] = [2.0, 5.0, 10.0];

/// Final reduction of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: u64,
    pub error_count: u64,
    /// 0 when there are no samples.
    pub average_latency: f64,
    /// Samples strictly above each of `LATENCY_THRESHOLDS`.
    pub over_threshold: [usize; 3],
}

impl LatencySummary {
    pub fn new(count: u64, error_count: u64, latencies: &[f64]) -> Self {
        let average_latency = if latencies.is_empty() {
            0.0
        } else {
            latencies.iter().sum::<f64>() / latencies.len() as f64
        };
        let over_threshold =
            LATENCY_THRESHOLDS.map(|limit| latencies.iter().filter(|&&value| value > limit).count());

        Self {
            count,
            error_count,
            average_latency,
            over_threshold,
        }
    }
}
