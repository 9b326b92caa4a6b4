use super::summary::LatencySummary;

/// Outcome of one folded record: a latency sample or an error, never both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Latency(f64),
    Error,
}

impl Sample {
    /// Values not strictly above `epsilon`, and anything that is not a finite number,
    /// are sentinels for "no real measurement".
    pub fn from_latency(raw: &str, epsilon: f64) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > epsilon => Sample::Latency(value),
            _ => Sample::Error,
        }
    }
}

/// Counters for one bucket. `count == latencies.len() + error_count` always holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EndpointStats {
    pub name: String,
    count: u64,
    error_count: u64,
    latencies: Vec<f64>,
}

impl EndpointStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, sample: Sample) {
        self.count += 1;
        match sample {
            Sample::Latency(value) => self.latencies.push(value),
            Sample::Error => self.error_count += 1,
        }
    }

    /// Adds `other`'s counters; latencies are appended after ours.
    pub fn merge(&mut self, other: &EndpointStats) {
        self.count += other.count;
        self.error_count += other.error_count;
        self.latencies.extend_from_slice(&other.latencies);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn latencies(&self) -> &[f64] {
        &self.latencies
    }

    pub fn summary(&self) -> LatencySummary {
        LatencySummary::new(self.count, self.error_count, &self.latencies)
    }
}
