//! Flat tabular exports of a run.

pub mod detail;
pub mod statistics;
pub mod timing;

pub use detail::{DetailRow, read_detail_table, reaggregate, write_detail_table};
pub use statistics::{statistics_rows, write_statistics_table};
pub use timing::{TimingRow, timing_rows, write_timing_table};

use crate::domain::StatsError;
use crate::pipeline::QualityReport;
use std::path::Path;

pub const DETAIL_FILE: &str = "full_log.csv";
pub const STATISTICS_FILE: &str = "stats.csv";
pub const TIMING_FILE: &str = "timing_log.csv";
pub const QUALITY_FILE: &str = "quality.json";

pub fn write_quality_report(path: &Path, report: &QualityReport) -> Result<(), StatsError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|e| StatsError::io(path, e))
}
