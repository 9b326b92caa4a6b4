use crate::domain::{Endpoint, StatsError};
use crate::stats::{EndpointStats, LatencySummary, ServiceStats, StatsAggregator};
use std::path::Path;

const BUCKET_SUFFIXES: [&str; 6] = [
    "Count",
    "Error Count",
    "Average Latency",
    "Requests > 2s",
    "Requests > 5s",
    "Requests > 10s",
];

fn header(leading: &[&str]) -> Vec<String> {
    let mut header: Vec<String> = leading.iter().map(|s| (*s).to_string()).collect();
    header.extend(["Total Count", "Error Count", "Average Latency"].map(String::from));
    for endpoint in Endpoint::ALL {
        header.extend(
            BUCKET_SUFFIXES
                .iter()
                .map(|suffix| format!("{} {suffix}", endpoint.title())),
        );
    }
    header
}

fn bucket_cells(stats: &EndpointStats) -> [String; 6] {
    let LatencySummary {
        count,
        error_count,
        average_latency,
        over_threshold,
    } = stats.summary();
    [
        count.to_string(),
        error_count.to_string(),
        average_latency.to_string(),
        over_threshold[0].to_string(),
        over_threshold[1].to_string(),
        over_threshold[2].to_string(),
    ]
}

fn service_cells(stats: &ServiceStats) -> Vec<String> {
    let overall = stats.summary();
    let mut cells = vec![
        overall.count.to_string(),
        overall.error_count.to_string(),
        overall.average_latency.to_string(),
    ];
    for endpoint in Endpoint::ALL {
        match stats.endpoint(endpoint) {
            Some(bucket) => cells.extend(bucket_cells(bucket)),
            None => cells.extend(bucket_cells(&EndpointStats::new(endpoint.name()))),
        }
    }
    cells
}

/// All rows of the two-section statistics table.
///
/// Section one has a row per service; after two blank rows, section two has a
/// row per tenant with the tenant id and its service in front.
pub fn statistics_rows(aggregator: &StatsAggregator) -> Vec<Vec<String>> {
    let mut rows = vec![header(&["Service"])];
    for (service, stats) in aggregator.services() {
        let mut row = vec![service.as_str().to_string()];
        row.extend(service_cells(stats));
        rows.push(row);
    }

    rows.push(vec![String::new()]);
    rows.push(vec![String::new()]);

    rows.push(header(&["HotelCode", "Service"]));
    for (tenant, stats) in aggregator.tenants() {
        let mut row = vec![tenant.to_string(), stats.name.clone()];
        row.extend(service_cells(stats));
        rows.push(row);
    }
    rows
}

pub fn write_statistics_table(path: &Path, aggregator: &StatsAggregator) -> Result<(), StatsError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)?;
    for row in statistics_rows(aggregator) {
        writer.write_record(&row)?;
    }
    writer.flush().map_err(|e| StatsError::io(path, e))
}
