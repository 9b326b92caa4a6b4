//! Ingestion of already-fetched log partitions.
//!
//! Each partition is a newline-delimited JSON export of `RawEvent`s. Partitions
//! are read concurrently, at most `max_workers` at a time, and concatenated into
//! one batch. Downstream stages do not rely on the order across partitions.

use crate::domain::RawEvent;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("failed to read partition {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("max_workers must be greater than zero")]
    NoWorkers,
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub max_workers: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self { max_workers: 10 }
    }
}

/// Events of a whole batch plus what had to be skipped while reading it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedBatch {
    pub events: Vec<RawEvent>,
    pub partitions: usize,
    /// Non-empty lines that were not a valid `RawEvent`.
    pub invalid_lines: u64,
}

#[derive(Debug, Clone, Default)]
struct Partition {
    events: Vec<RawEvent>,
    invalid_lines: u64,
}

#[derive(Debug, Clone)]
pub struct PartitionCollector {
    config: CollectorConfig,
}

impl PartitionCollector {
    pub fn new(config: CollectorConfig) -> Result<Self, CollectorError> {
        if config.max_workers == 0 {
            return Err(CollectorError::NoWorkers);
        }
        Ok(Self { config })
    }

    pub async fn collect(&self, paths: &[PathBuf]) -> Result<CollectedBatch, CollectorError> {
        info!(
            partitions = paths.len(),
            max_workers = self.config.max_workers,
            "Reading log partitions"
        );

        let partitions: Vec<Result<Partition, CollectorError>> =
            futures::stream::iter(paths.iter().map(|path| read_partition(path)))
                .buffered(self.config.max_workers)
                .collect()
                .await;

        let mut batch = CollectedBatch::default();
        for partition in partitions {
            let partition = partition?;
            batch.partitions += 1;
            batch.invalid_lines += partition.invalid_lines;
            batch.events.extend(partition.events);
        }

        if batch.invalid_lines > 0 {
            warn!(invalid_lines = batch.invalid_lines, "Skipped invalid partition lines");
        }
        info!(events = batch.events.len(), "Collected batch");
        Ok(batch)
    }
}

async fn read_partition(path: &Path) -> Result<Partition, CollectorError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CollectorError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let default_source = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut partition = Partition::default();
    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawEvent>(line) {
            Ok(mut event) => {
                if event.source.is_empty() {
                    event.source.clone_from(&default_source);
                }
                partition.events.push(event);
            }
            Err(error) => {
                partition.invalid_lines += 1;
                debug!(path = %path.display(), line = number + 1, %error, "Invalid partition line");
            }
        }
    }

    debug!(path = %path.display(), events = partition.events.len(), "Read partition");
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            PartitionCollector::new(CollectorConfig { max_workers: 0 }),
            Err(CollectorError::NoWorkers)
        ));
    }

    #[tokio::test]
    async fn test_missing_partition_is_an_error() {
        let collector = PartitionCollector::new(CollectorConfig::default()).unwrap();
        let result = collector
            .collect(&[PathBuf::from("/definitely/not/here.ndjson")])
            .await;
        assert!(matches!(result, Err(CollectorError::Read { .. })));
    }
}
