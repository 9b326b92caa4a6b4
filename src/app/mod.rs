pub mod config;
pub mod initialization;
pub mod logging_system;

pub use config::{Config, ConfigError, LogLevel, OutputPaths, RunMode};
pub use initialization::InitializationError;
pub use logging_system::{LoggingSystem, setup_logging_safe};

use crate::collector::PartitionCollector;
use crate::pipeline::{QualityReport, TracePipeline};
use crate::report::{
    reaggregate, write_detail_table, write_quality_report, write_statistics_table,
    write_timing_table,
};
use anyhow::Context;
use tracing::{info, warn};

/// What one run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub mode: RunMode,
    /// Extract mode only.
    pub quality: Option<QualityReport>,
    /// Records aggregated into the statistics table.
    pub aggregated: u64,
    pub output_paths: OutputPaths,
}

pub struct App {
    config: Config,
}

impl App {
    pub fn from_args<I, T>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args_and_env(args).context("Configuration error")?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        let config = &self.config;
        info!("Starting rask-trace-stats v{}", crate::VERSION);
        info!(
            mode = ?config.mode,
            inputs = config.input.len(),
            output_dir = %config.output_dir.display(),
            epsilon = config.latency_epsilon,
            "Configuration loaded"
        );

        std::fs::create_dir_all(&config.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                config.output_dir.display()
            )
        })?;

        let summary = match config.mode {
            RunMode::Extract => self.extract().await?,
            RunMode::Aggregate => self.aggregate()?,
        };

        info!(
            aggregated = summary.aggregated,
            statistics = %summary.output_paths.statistics.display(),
            "Run completed"
        );
        Ok(summary)
    }

    async fn extract(&self) -> anyhow::Result<RunSummary> {
        let config = &self.config;
        let paths = &config.output_paths;

        let collector = PartitionCollector::new(config.collector_config())?;
        let batch = collector
            .collect(&config.input)
            .await
            .context("Failed to collect log partitions")?;

        let pipeline = TracePipeline::new(config.log_format, config.latency_epsilon);
        let mut output = pipeline.run(batch.events);
        output.quality.invalid_partition_lines = batch.invalid_lines;
        output.quality.log_summary();

        write_detail_table(&paths.detail, &output.records)
            .with_context(|| format!("Failed to write {}", paths.detail.display()))?;
        write_timing_table(&paths.timing, &output.records)
            .with_context(|| format!("Failed to write {}", paths.timing.display()))?;
        write_statistics_table(&paths.statistics, &output.stats)
            .with_context(|| format!("Failed to write {}", paths.statistics.display()))?;
        write_quality_report(&paths.quality, &output.quality)
            .with_context(|| format!("Failed to write {}", paths.quality.display()))?;

        Ok(RunSummary {
            mode: RunMode::Extract,
            quality: Some(output.quality),
            aggregated: output.stats.aggregated(),
            output_paths: paths.clone(),
        })
    }

    fn aggregate(&self) -> anyhow::Result<RunSummary> {
        let config = &self.config;
        let paths = &config.output_paths;

        let stats = reaggregate(&config.input, config.latency_epsilon)
            .context("Failed to read detail tables")?;
        if stats.unresolved() > 0 {
            warn!(
                unresolved = stats.unresolved(),
                "Detail rows without a known service were skipped"
            );
        }

        write_statistics_table(&paths.statistics, &stats)
            .with_context(|| format!("Failed to write {}", paths.statistics.display()))?;

        Ok(RunSummary {
            mode: RunMode::Aggregate,
            quality: None,
            aggregated: stats.aggregated(),
            output_paths: paths.clone(),
        })
    }
}

/// Binary entry point: configuration, logging, one run.
pub async fn main() -> anyhow::Result<()> {
    let app = App::from_args(std::env::args_os())?;

    let config = app.config();
    if let Err(e) = setup_logging_safe(config.log_level, config.log_json, &config.log_directives) {
        eprintln!("Warning: continuing without structured logging: {e}");
    }

    app.run().await?;
    Ok(())
}
