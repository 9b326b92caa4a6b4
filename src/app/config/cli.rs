use super::groups::OutputPaths;
use super::serde_helpers::{load_env_list, load_env_path, load_env_path_opt, load_env_var};
use super::{ConfigError, LogLevel, RunMode};
use crate::collector::CollectorConfig;
use crate::parser::LogFormat;
use crate::stats::DEFAULT_LATENCY_EPSILON;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Whole configuration as TOML, used instead of the individual variables.
pub const CONFIG_ENV: &str = "TRACE_STATS_CONFIG";

const DEFAULT_OUTPUT_DIR: &str = "./log_stats";
const DEFAULT_MAX_WORKERS: usize = 10;

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Run mode
    #[arg(long, env = "TRACE_STATS_MODE", default_value = "extract")]
    pub mode: RunMode,

    /// Input files: partition exports (extract) or detail tables (aggregate)
    #[arg(long, short = 'i', env = "TRACE_STATS_INPUT", value_delimiter = ',')]
    pub input: Vec<PathBuf>,

    /// Directory for the exported tables
    #[arg(long, env = "TRACE_STATS_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Shape of the raw log lines
    #[arg(long, env = "TRACE_STATS_LOG_FORMAT", default_value = "auto")]
    pub log_format: LogFormat,

    /// Latencies at or below this value count as errors
    #[arg(long, env = "TRACE_STATS_LATENCY_EPSILON", default_value_t = DEFAULT_LATENCY_EPSILON)]
    pub latency_epsilon: f64,

    /// Partitions read concurrently
    #[arg(long, env = "TRACE_STATS_MAX_WORKERS", default_value_t = DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,

    /// Log level
    #[arg(long, env = "TRACE_STATS_LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Extra `target=level` log directives
    #[arg(long = "log-directive", env = "TRACE_STATS_LOG_DIRECTIVES", value_delimiter = ',')]
    pub log_directives: Vec<String>,

    /// Emit logs as JSON
    #[arg(long, env = "TRACE_STATS_LOG_JSON")]
    pub log_json: bool,

    /// Configuration file path (optional)
    #[arg(long, env = "TRACE_STATS_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Derived fields (not CLI arguments)
    #[serde(skip)]
    #[arg(skip)]
    pub output_paths: OutputPaths,
}

impl Default for Config {
    fn default() -> Self {
        let output_dir = PathBuf::from(DEFAULT_OUTPUT_DIR);
        let output_paths = OutputPaths::under(&output_dir);
        Self {
            mode: RunMode::Extract,
            input: Vec::new(),
            output_dir,
            log_format: LogFormat::Auto,
            latency_epsilon: DEFAULT_LATENCY_EPSILON,
            max_workers: DEFAULT_MAX_WORKERS,
            log_level: LogLevel::Info,
            log_directives: Vec::new(),
            log_json: false,
            config_file: None,
            output_paths,
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(whole) = std::env::var(CONFIG_ENV) {
            return Self::from_toml(&whole);
        }

        let mut config = Config::default();

        if let Ok(mode) = std::env::var("TRACE_STATS_MODE") {
            config.mode = match mode.trim().to_lowercase().as_str() {
                "extract" => RunMode::Extract,
                "aggregate" => RunMode::Aggregate,
                _ => {
                    return Err(ConfigError::EnvError(format!(
                        "Invalid TRACE_STATS_MODE: {mode}. Valid values: extract, aggregate"
                    )));
                }
            };
        }
        load_env_list("TRACE_STATS_INPUT", &mut config.input);
        load_env_path("TRACE_STATS_OUTPUT_DIR", &mut config.output_dir);

        if let Ok(format) = std::env::var("TRACE_STATS_LOG_FORMAT") {
            config.log_format = match format.trim().to_lowercase().as_str() {
                "auto" => LogFormat::Auto,
                "json" => LogFormat::Json,
                "pipe" => LogFormat::Pipe,
                _ => {
                    return Err(ConfigError::EnvError(format!(
                        "Invalid TRACE_STATS_LOG_FORMAT: {format}. Valid values: auto, json, pipe"
                    )));
                }
            };
        }

        load_env_var("TRACE_STATS_LATENCY_EPSILON", &mut config.latency_epsilon)?;
        load_env_var("TRACE_STATS_MAX_WORKERS", &mut config.max_workers)?;
        load_env_var("TRACE_STATS_LOG_LEVEL", &mut config.log_level)?;
        load_env_list("TRACE_STATS_LOG_DIRECTIVES", &mut config.log_directives);
        load_env_var("TRACE_STATS_LOG_JSON", &mut config.log_json)?;
        load_env_path_opt("TRACE_STATS_CONFIG_FILE", &mut config.config_file);

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    /// CLI arguments (with their env fallbacks) layered over a base configuration.
    ///
    /// The base is `--config-file` if given, else `TRACE_STATS_CONFIG`, else the
    /// defaults. A CLI value wins whenever it differs from the built-in default.
    pub fn from_args_and_env<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);

        let base = if let Some(path) = &config.config_file {
            Some(Self::read_toml_file(path)?)
        } else if let Ok(whole) = std::env::var(CONFIG_ENV) {
            Some(toml::from_str::<Config>(&whole)?)
        } else {
            None
        };

        if let Some(base) = base {
            config.fill_defaults_from(base);
        }

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::read_toml_file(path.as_ref())?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    fn read_toml_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn fill_defaults_from(&mut self, base: Config) {
        let default = Config::default();

        if self.mode == default.mode {
            self.mode = base.mode;
        }
        if self.input.is_empty() {
            self.input = base.input;
        }
        if self.output_dir == default.output_dir {
            self.output_dir = base.output_dir;
        }
        if self.log_format == default.log_format {
            self.log_format = base.log_format;
        }
        if self.latency_epsilon == default.latency_epsilon {
            self.latency_epsilon = base.latency_epsilon;
        }
        if self.max_workers == default.max_workers {
            self.max_workers = base.max_workers;
        }
        if self.log_level == default.log_level {
            self.log_level = base.log_level;
        }
        if self.log_directives.is_empty() {
            self.log_directives = base.log_directives;
        }
        self.log_json |= base.log_json;
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        self.output_paths = OutputPaths::under(&self.output_dir);
        Ok(())
    }

    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            max_workers: self.max_workers,
        }
    }
}
