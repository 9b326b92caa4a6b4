use super::{Config, ConfigError};

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "At least one input file is required".to_string(),
            ));
        }

        if self.max_workers == 0 {
            return Err(ConfigError::InvalidConfig(
                "Max workers must be greater than 0".to_string(),
            ));
        }

        if !self.latency_epsilon.is_finite() || self.latency_epsilon < 0.0 {
            return Err(ConfigError::InvalidConfig(format!(
                "Latency epsilon must be a finite, non-negative number, got {}",
                self.latency_epsilon
            )));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Output directory must not be empty".to_string(),
            ));
        }

        if let Some(missing) = self.input.iter().find(|path| path.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidConfig(format!(
                "Input path must not be empty: {:?}",
                missing
            )));
        }

        Ok(())
    }
}
