use super::config::LogLevel;
use super::initialization::{FallbackStrategy, InitializationError, LogDirective};
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default level plus per-target overrides, turned into one `EnvFilter`.
#[derive(Debug)]
pub struct LoggingSystem {
    directives: Vec<LogDirective>,
    fallback_level: LogLevel,
}

impl LoggingSystem {
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
            fallback_level: LogLevel::Info,
        }
    }

    /// Adds a `target=level` directive. Recoverable parse errors are reported on
    /// stderr and handled by the error's fallback strategy.
    pub fn add_directive(&mut self, directive_str: &str) -> Result<(), InitializationError> {
        match LogDirective::parse(directive_str) {
            Ok(directive) => {
                self.directives.push(directive);
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                if e.fallback_strategy() == FallbackStrategy::UseDefaultLevel {
                    eprintln!("Warning: {e}, using default level");
                    self.add_default_directive(directive_str);
                } else {
                    eprintln!("Warning: {e}, skipping directive");
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn add_default_directive(&mut self, directive_str: &str) {
        let target = directive_str
            .split_once('=')
            .map_or(directive_str, |(target, _)| target)
            .trim();
        self.directives
            .push(LogDirective::new(target, self.fallback_level));
    }

    /// Installs the global subscriber writing to stderr, compact or JSON.
    pub fn initialize_tracing(
        &self,
        default_level: LogLevel,
        json: bool,
    ) -> Result<(), InitializationError> {
        let filter_string = self.build_filter_string(default_level);

        let env_filter =
            EnvFilter::try_new(&filter_string).map_err(|e| InitializationError::LoggingInitFailed {
                details: format!("Failed to create EnvFilter with '{filter_string}'"),
                source: Box::new(e),
            })?;

        let registry = tracing_subscriber::registry().with(env_filter);
        let installed = if json {
            tracing::subscriber::set_global_default(
                registry.with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_current_span(false)
                        .with_writer(std::io::stderr),
                ),
            )
        } else {
            tracing::subscriber::set_global_default(
                registry.with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_ansi(false)
                        .with_writer(std::io::stderr)
                        .compact(),
                ),
            )
        };

        installed.map_err(|e| InitializationError::LoggingInitFailed {
            details: "Failed to set global tracing subscriber".to_string(),
            source: Box::new(e),
        })
    }

    pub fn build_filter_string(&self, default_level: LogLevel) -> String {
        let mut filter_parts = Vec::with_capacity(self.directives.len() + 1);
        filter_parts.push(default_level.as_str().to_string());
        filter_parts.extend(self.directives.iter().map(LogDirective::to_filter_string));
        filter_parts.join(",")
    }

    pub fn directive_count(&self) -> usize {
        self.directives.len()
    }
}

impl Default for LoggingSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs logging once per process. Later calls report the first outcome.
pub fn setup_logging_safe(
    level: LogLevel,
    json: bool,
    directives: &[String],
) -> Result<(), InitializationError> {
    static INIT_SUCCESS: OnceLock<bool> = OnceLock::new();

    let initialized = *INIT_SUCCESS.get_or_init(|| {
        let mut logging_system = LoggingSystem::new();
        let result = directives
            .iter()
            .try_for_each(|directive| logging_system.add_directive(directive))
            .and_then(|()| logging_system.initialize_tracing(level, json));

        if let Err(e) = &result {
            eprintln!("Warning: {e}");
        }
        result.is_ok()
    });

    if initialized {
        Ok(())
    } else {
        Err(InitializationError::LoggingInitFailed {
            details: "Logging system initialization failed".to_string(),
            source: Box::new(std::io::Error::other("Logging initialization error")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_system_creation() {
        let logging_system = LoggingSystem::new();
        assert_eq!(logging_system.directive_count(), 0);
        assert_eq!(logging_system.build_filter_string(LogLevel::Info), "info");
    }

    #[test]
    fn test_add_valid_directive() {
        let mut logging_system = LoggingSystem::new();

        assert!(logging_system.add_directive("rask_trace_stats=warn").is_ok());
        assert!(logging_system.add_directive("csv=error").is_ok());
        assert_eq!(logging_system.directive_count(), 2);
    }

    #[test]
    fn test_fallback_strategies() {
        let mut logging_system = LoggingSystem::new();

        let test_cases = [
            ("rask_trace_stats=warn", 1), // Valid
            ("invalid_format", 1),        // Skip directive
            ("target=invalid_level", 2),  // Use default level
            ("=empty", 2),                // Skip directive
            ("", 2),                      // Skip directive
        ];

        for (directive, expected_count) in test_cases {
            assert!(logging_system.add_directive(directive).is_ok(), "{directive}");
            assert_eq!(logging_system.directive_count(), expected_count, "{directive}");
        }
        assert!(
            logging_system
                .build_filter_string(LogLevel::Debug)
                .ends_with("target=info")
        );
    }

    #[test]
    fn test_build_filter_string() {
        let mut logging_system = LoggingSystem::new();
        logging_system
            .add_directive("rask_trace_stats::trace=warn")
            .unwrap();
        logging_system.add_directive("tokio=error").unwrap();

        assert_eq!(
            logging_system.build_filter_string(LogLevel::Debug),
            "debug,rask_trace_stats::trace=warn,tokio=error"
        );
    }

    #[test]
    fn test_setup_logging_safe() {
        // Another test binary component may already own the global subscriber
        match setup_logging_safe(LogLevel::Info, false, &["rask_trace_stats=debug".to_string()]) {
            Ok(()) | Err(InitializationError::LoggingInitFailed { .. }) => {}
            Err(e) => panic!("Unexpected error type: {e:?}"),
        }
    }
}
