use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity recorded by the application that emitted a log line.
///
/// This is distinct from `app::LogLevel`, which configures this tool's own tracing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Exception,
    Critical,
    #[default]
    Undefined,
}

impl Severity {
    /// Strict lookup used by the pipe-delimited format, where an unknown label is a decode failure.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Severity::Debug),
            "INFO" => Some(Severity::Info),
            "WARNING" | "WARN" => Some(Severity::Warning),
            "ERROR" => Some(Severity::Error),
            "EXCEPTION" => Some(Severity::Exception),
            "CRITICAL" => Some(Severity::Critical),
            "UNDEFINED" => Some(Severity::Undefined),
            _ => None,
        }
    }

    /// Lenient lookup used by the JSON format: absent or unrecognized levels are `Undefined`.
    pub fn from_level_field(level: Option<&str>) -> Self {
        level.and_then(Self::from_label).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Exception => "EXCEPTION",
            Severity::Critical => "CRITICAL",
            Severity::Undefined => "UNDEFINED",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(Severity::from_label("DEBUG"), Some(Severity::Debug));
        assert_eq!(Severity::from_label(" error "), Some(Severity::Error));
        assert_eq!(Severity::from_label("warn"), Some(Severity::Warning));
        assert_eq!(Severity::from_label("TRACE"), None);
    }

    #[test]
    fn test_from_level_field_defaults_to_undefined() {
        assert_eq!(Severity::from_level_field(None), Severity::Undefined);
        assert_eq!(Severity::from_level_field(Some("verbose")), Severity::Undefined);
        assert_eq!(Severity::from_level_field(Some("INFO")), Severity::Info);
    }
}
