use thiserror::Error;

/// Top-level error type for a statistics run.
///
/// Per-line and per-trace failures never reach this type; they are counted in the
/// quality report instead. Only failures that stop a whole run end up here.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StatsError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        StatsError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
