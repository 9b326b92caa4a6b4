// Regex error handling for build-time validated patterns
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RegexError {
    #[error("Regex compilation failed for pattern '{pattern}' (name: {name}): {source}")]
    CompilationFailed {
        pattern: String,
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Regex index out of bounds: {index} >= {max}")]
    IndexOutOfBounds { index: usize, max: usize },
}

impl RegexError {
    /// Runtime fallback strategy for regex failures
    pub fn fallback_strategy(&self) -> FallbackStrategy {
        match self {
            RegexError::CompilationFailed { .. } => FallbackStrategy::UseSimpleParser,
            RegexError::IndexOutOfBounds { .. } => FallbackStrategy::SkipMatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStrategy {
    UseSimpleParser,
    SkipMatch,
}
