use super::braces::BraceScanError;
use super::literal::LiteralError;
use thiserror::Error;

/// A raw line matches neither recognised log-line shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected at least {expected} '|' separated segments, found {found}")]
    TooFewSegments { expected: usize, found: usize },

    #[error("invalid severity segment: {0:?}")]
    InvalidSeverity(String),

    #[error("invalid JSON line: {0}")]
    InvalidJson(String),

    #[error("JSON line is not an object")]
    NotAnObject,

    #[error("timestamp {0} ms is out of range")]
    InvalidTimestamp(i64),
}

impl From<serde_json::Error> for DecodeError {
    fn from(error: serde_json::Error) -> Self {
        DecodeError::InvalidJson(error.to_string())
    }
}

/// An object literal embedded in free text could not be recovered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedPayloadError {
    #[error("malformed message: {0}")]
    Braces(#[from] BraceScanError),

    #[error("malformed object literal: {0}")]
    Literal(#[from] LiteralError),

    #[error("embedded literal is not a dict")]
    NotADict,
}
