//! Domain layer for rask-trace-stats.
//!
//! Contains the canonical types shared across all modules:
//! - `RawEvent` / `DecodedEvent` / `ExtractedEvent`: a log line at each pipeline stage
//! - `Severity`: severity written by the logging application
//! - `Service` / `Operation` / `Endpoint`: the fixed classification catalog
//! - `StatsError`: Top-level error type

pub mod catalog;
pub mod error;
pub mod event;
pub mod severity;

pub use catalog::{Endpoint, Operation, Service, UnknownName};
pub use error::StatsError;
pub use event::{DecodedEvent, ExtractedEvent, Payload, RawEvent, SubMessage};
pub use severity::Severity;
