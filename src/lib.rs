#![deny(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_lossless,            // Infallible casts are clear enough with `as`
    clippy::cast_possible_truncation, // Safe within realistic value bounds (counts, sizes)
    clippy::cast_possible_wrap,       // Safe in non-negative contexts
    clippy::cast_precision_loss,      // Acceptable for latency averages
    clippy::cast_sign_loss,           // Safe where values are known non-negative
    clippy::missing_errors_doc,       // Internal API
    clippy::missing_panics_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. CollectorError in collector module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Internal API
)]

pub mod app;
pub mod collector;
pub mod domain;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod trace;

// Re-export main types for easy access
pub use app::{App, Config, RunSummary};
pub use domain::{RawEvent, StatsError};
pub use pipeline::{PipelineOutput, QualityReport, TracePipeline};
pub use stats::StatsAggregator;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
