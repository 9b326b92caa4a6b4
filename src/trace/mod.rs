//! Per-request trace building and classification.

pub mod classifier;
pub mod correlator;
pub mod error;

pub use classifier::{
    Classification, ClassifiedRecord, DEFAULT_LATENCY, TENANT_MARKER, TraceClassifier,
    extract_tenant, measured_latency,
};
pub use correlator::{Trace, TraceCorrelator};
pub use error::ClassificationError;
