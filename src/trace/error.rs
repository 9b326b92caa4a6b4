use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("trace {correlation_id} has no events")]
    EmptyTrace { correlation_id: String },
}
