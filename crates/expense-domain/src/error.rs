use thiserror::Error;

/// Validation failures raised while building domain values from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid record id: {0}")]
    InvalidId(String),
}
