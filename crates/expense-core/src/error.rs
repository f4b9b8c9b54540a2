use expense_domain::{DomainError, RecordId};
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures surfaced by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid record id: {0}")]
    InvalidId(String),
    #[error("Expense not found: {0}")]
    NotFound(RecordId),
    #[error("Persistence error: {0}")]
    Storage(String),
}

impl From<DomainError> for LedgerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidAmount(message) => LedgerError::InvalidAmount(message),
            DomainError::UnknownCategory(label) => LedgerError::UnknownCategory(label),
            DomainError::InvalidDate(message) => LedgerError::InvalidDate(message),
            DomainError::InvalidId(message) => LedgerError::InvalidId(message),
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
