use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid history entry: {0}")]
    InvalidHistoryEntry(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
