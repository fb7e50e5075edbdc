use thiserror::Error;
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("unknown artifact row: {0}")]
    UnknownRow(u32),
    #[error("{0}")]
    ValidationError(String),
    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::SerializationError(e.to_string())
    }
}
