use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("Store inventory is not sufficient, items in inventory: {available}")]
    InsufficientStock { available: u64 },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
