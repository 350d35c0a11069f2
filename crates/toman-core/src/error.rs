use thiserror::Error;
use uuid::Uuid;

use crate::validator::ValidationError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Frequent transaction not found: {0}")]
    TemplateNotFound(Uuid),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
