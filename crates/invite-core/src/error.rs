use std::io;

use invite_domain::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
