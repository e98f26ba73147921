use invite_config::ConfigError;
use invite_core::CoreError;
use invite_domain::CatalogError;
use thiserror::Error;

/// Top-level error for the studio library and CLI.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid template `{path}`: {message}")]
    Template { path: String, message: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
