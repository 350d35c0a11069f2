use thiserror::Error;
use toman_config::ConfigError;
use toman_core::CoreError;

/// Error type surfaced by the application facade.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
