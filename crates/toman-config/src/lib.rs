//! toman-config
//!
//! Application configuration model and its on-disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{default_base_dir, ConfigManager, HOME_ENV_VAR};
pub use model::Config;
