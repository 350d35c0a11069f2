use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use toman_core::storage::write_atomic;

use crate::{Config, ConfigError};

/// Environment variable overriding the application base directory.
pub const HOME_ENV_VAR: &str = "TOMAN_LEDGER_HOME";
const APP_DIR_NAME: &str = "toman-ledger";

/// `$TOMAN_LEDGER_HOME`, else the platform data directory, else the working directory.
pub fn default_base_dir() -> PathBuf {
    if let Some(home) = env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Handles persistence for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        fs::create_dir_all(&config_dir)?;
        Ok(Self::new(config_dir.join("config.json")))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the config file; a missing file yields [`Config::default`].
    pub fn load(&self) -> Result<Config, ConfigError> {
        match fs::read_to_string(&self.config_path) {
            Ok(data) => {
                serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let mut json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        json.push('\n');
        write_atomic(&self.config_path, &json)?;
        Ok(())
    }
}
