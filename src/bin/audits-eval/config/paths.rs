use std::path::PathBuf;

use super::error::ConfigError;

pub fn config_file(config_override: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match config_override {
        Some(path) => Ok(path),
        None => Ok(default_config_dir()?.join("config.toml")),
    }
}

fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::MissingHome)?;
    Ok(home.join(".config").join("audits-eval"))
}
