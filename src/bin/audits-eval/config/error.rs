use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config IO error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid [retry] section: {0}")]
    Retry(String),
    #[error("missing home directory for config paths")]
    MissingHome,
}
