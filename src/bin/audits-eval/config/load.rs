use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::paths;
use super::types::FileConfig;

/// Reads the TOML config. A missing file yields the defaults.
pub fn load_config(path_override: Option<PathBuf>) -> Result<FileConfig, ConfigError> {
    let path = paths::config_file(path_override)?;
    let config = read_config(&path)?;
    config
        .retry
        .validate()
        .map_err(|err| ConfigError::Retry(err.to_string()))?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(err) => Err(ConfigError::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.batch.concurrency, 4);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.generation.endpoint.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[retry]
max_attempts = 5

[batch]
concurrency = 16

[generation]
endpoint = "http://gpu:8000/generate"
max_tokens = 4096
"#
        )
        .unwrap();

        let config = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.min_delay_ms, 4_000);
        assert_eq!(config.batch.concurrency, 16);
        assert_eq!(
            config.generation.endpoint.as_deref(),
            Some("http://gpu:8000/generate")
        );
        assert_eq!(config.generation.max_tokens, Some(4096));
    }

    #[test]
    fn zero_backoff_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[retry]\nmin_delay_ms = 0").unwrap();
        let err = load_config(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Retry(_)));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[batch\nconcurrency = ").unwrap();
        let err = load_config(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
