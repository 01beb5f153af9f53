use serde::Deserialize;

use audits_affaires_eval::ResilienceConfig;

const DEFAULT_LOG_ROTATE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_ROTATE_KEEP: usize = 5;
const DEFAULT_BATCH_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub logging: LoggingConfig,
    pub retry: ResilienceConfig,
    pub batch: BatchConfig,
    pub generation: GenerationFileConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub path: Option<String>,
    pub rotate_size: u64,
    pub rotate_keep: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
            rotate_size: DEFAULT_LOG_ROTATE_SIZE,
            rotate_keep: DEFAULT_LOG_ROTATE_KEEP,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

/// Candidate model settings. Environment variables win over these.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerationFileConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    /// `chat` (default) or `prompt`
    pub mode: Option<String>,
    pub max_tokens: Option<u32>,
}
