use serde::Deserialize;

use crate::domain::classification::DEFAULT_ALLOWED_EXTENSIONS;
use crate::domain::extraction::{DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_TEXT_LENGTH};
use crate::domain::rate_limit::RateLimitConfig;
use crate::infrastructure::extraction::PipelineConfig;
use crate::infrastructure::http::DEFAULT_DOWNLOAD_TIMEOUT_SECS;
use crate::infrastructure::observability::MetricsConfig;

/// Keys parsed as comma separated lists when set through the environment
const LIST_KEYS: &[&str] = &[
    "extraction.allowed_extensions",
    "security.api_keys",
    "security.allowed_origins",
];

/// Worst-case request bytes per file byte (`binaryData` arrays)
const BINARY_DATA_EXPANSION: u64 = 5;

/// Room for JSON keys, the file name and multipart headers
const BODY_FRAMING_BYTES: u64 = 64 * 1024;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
}

/// Deployment environment; production hides internal error detail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum accepted file size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Maximum number of characters returned for text files
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl ExtractionConfig {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_file_size: self.max_file_size,
            max_text_length: self.max_text_length,
            allowed_extensions: self.allowed_extensions.clone(),
        }
    }

    /// Request body limit, sized for the most verbose transport
    ///
    /// A `binaryData` array spends up to five bytes per file byte (`255, `), so the
    /// body limit only bounds buffering and the size guard enforces `max_file_size`.
    pub fn body_limit(&self) -> usize {
        let encoded = self.max_file_size.saturating_mul(BINARY_DATA_EXPANSION);
        usize::try_from(encoded.saturating_add(BODY_FRAMING_BYTES)).unwrap_or(usize::MAX)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Reject requests without an API key
    #[serde(default)]
    pub require_api_key: bool,
    /// Accepted keys; when empty any non-empty key passes
    #[serde(default)]
    pub api_keys: Vec<String>,
    /// Allowed CORS origins: exact, `*` or `https://*.example.com`
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            max_text_length: default_max_text_length(),
            allowed_extensions: default_allowed_extensions(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_max_text_length() -> usize {
    DEFAULT_MAX_TEXT_LENGTH
}

fn default_allowed_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let environment = LIST_KEYS.iter().fold(
            config::Environment::with_prefix("APP")
                .separator("__")
                .list_separator(",")
                .try_parsing(true),
            |env, key| env.with_list_parse_key(key),
        );

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment)
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.extraction.max_file_size, 50 * 1024 * 1024);
        assert_eq!(config.extraction.max_text_length, 50_000);
        assert_eq!(config.extraction.download_timeout_secs, 30);
        assert_eq!(config.extraction.allowed_extensions.len(), 6);
        assert!(!config.security.require_api_key);
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.metrics.path, "/metrics");
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "environment": "production" },
            "extraction": { "max_file_size": 1024 },
            "security": { "require_api_key": true, "api_keys": ["k1"] }
        }))
        .unwrap();

        assert!(config.server.environment.is_production());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.extraction.max_file_size, 1024);
        assert_eq!(config.extraction.max_text_length, 50_000);
        assert_eq!(config.security.api_keys, vec!["k1".to_string()]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_body_limit_covers_binary_data_arrays() {
        let extraction = ExtractionConfig {
            max_file_size: 3 * 1024,
            ..ExtractionConfig::default()
        };

        assert_eq!(extraction.body_limit(), 15 * 1024 + 64 * 1024);

        let largest_array = format!("{{\"binaryData\":[{}]}}", vec!["255"; 3 * 1024].join(", "));
        assert!(largest_array.len() < extraction.body_limit());
    }

    #[test]
    fn test_pipeline_config() {
        let pipeline = ExtractionConfig::default().pipeline_config();

        assert_eq!(pipeline.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(pipeline.allowed_extensions[0], "pdf");
    }
}
