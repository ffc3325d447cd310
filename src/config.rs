//! Configuration management for Studydeck Server

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ai: AiConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory where uploaded files are staged before extraction
    pub upload_dir: PathBuf,
    /// Request body size limit in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub request_timeout_secs: u64,
}

/// Tunable pipeline bounds. These were fixed constants historically;
/// they are configurable so deployments can adjust them without a rebuild.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Minimum word count required before calling the AI provider
    pub min_generation_words: usize,
    /// Character cap on document text embedded in the mind-map prompt
    pub mindmap_input_chars: usize,
    /// Length of the text preview returned by the upload endpoint
    pub preview_chars: usize,
}

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is missing from environment variables")]
    MissingApiKey,
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("SERVER_PORT", 5000)?,
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| env::temp_dir()),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            },
            ai: AiConfig {
                api_key,
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
                endpoint: env::var("GEMINI_ENDPOINT")
                    .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
                request_timeout_secs: parse_var("AI_TIMEOUT_SECS", 60)?,
            },
            limits: LimitsConfig {
                min_generation_words: parse_var("MIN_GENERATION_WORDS", 20)?,
                mindmap_input_chars: parse_var("MINDMAP_INPUT_CHARS", 4000)?,
                preview_chars: parse_var("PREVIEW_CHARS", 500)?,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config suitable for tests: no real credentials, temp upload dir.
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                upload_dir,
                max_upload_bytes: 10 * 1024 * 1024,
            },
            ai: AiConfig {
                api_key: "test-key".to_string(),
                model: "test-model".to_string(),
                endpoint: "http://localhost:0".to_string(),
                request_timeout_secs: 5,
            },
            limits: LimitsConfig {
                min_generation_words: 20,
                mindmap_input_chars: 4000,
                preview_chars: 500,
            },
        }
    }
}
