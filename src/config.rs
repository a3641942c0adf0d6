use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::llm::openai::OPENAI_API_BASE;
use crate::llm::DEFAULT_MODEL;

pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OpenAI API key missing: set OPENAI_API_KEY or [openai] api_key in {0}")]
    MissingApiKey(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Could not read secrets file: {0}")]
    Secrets(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

// Keep the credential out of logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

/// Read `[openai] api_key` from a TOML secrets file. A missing file is not an
/// error; a present but unparsable one is.
pub fn api_key_from_secrets(path: &Path) -> Result<Option<String>, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(false))
        .build()?;

    match settings.get_string("openai.api_key") {
        Ok(key) if !key.trim().is_empty() => Ok(Some(key.trim().to_string())),
        Ok(_) | Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Resolve the credential: the environment wins, the secrets file is the
/// fallback, and having neither is fatal.
pub fn resolve_api_key(env_key: Option<String>, secrets_path: &Path) -> Result<String, ConfigError> {
    if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
        return Ok(key.trim().to_string());
    }
    api_key_from_secrets(secrets_path)?
        .ok_or_else(|| ConfigError::MissingApiKey(secrets_path.display().to_string()))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let secrets_path = PathBuf::from(
            env::var("SECRETS_FILE").unwrap_or_else(|_| DEFAULT_SECRETS_FILE.to_string()),
        );

        Ok(Self {
            server: ServerConfig {
                port: parse_var("PORT", 3000)?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            },
            llm: LLMConfig {
                api_key: resolve_api_key(env::var("OPENAI_API_KEY").ok(), &secrets_path)?,
                base_url: env::var("OPENAI_BASE_URL").unwrap_or_else(|_| OPENAI_API_BASE.to_string()),
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            },
        })
    }
}
