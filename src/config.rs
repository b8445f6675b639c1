use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::HealthError;

/// Environment variables checked for the API key, in priority order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Hosted model identifier (e.g., "gemini-1.5-flash")
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the generation API (overridable for proxies and tests)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Address the web UI listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// API key from the secrets store, used when no environment variable is set
    pub api_key: Option<String>,
    /// Temperature for generation (0.0-1.0); left to the API default when unset
    pub temperature: Option<f32>,
    /// Maximum tokens to generate; left to the API default when unset
    pub max_tokens: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            bind_addr: default_bind_addr(),
            api_key: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:8501".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with HEALTH__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Resolve the API key: the first of GEMINI_API_KEY, GOOGLE_API_KEY and
    /// the secrets store `api_key` that is present and non-empty wins.
    pub fn resolve_api_key(&self) -> Result<String, HealthError> {
        resolve_api_key_with(|name| std::env::var(name).ok(), self.api_key.as_deref())
    }
}

/// Load configuration from file and environment variables
///
/// Environment variable format: HEALTH__MODEL, HEALTH__BIND_ADDR
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing), doubles as the secrets store
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("HEALTH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

fn resolve_api_key_with<F>(lookup: F, stored: Option<&str>) -> Result<String, HealthError>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|&name| lookup(name))
        .chain(stored.map(str::to_string))
        .find(|key| !key.trim().is_empty())
        .ok_or(HealthError::MissingApiKey)
}
