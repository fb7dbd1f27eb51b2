//! Configuration loading.
//!
//! Loaded from a TOML/YAML/JSON file (selected by extension) merged with
//! `SPEECHGEN_`-prefixed environment variables. The API key supports
//! `env:VAR_NAME` indirection so config files never need to carry secrets.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use serde::Deserialize;

use crate::language::Language;

const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Main configuration for the generator.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// API key, or `env:VAR_NAME` to read it from the environment.
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// When false the HTTP client bypasses any system proxy.
    #[serde(default)]
    pub proxy: bool,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the file named by `SPEECHGEN_CONFIG_PATH`
    /// (default `speechgen.toml`), merged with `SPEECHGEN_*` environment
    /// variables. A missing file is fine as long as the environment
    /// provides the API key.
    pub fn load() -> eyre::Result<Self> {
        let config_file = std::env::var("SPEECHGEN_CONFIG_PATH")
            .unwrap_or_else(|_| "speechgen.toml".to_string());
        let config_path = PathBuf::from(config_file);

        let figment = match config_path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Figment::new().merge(Yaml::file(config_path)),
            Some("json") => Figment::new().merge(Json::file(config_path)),
            _ => Figment::new().merge(Toml::file(config_path)),
        };

        let config: Config = figment.merge(Env::prefixed("SPEECHGEN_")).extract()?;
        Ok(config)
    }
}

/// Resolve `env:VAR_NAME` indirection in a config value.
///
/// `"env:GEMINI_API_KEY"` looks up the GEMINI_API_KEY environment variable;
/// anything else is returned as-is (trimmed).
pub fn get_env_or_value(value: &str) -> String {
    if let Some(env_var) = value.strip_prefix("env:") {
        match std::env::var(env_var) {
            Ok(resolved) => resolved.trim().to_string(),
            Err(_) => {
                tracing::warn!("environment variable {env_var} not found");
                String::new()
            }
        }
    } else {
        value.trim().to_string()
    }
}
