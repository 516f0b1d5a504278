//! Configuration loader and validator for the admin console.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::model::DEFAULT_PAGE_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub api: Api,
    #[serde(default)]
    pub console: Console,
}

/// Admin backend connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Console {
    pub page_size: u32,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("api.base_url must be non-empty"));
    }
    if Url::parse(&cfg.api.base_url).is_err() {
        return Err(ConfigError::Invalid("api.base_url must be an absolute URL"));
    }
    if cfg.api.token.trim().is_empty() {
        return Err(ConfigError::Invalid("api.token must be non-empty"));
    }
    if cfg.console.page_size == 0 {
        return Err(ConfigError::Invalid("console.page_size must be > 0"));
    }
    Ok(())
}

/// Sample configuration, also printed by `notice-console --example-config`.
pub fn example() -> &'static str {
    r#"api:
  base_url: "https://shop.example.com/api/"
  token: "YOUR_ADMIN_TOKEN"

console:
  page_size: 10
"#
}
