mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(&config_path).await?;
    let mut config = parse(&config_str)?;
    config.apply_overrides(env::var("GEMINI_API_KEY").ok(), env::var("MODELS_DIR").ok());

    Ok(config)
}

/// Parses and sanity-checks a YAML configuration document.
pub fn parse(config_str: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Environment values win over the file. Empty values are ignored.
    pub fn apply_overrides(&mut self, api_key: Option<String>, models_dir: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            debug!("Using LLM API key from environment");
            self.llm.api_key = key;
        }
        if let Some(dir) = models_dir.filter(|d| !d.trim().is_empty()) {
            debug!("Using model directory from environment: {}", dir);
            self.models.dir = dir;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.models.dir.trim().is_empty() {
            return Err(Error::config("models.dir must not be empty"));
        }
        if self.reference.timeout_secs == 0 {
            return Err(Error::config("reference.timeout_secs must be greater than zero"));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(Error::config("server.max_upload_bytes must be greater than zero"));
        }
        Ok(())
    }
}
