use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::time::Duration;

use crate::classify::{ExhaustedPolicy, RetryPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Gemini,
    Ollama,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub model: String,
    pub endpoint: Option<String>,
    pub api_key: String,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub on_exhausted: ExhaustedPolicy,
    pub sanitize_group_names: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Gemini,
            model: "gemini-1.5-flash".to_string(),
            endpoint: None,
            api_key: String::new(),
            max_attempts: 3,
            retry_delay_ms: 0,
            on_exhausted: ExhaustedPolicy::EmptyResult,
            sanitize_group_names: true,
        }
    }
}

impl AppConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            delay: Duration::from_millis(self.retry_delay_ms),
            on_exhausted: self.on_exhausted,
        }
    }

    /// Copy safe to print: the api key is masked.
    pub fn redacted(&self) -> AppConfig {
        let mut copy = self.clone();
        if !copy.api_key.is_empty() {
            copy.api_key = "****".to_string();
        }
        copy
    }
}

/// Load `Config.toml` (optional) from the working directory, then overlay
/// `GROUPER_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("GROUPER").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_source_behavior() {
        let config = AppConfig::default();
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::ZERO);
        assert_eq!(policy.on_exhausted, ExhaustedPolicy::EmptyResult);
        assert!(config.sanitize_group_names);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let config = AppConfig {
            max_attempts: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.retry_policy().max_attempts, 1);
    }

    #[test]
    fn test_partial_source_fills_defaults() {
        let config: AppConfig = Config::builder()
            .set_override("backend", "ollama")
            .unwrap()
            .set_override("on_exhausted", "fail")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.backend, BackendKind::Ollama);
        assert_eq!(config.on_exhausted, ExhaustedPolicy::Fail);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let config = AppConfig {
            api_key: "secret".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.redacted().api_key, "****");
        assert_eq!(AppConfig::default().redacted().api_key, "");
    }
}
