use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub llm_timeout: Duration,
    pub share_base_url: String,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Reads settings from the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let parse = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(key) {
                Some(value) => u64::from_str(&value).map_err(|_| ConfigError::Invalid { key, value }),
                None => Ok(default),
            }
        };

        let max_connections = parse("DATABASE_MAX_CONNECTIONS", 5)?;
        let max_connections = u32::try_from(max_connections)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: max_connections.to_string(),
            })?;

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| "sqlite:community_poll.db".to_string()),
            database_max_connections: max_connections,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8001".to_string()),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4".to_string()),
            llm_timeout: Duration::from_secs(parse("LLM_TIMEOUT_SECS", 30)?),
            share_base_url: get("SHARE_BASE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "sqlite:community_poll.db");
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.bind_addr, "0.0.0.0:8001");
        assert_eq!(config.openai_model, "gpt-4");
        assert_eq!(config.llm_timeout, Duration::from_secs(30));
        assert!(config.openai_api_key.is_none());
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = config_from(&[("OPENAI_API_KEY", "   ")]).unwrap();
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("LLM_TIMEOUT_SECS", "5"),
            ("SHARE_BASE_URL", "https://polls.example.org/"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
        .unwrap();
        assert_eq!(config.llm_timeout, Duration::from_secs(5));
        assert_eq!(config.share_base_url, "https://polls.example.org");
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(matches!(
            config_from(&[("LLM_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::Invalid { key: "LLM_TIMEOUT_SECS", .. })
        ));
        assert!(config_from(&[("DATABASE_MAX_CONNECTIONS", "0")]).is_err());
    }
}
