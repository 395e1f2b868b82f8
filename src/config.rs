use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

pub const DEFAULT_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistral-medium-2505";
pub const DEFAULT_PORT: u16 = 5000;

/// Process-wide settings, read once at startup and handed to the relay.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    /// Retries after the first attempt, only ever spent on HTTP 429.
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Upstream request timeout; `None` keeps the client default.
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("MISTRAL_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("MISTRAL_API_KEY must be set"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        let timeout = match lookup("MISTRAL_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("MISTRAL_TIMEOUT_SECS is not a number: {:?}", raw))?,
            )),
            None => None,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            api_key,
            api_url: lookup("MISTRAL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: lookup("MISTRAL_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_retries: 2,
            retry_delay: Duration::from_secs(2),
            timeout,
        })
    }
}

#[cfg(test)]
impl Config {
    /// Points at a mock upstream and shortens the retry delay.
    pub fn for_upstream(api_url: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            api_key: "test-key".to_string(),
            api_url: api_url.into(),
            model: DEFAULT_MODEL.to_string(),
            max_retries: 2,
            retry_delay: Duration::from_millis(20),
            timeout: Some(Duration::from_secs(5)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("MISTRAL_API_KEY", "abc")])).unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, "mistral-medium-2505");
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_delay, Duration::from_secs(2));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn missing_or_blank_api_key_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("MISTRAL_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("MISTRAL_API_KEY", "abc"),
            ("PORT", "8088"),
            ("HOST", "127.0.0.1"),
            ("MISTRAL_API_URL", "http://localhost:9000/v1/chat/completions"),
            ("MISTRAL_MODEL", "mistral-small-latest"),
            ("MISTRAL_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8088);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.api_url, "http://localhost:9000/v1/chat/completions");
        assert_eq!(config.model, "mistral-small-latest");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn bad_port_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[
            ("MISTRAL_API_KEY", "abc"),
            ("PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }
}
