//! Process configuration read once at start-up.
//!
//! Values come from environment variables; [`ServerConfig::from_lookup`]
//! accepts any key lookup so tests can supply a map instead of mutating the
//! process environment. Empty values are treated as unset.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A variable is set but its value cannot be used.
    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Wire protocol spoken by the upstream generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamProvider {
    /// Credentialed gateway wrapping the chat request in `{username, password, api, request}`.
    Internal,
    /// Plain OpenAI-style `/chat/completions` with bearer auth.
    OpenAiCompatible,
}

impl FromStr for UpstreamProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "internal" => Ok(UpstreamProvider::Internal),
            "openai_compatible" | "openai" => Ok(UpstreamProvider::OpenAiCompatible),
            other => Err(format!(
                "unsupported provider '{}': use internal or openai_compatible",
                other
            )),
        }
    }
}

/// Connection and credential settings for the upstream service.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub provider: UpstreamProvider,
    /// Full endpoint URL (internal) or API base URL (OpenAI-compatible).
    pub endpoint_url: String,
    pub username: String,
    pub password: String,
    /// Service identifier forwarded as `api`; `null` on the wire when unset.
    pub api_id: Option<i64>,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

// Credentials stay out of logs.
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("provider", &self.provider)
            .field("endpoint_url", &self.endpoint_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_id", &self.api_id)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub max_output_tokens: u32,
    pub temperature: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        SamplingParams {
            max_output_tokens: 1000,
            temperature: 0.3,
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub upstream: UpstreamConfig,
    pub sampling: SamplingParams,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match get("DSAVIZ_UPSTREAM_PROVIDER") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: "DSAVIZ_UPSTREAM_PROVIDER",
                value: raw.clone(),
                reason,
            })?,
            None => UpstreamProvider::Internal,
        };

        let endpoint_url =
            get("INTERNAL_API_URL").ok_or(ConfigError::Missing("INTERNAL_API_URL"))?;

        let defaults = SamplingParams::default();
        let temperature: f64 = parse_var(&get, "DSAVIZ_TEMPERATURE")?.unwrap_or(defaults.temperature);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                var: "DSAVIZ_TEMPERATURE",
                value: temperature.to_string(),
                reason: "expected a value between 0.0 and 2.0".to_string(),
            });
        }
        let max_output_tokens: u32 =
            parse_var(&get, "DSAVIZ_MAX_TOKENS")?.unwrap_or(defaults.max_output_tokens);
        if max_output_tokens == 0 {
            return Err(ConfigError::Invalid {
                var: "DSAVIZ_MAX_TOKENS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let timeout_secs: u64 = parse_var(&get, "DSAVIZ_UPSTREAM_TIMEOUT_SECS")?.unwrap_or(60);

        Ok(ServerConfig {
            port: parse_var(&get, "DSAVIZ_PORT")?.unwrap_or(3000),
            upstream: UpstreamConfig {
                provider,
                endpoint_url,
                username: get("INTERNAL_API_USERNAME").unwrap_or_default(),
                password: get("INTERNAL_API_PASSWORD").unwrap_or_default(),
                api_id: parse_var(&get, "INTERNAL_API_ID")?,
                api_key: get("DSAVIZ_API_KEY").unwrap_or_default(),
                model: get("DSAVIZ_MODEL").unwrap_or_else(|| "gpt-4".to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            sampling: SamplingParams {
                max_output_tokens,
                temperature,
            },
        })
    }
}

fn parse_var<T, G>(get: &G, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|err: T::Err| ConfigError::Invalid {
                var,
                value: raw.clone(),
                reason: err.to_string(),
            }),
        None => Ok(None),
    }
}
