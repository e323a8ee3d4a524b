use std::fmt;
use std::time::Duration;

use summarizer_logging::summarizer_info;
use url::Url;

use crate::fetch::FetchSettings;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const API_KEY_PREFIX: &str = "sk-proj";
pub const HOSTED_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const LOCAL_BASE_URL_VAR: &str = "OLLAMA_HOST";

pub const HOSTED_MODEL: &str = "gpt-4o-mini";
pub const LOCAL_MODEL: &str = "llama3.2";
pub const DEFAULT_HOSTED_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("API key not found")]
    MissingApiKey,
    #[error("API key found, but it does not start with sk-proj")]
    InvalidApiKeyPrefix,
    #[error("{var} is not a valid URL: {message}")]
    InvalidUrl { var: &'static str, message: String },
}

/// Hosted API key that passed validation.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Checks presence and provider prefix of a raw key value.
pub fn validate_api_key(raw: Option<&str>) -> Result<ApiKey, ConfigError> {
    let key = raw.map(str::trim).unwrap_or_default();
    if key.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    if !key.starts_with(API_KEY_PREFIX) {
        return Err(ConfigError::InvalidApiKeyPrefix);
    }
    summarizer_info!("API key validated successfully");
    Ok(ApiKey(key.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoint {
    pub base_url: String,
    pub model: String,
}

impl BackendEndpoint {
    /// Joins `path` onto the base URL without doubling slashes.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api_key: ApiKey,
    pub hosted: BackendEndpoint,
    pub local: BackendEndpoint,
    pub fetch: FetchSettings,
    pub model_timeout: Duration,
}

impl EngineConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = validate_api_key(lookup(API_KEY_VAR).as_deref())?;
        let hosted_base = base_url(&lookup, HOSTED_BASE_URL_VAR, DEFAULT_HOSTED_BASE_URL)?;
        let local_base = base_url(&lookup, LOCAL_BASE_URL_VAR, DEFAULT_LOCAL_BASE_URL)?;

        Ok(Self {
            api_key,
            hosted: BackendEndpoint {
                base_url: hosted_base,
                model: HOSTED_MODEL.to_string(),
            },
            local: BackendEndpoint {
                base_url: local_base,
                model: LOCAL_MODEL.to_string(),
            },
            fetch: FetchSettings::default(),
            model_timeout: Duration::from_secs(180),
        })
    }
}

fn base_url<F>(lookup: &F, var: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|err| ConfigError::InvalidUrl {
        var,
        message: err.to_string(),
    })?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_key_is_rejected() {
        assert_eq!(validate_api_key(None), Err(ConfigError::MissingApiKey));
        assert_eq!(validate_api_key(Some("  ")), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn wrong_prefix_is_rejected() {
        let err = validate_api_key(Some("sk-abc123")).unwrap_err();
        assert_eq!(err, ConfigError::InvalidApiKeyPrefix);
        assert_eq!(
            err.to_string(),
            "API key found, but it does not start with sk-proj"
        );
    }

    #[test]
    fn debug_output_hides_key() {
        let key = validate_api_key(Some("sk-proj-secret")).unwrap();
        assert_eq!(key.expose(), "sk-proj-secret");
        assert!(!format!("{key:?}").contains("secret"));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = EngineConfig::from_lookup(lookup(&[(API_KEY_VAR, "sk-proj-x")])).unwrap();
        assert_eq!(config.hosted.base_url, DEFAULT_HOSTED_BASE_URL);
        assert_eq!(config.hosted.model, HOSTED_MODEL);
        assert_eq!(config.local.base_url, DEFAULT_LOCAL_BASE_URL);
        assert_eq!(config.local.model, LOCAL_MODEL);
    }

    #[test]
    fn base_urls_can_be_overridden() {
        let config = EngineConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "sk-proj-x"),
            (HOSTED_BASE_URL_VAR, "http://127.0.0.1:9000/v1/"),
            (LOCAL_BASE_URL_VAR, "http://gpu-box:11434"),
        ]))
        .unwrap();
        assert_eq!(
            config.hosted.url("chat/completions"),
            "http://127.0.0.1:9000/v1/chat/completions"
        );
        assert_eq!(config.local.url("/api/chat"), "http://gpu-box:11434/api/chat");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = EngineConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "sk-proj-x"),
            (LOCAL_BASE_URL_VAR, "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                var: LOCAL_BASE_URL_VAR,
                ..
            }
        ));
    }
}
