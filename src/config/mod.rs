use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
pub(crate) const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 10_000;
pub(crate) const DEFAULT_NOTICE_TIMEOUT_MS: u32 = 4_000;
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration, read from `window.ENV` when the host page defines it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub request_timeout_ms: u32,
    pub notice_timeout_ms: u32,
    pub log_level: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::from_lookup(read_window_env)
    }

    /// Builds a config from a key lookup. Each setting accepts the
    /// SCREAMING_CASE key first and the snake_case key as a fallback.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |upper: &str, lower: &str| {
            lookup(upper)
                .or_else(|| lookup(lower))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = get("API_URL", "api_url")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout_ms = get("REQUEST_TIMEOUT_MS", "request_timeout_ms")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);

        let notice_timeout_ms = get("NOTICE_TIMEOUT_MS", "notice_timeout_ms")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_NOTICE_TIMEOUT_MS);

        let log_level = get("LOG_LEVEL", "log_level")
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Self {
            api_url,
            request_timeout_ms,
            notice_timeout_ms,
            log_level,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn read_window_env(key: &str) -> Option<String> {
    let window = web_sys::window()?;
    let env = window.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }

    let value = js_sys::Reflect::get(&env, &key.into()).ok()?;
    value
        .as_string()
        .or_else(|| value.as_f64().map(|n| (n as u64).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_when_env_missing() {
        let c = EnvConfig::default();
        assert_eq!(c.api_url, DEFAULT_API_URL);
        assert_eq!(c.request_timeout_ms, 10_000);
        assert_eq!(c.log_level, "info");
    }

    #[test]
    fn test_upper_case_keys_win_over_lower_case() {
        let c = EnvConfig::from_lookup(lookup(&[
            ("API_URL", "https://notes.example.com/api/"),
            ("api_url", "http://ignored"),
        ]));
        assert_eq!(c.api_url, "https://notes.example.com/api");
    }

    #[test]
    fn test_lower_case_fallback_and_numeric_settings() {
        let c = EnvConfig::from_lookup(lookup(&[
            ("api_url", "http://localhost:9000/api"),
            ("REQUEST_TIMEOUT_MS", "2500"),
            ("NOTICE_TIMEOUT_MS", "0"),
            ("LOG_LEVEL", "DEBUG"),
        ]));
        assert_eq!(c.api_url, "http://localhost:9000/api");
        assert_eq!(c.request_timeout_ms, 2500);
        assert_eq!(c.notice_timeout_ms, 0);
        assert_eq!(c.log_level, "debug");
    }

    #[test]
    fn test_invalid_timeout_falls_back_to_default() {
        let c = EnvConfig::from_lookup(lookup(&[("REQUEST_TIMEOUT_MS", "soon")]));
        assert_eq!(c.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        let c = EnvConfig::from_lookup(lookup(&[("REQUEST_TIMEOUT_MS", "0")]));
        assert_eq!(c.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
    }
}
