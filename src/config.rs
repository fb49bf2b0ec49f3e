use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CHAT_URL: &str = "http://localhost:3000/chat";
const DEFAULT_PREDICT_URL: &str = "http://localhost:5000/predict";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DATA_DIR: &str = ".cognovoid";

/// Runtime configuration, read once at startup. Endpoint addresses live
/// here instead of being hard-coded at the call sites.
#[derive(Debug, Clone)]
pub struct Config {
    pub chat_url: String,
    pub predict_url: String,
    pub request_timeout: Duration,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timeout_secs = match lookup("COGNOVOID_TIMEOUT_SECS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid COGNOVOID_TIMEOUT_SECS, using default");
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            chat_url: lookup("COGNOVOID_CHAT_URL")
                .unwrap_or_else(|| DEFAULT_CHAT_URL.to_string()),
            predict_url: lookup("COGNOVOID_PREDICT_URL")
                .unwrap_or_else(|| DEFAULT_PREDICT_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            data_dir: lookup("COGNOVOID_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.chat_url, DEFAULT_CHAT_URL);
        assert_eq!(config.predict_url, DEFAULT_PREDICT_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.data_dir, PathBuf::from(".cognovoid"));
    }

    #[test]
    fn environment_overrides_apply() {
        let config = Config::from_lookup(|key| match key {
            "COGNOVOID_CHAT_URL" => Some("http://backend:8080/chat".to_string()),
            "COGNOVOID_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        });
        assert_eq!(config.chat_url, "http://backend:8080/chat");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.predict_url, DEFAULT_PREDICT_URL);
    }

    #[test]
    fn bad_timeout_falls_back_to_default() {
        let config = Config::from_lookup(|key| match key {
            "COGNOVOID_TIMEOUT_SECS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }
}
