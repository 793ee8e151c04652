use std::env;

use url::Url;

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";
pub const DEFAULT_HISTORY_COUNT: u16 = 50;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_token: String,
    pub api_base: String,
    pub history_count: u16,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn new(slack_token: impl Into<String>) -> Self {
        Self {
            slack_token: slack_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            history_count: DEFAULT_HISTORY_COUNT,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    /// # Errors
    ///
    /// Returns an error if `SLACK_TOKEN` is missing or an optional variable is malformed.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, so callers and tests do not
    /// have to touch the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `SLACK_TOKEN` is missing or an optional variable is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let slack_token = lookup("SLACK_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| "SLACK_TOKEN: environment variable not found".to_string())?;

        let api_base = match lookup("SLAG_API_BASE") {
            Some(raw) => {
                let parsed =
                    Url::parse(&raw).map_err(|e| format!("SLAG_API_BASE: {e}"))?;
                parsed.as_str().trim_end_matches('/').to_string()
            }
            None => DEFAULT_API_BASE.to_string(),
        };

        let history_count = match lookup("SLAG_HISTORY_COUNT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| format!("SLAG_HISTORY_COUNT: {e}"))?,
            None => DEFAULT_HISTORY_COUNT,
        };

        let http_timeout_secs = match lookup("SLAG_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| format!("SLAG_HTTP_TIMEOUT_SECS: {e}"))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            slack_token,
            api_base,
            history_count,
            http_timeout_secs,
        })
    }
}
