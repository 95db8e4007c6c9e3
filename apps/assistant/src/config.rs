use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_WEATHER_LANGUAGE: &str = "zh";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
/// A missing API key is not an error: weather lookups still work without it.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub weather_language: String,
    pub http_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let base_url = first_env(&["OPENAI_BASE_URL", "LLM_BASE_URL"])
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Config {
            api_key: first_env(&["OPENAI_API_KEY", "LLM_API_KEY"]),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: first_env(&["OPENAI_MODEL"]).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            weather_language: first_env(&["WEATHER_LANGUAGE"])
                .unwrap_or_else(|| DEFAULT_WEATHER_LANGUAGE.to_string()),
            http_timeout_secs: match first_env(&["HTTP_TIMEOUT_SECS"]) {
                Some(raw) => raw
                    .parse::<u64>()
                    .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
                None => DEFAULT_HTTP_TIMEOUT_SECS,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Returns the first variable in `keys` that is set to a non-blank value.
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
