use crate::error::ConfigError;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "OPENAI_MODEL";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const LOG_ENV: &str = "BIG_COMPARATOR_LOG";

pub const DEFAULT_MODEL: &str = "gpt-5";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// Model name, falling back to [`DEFAULT_MODEL`]. Needed before the key check
/// so the banner can show it.
pub fn model_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> String {
    non_blank(lookup(MODEL_ENV)).unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

impl Config {
    /// Reads configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = non_blank(lookup(API_KEY_ENV)).ok_or(ConfigError::MissingApiKey)?;
        let base_url = non_blank(lookup(BASE_URL_ENV))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            api_key,
            model: model_from_lookup(&lookup),
            base_url,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
