//! Environment-based configuration, loaded once at startup.
//!
//! The resulting `AppConfig` is immutable and injected by reference into
//! the completion client, trace sink, and orchestrator. Nothing mutates
//! it after process start.

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Concept Mindmap API";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "conceptmap=info,tower_http=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is required")]
    MissingOpenAiKey,

    #[error("LANGSMITH_API_KEY is required when tracing is enabled")]
    MissingLangSmithKey,

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Process-wide read-only configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // OpenAI
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,

    // LangSmith tracing
    pub langsmith_tracing: bool,
    pub langsmith_endpoint: String,
    pub langsmith_api_key: String,
    pub langsmith_project: String,

    // Server
    pub host: String,
    pub port: u16,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Factored out from `from_env` so tests can supply variables without
    /// mutating the process environment.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match get("PORT") {
            None => 8000,
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                var: "PORT",
                value: raw,
            })?,
        };

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            langsmith_tracing: get("LANGSMITH_TRACING")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
            langsmith_endpoint: get("LANGSMITH_ENDPOINT")
                .unwrap_or_else(|| "https://api.smith.langchain.com".to_string()),
            langsmith_api_key: get("LANGSMITH_API_KEY").unwrap_or_default(),
            langsmith_project: get("LANGSMITH_PROJECT")
                .unwrap_or_else(|| "concept-mindmap".to_string()),
            host: get("HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            debug: get("DEBUG")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
        })
    }

    /// Validate required configuration before serving.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openai_api_key.is_empty() {
            return Err(ConfigError::MissingOpenAiKey);
        }
        if self.langsmith_tracing && self.langsmith_api_key.is_empty() {
            return Err(ConfigError::MissingLangSmithKey);
        }
        Ok(())
    }

    /// True when an OpenAI key is configured (reported by `/health`).
    pub fn openai_configured(&self) -> bool {
        !self.openai_api_key.is_empty()
    }
}
