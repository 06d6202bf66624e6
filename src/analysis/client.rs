//! Chat-completion provider client.
//!
//! The provider is a black box behind `CompletionClient`: prompt in,
//! completion text + token usage out. No retries here — a single provider
//! failure surfaces immediately to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Completion provider unreachable at {0}")]
    Connection(String),

    #[error("Completion request timed out after {0}s")]
    Timeout(u64),

    #[error("Completion provider returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// One completion call: system instruction, user prompt, and sampling
/// parameters resolved from configuration.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub model: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Completion text plus the provider's token accounting.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub total_tokens: u32,
}

/// Completion provider abstraction (allows mocking).
pub trait CompletionClient: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError>;
}

/// OpenAI chat-completions client over blocking HTTP.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    /// Default request timeout (seconds).
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }
}

/// Request body for POST /v1/chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from POST /v1/chat/completions
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("response contained no completion".into())
            })?;

        let total_tokens = parsed.usage.map(|u| u.total_tokens).unwrap_or(0);

        Ok(Completion { text, total_tokens })
    }
}

/// Mock completion client for testing — returns a canned completion or a
/// configured failure.
pub struct MockCompletionClient {
    response: Result<Completion, String>,
}

impl MockCompletionClient {
    pub fn new(text: &str) -> Self {
        Self {
            response: Ok(Completion {
                text: text.to_string(),
                total_tokens: 42,
            }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
        }
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, _request: &CompletionRequest) -> Result<Completion, ProviderError> {
        match &self.response {
            Ok(completion) => Ok(completion.clone()),
            Err(message) => Err(ProviderError::HttpClient(message.clone())),
        }
    }
}
