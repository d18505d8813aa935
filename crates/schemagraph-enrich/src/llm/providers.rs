//! Concrete providers: an OpenAI-compatible HTTP client and a scripted mock.

use super::*;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use std::collections::VecDeque;
use std::time::Duration;

// ============================================================================
// Configuration
// ============================================================================

pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4-5";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// API key variables, most specific first.
const API_KEY_VARS: [&str; 3] = ["SCHEMAGRAPH_API_KEY", "OPENROUTER_API_KEY", "OPENAI_API_KEY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable source; `from_env` with a seam for tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|name| non_empty(name))
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Some(model) = non_empty("SCHEMAGRAPH_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = non_empty("SCHEMAGRAPH_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(raw) = non_empty("SCHEMAGRAPH_TIMEOUT_SECS") {
            config.timeout_secs = match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "SCHEMAGRAPH_TIMEOUT_SECS must be a positive integer, got `{raw}`"
                    )))
                }
            };
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no API key configured; set SCHEMAGRAPH_API_KEY, OPENROUTER_API_KEY or OPENAI_API_KEY")]
    MissingApiKey,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// OpenAI-compatible client
// ============================================================================

/// Works against OpenRouter, OpenAI and any server speaking the same protocol.
pub struct OpenAiCompatibleClient {
    client: Client,
    config: LlmConfig,
}

impl OpenAiCompatibleClient {
    pub fn new(config: LlmConfig) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| EnrichError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|m| serde_json::json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        body
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, EnrichError> {
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(&request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichError::Timeout(self.config.timeout_secs)
                } else {
                    EnrichError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(EnrichError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EnrichError::InvalidResponse(e.to_string()))?;

        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| EnrichError::InvalidResponse("no message content in response".to_string()))?
            .to_string();

        Ok(CompletionResponse {
            content,
            model: data["model"]
                .as_str()
                .unwrap_or(&self.config.model)
                .to_string(),
            usage: Usage {
                prompt_tokens: data["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
                completion_tokens: data["usage"]["completion_tokens"].as_u64().unwrap_or(0),
            },
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// Mock provider
// ============================================================================

/// A scripted reply for [`MockProvider`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    Text(String),
    Status(u16),
    /// Never answers; exercises the caller's timeout.
    Hang,
}

/// Replays scripted replies in order and records every prompt it receives.
/// The last reply repeats once the script runs out.
#[derive(Debug, Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(text: impl Into<String>) -> Self {
        Self::new([MockReply::Text(text.into())])
    }

    pub fn failing(status: u16) -> Self {
        Self::new([MockReply::Status(status)])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    fn next_reply(&self) -> Option<MockReply> {
        let mut replies = self.replies.lock();
        if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, EnrichError> {
        self.prompts.lock().push(request.prompt_text());
        match self.next_reply() {
            Some(MockReply::Text(content)) => Ok(CompletionResponse {
                content,
                model: "mock".to_string(),
                usage: Usage::default(),
            }),
            Some(MockReply::Status(429)) => Err(EnrichError::RateLimited { retry_after_secs: 60 }),
            Some(MockReply::Status(status)) => Err(EnrichError::Api {
                status,
                body: "mock failure".to_string(),
            }),
            Some(MockReply::Hang) => {
                std::future::pending::<()>().await;
                Err(EnrichError::InvalidResponse("unreachable".to_string()))
            }
            None => Err(EnrichError::InvalidResponse("mock has no replies".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
