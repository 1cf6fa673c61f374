//! OpenAI chat-completions adapter for the [`LlmGateway`] port.

use async_trait::async_trait;
use colloquy_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use colloquy_domain::{ChatMessage, Model};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Gateway settings, usually built from `[providers.openai]`.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            request_timeout: Duration::from_secs(120),
        }
    }
}

pub struct OpenAiGateway {
    /// Pre-computed `"Bearer <key>"` header value.
    cached_auth_header: Option<String>,
    endpoint: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiGateway {
    pub fn new(settings: OpenAiSettings) -> Self {
        let base = settings.base_url.trim_end_matches('/');
        Self {
            cached_auth_header: settings.api_key.map(|k| format!("Bearer {k}")),
            endpoint: format!("{base}/v1/chat/completions"),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            client: Client::builder()
                .timeout(settings.request_timeout)
                .connect_timeout(Duration::from_secs(10))
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request<'a>(&self, request: &'a GenerationRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(request.history.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: &request.instructions,
        });
        messages.extend(request.history.iter().map(|m: &ChatMessage| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));

        // Reasoning models reject `temperature` and take `max_completion_tokens`.
        let reasoning = request.model.is_reasoning();
        ChatRequest {
            model: request.model.as_str(),
            messages,
            temperature: (!reasoning).then_some(self.temperature),
            max_tokens: (!reasoning).then_some(self.max_tokens),
            max_completion_tokens: reasoning.then_some(self.max_tokens),
        }
    }

    async fn error_from_response(model: &Model, response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                GatewayError::AuthenticationError(message)
            }
            StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(format!("{model}: {message}")),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
            _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), message)),
        }
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let auth_header = self.cached_auth_header.as_ref().ok_or_else(|| {
            GatewayError::AuthenticationError(
                "OpenAI API key not set. Set OPENAI_API_KEY or edit the config file.".to_string(),
            )
        })?;

        let body = self.build_request(request);
        debug!(
            "POST {} model={} messages={}",
            self.endpoint,
            body.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", auth_header)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(&request.model, response).await);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("invalid response body: {e}")))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GatewayError::EmptyResponse)
    }
}
