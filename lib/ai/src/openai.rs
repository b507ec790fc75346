//! OpenAI-compatible chat completions backend.

use crate::backend::{LlmBackend, LlmBackendConfig, LlmMessage, LlmRequest, LlmResponse, TokenUsage};
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};

/// Calls `{base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: Client,
    config: LlmBackendConfig,
}

impl OpenAiBackend {
    /// Creates a backend with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn new(config: LlmBackendConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                reason: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<LlmMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

fn chat_body<'a>(model: &'a str, request: &LlmRequest) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: request.messages(),
    }
}

fn parse_completion(body: &str) -> Result<LlmResponse, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ResponseParseFailed {
            reason: e.to_string(),
        })?;

    let Some(choice) = parsed.choices.into_iter().next() else {
        return Err(LlmError::ResponseParseFailed {
            reason: "response contained no choices".to_string(),
        });
    };

    let usage = parsed
        .usage
        .map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    Ok(LlmResponse {
        content: choice.message.content.unwrap_or_default(),
        usage,
        model: parsed.model,
    })
}

fn retry_after(headers: &header::HeaderMap) -> Option<u64> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    #[tracing::instrument(skip_all, fields(model = %self.config.model))]
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut http = self
            .client
            .post(self.endpoint())
            .json(&chat_body(&self.config.model, request));
        if let Some(key) = &self.config.api_key {
            http = http.bearer_auth(key);
        }

        let response = http.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::RequestFailed {
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited {
                retry_after_secs: retry_after(response.headers()),
            });
        }

        let body = response.text().await.map_err(|e| LlmError::RequestFailed {
            reason: e.to_string(),
        })?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Completion request rejected");
            return Err(LlmError::ProviderUnavailable {
                status: status.as_u16(),
                reason: body,
            });
        }

        let completion = parse_completion(&body)?;
        tracing::debug!(tokens = completion.usage.total(), "Completion received");
        Ok(completion)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
