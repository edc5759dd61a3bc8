//! OpenAI-compatible chat-completions gateway

use super::protocol::{ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use atlas_application::{GatewayError, LlmGateway, ToolChoice};
use atlas_domain::{ModelReply, Turn};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

/// Where and as whom to query the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Base URL; `/chat/completions` is appended
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

/// [`LlmGateway`] over any OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiGateway {
    client: Client,
    url: String,
    model: String,
    api_key: String,
}

impl OpenAiGateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to create HTTP client: {}", e)))?;

        let url = format!("{}/chat/completions", settings.endpoint.trim_end_matches('/'));
        info!("OpenAiGateway initialized for {} at {}", settings.model, url);

        Ok(Self {
            client,
            url,
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    fn status_error(status: StatusCode, body: &str) -> GatewayError {
        let message = serde_json::from_str::<ApiErrorResponse>(body)
            .map(|r| r.error.describe())
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                GatewayError::AuthenticationFailed(message)
            }
            _ => GatewayError::RequestFailed {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(
        &self,
        turns: &[Turn],
        tools: &[serde_json::Value],
        tool_choice: ToolChoice,
    ) -> Result<ModelReply, GatewayError> {
        let request = ChatRequest {
            model: &self.model,
            messages: turns.iter().map(ChatMessage::from).collect(),
            tools,
            tool_choice: (!tools.is_empty()).then(|| tool_choice.as_str()),
        };
        debug!(
            messages = request.messages.len(),
            tools = tools.len(),
            tool_choice = tool_choice.as_str(),
            "Querying model"
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::ConnectionError(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(GatewayError::EmptyResponse)?;

        let reply = choice.into_reply();
        debug!(
            tool_calls = reply.tool_calls.len(),
            finish_reason = ?reply.finish_reason,
            "Model replied"
        );
        Ok(reply)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
