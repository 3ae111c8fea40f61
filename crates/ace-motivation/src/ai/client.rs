use async_trait::async_trait;
use reqwest::Client;

use super::types::{CompletionRequest, CompletionResponse};
use crate::config::AiConfig;

/// Outbound chat-completion call.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Returns the content of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("no AI API key configured")]
    NotConfigured,
    #[error("AI request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("AI transport error: {0}")]
    Transport(String),
    #[error("AI endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI response could not be parsed: {0}")]
    Malformed(String),
    #[error("AI response contained no content")]
    EmptyContent,
}

impl CompletionError {
    /// Short machine-readable tag reported alongside fallback text.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Timeout { .. } => "timeout",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "http_status",
            Self::Malformed(_) => "malformed_response",
            Self::EmptyContent => "empty_response",
        }
    }
}

/// `reqwest` implementation posting OpenAI-style completion requests.
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl HttpCompletionClient {
    pub fn new(config: &AiConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CompletionError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl ChatCompletion for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::NotConfigured)?;

        tracing::debug!(
            url = %self.endpoint,
            model = %request.model,
            max_tokens = request.max_tokens,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| CompletionError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(CompletionError::EmptyContent)
    }
}

impl HttpCompletionClient {
    fn transport_error(&self, error: reqwest::Error) -> CompletionError {
        if error.is_timeout() {
            CompletionError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            CompletionError::Transport(error.to_string())
        }
    }
}
