use std::sync::Arc;
use std::time::Duration;

use super::client::{ChatCompletion, CompletionError};
use super::fallback;
use super::prompts::{counsellor_prompt, evaluation_user_message, EVALUATION_SYSTEM_PROMPT};
use super::types::{
    AiReply, ChatMessage, ChatRole, CompletionRequest, CompletionSettings, ExpertEvaluationInput,
    StudentContext, CHAT_SETTINGS, EVALUATION_SETTINGS, PROBE_SETTINGS,
};
use crate::config::AiConfig;

/// Counsellor chat and expert evaluation on top of a chat-completion client.
///
/// Every failure of the underlying call is turned into deterministic fallback
/// text; callers always get an [`AiReply`].
pub struct AiAdvisor<C> {
    client: Arc<C>,
    model: String,
    timeout: Duration,
}

impl<C> AiAdvisor<C>
where
    C: ChatCompletion + 'static,
{
    pub fn new(client: Arc<C>, config: &AiConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn chat(
        &self,
        conversation: &[ChatMessage],
        context: Option<&StudentContext>,
    ) -> AiReply {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(ChatMessage::system(counsellor_prompt(context)));
        messages.extend(
            conversation
                .iter()
                .filter(|message| message.role != ChatRole::System)
                .cloned(),
        );

        match self.request(messages, CHAT_SETTINGS).await {
            Ok(text) => AiReply::live(text),
            Err(error) => {
                tracing::warn!(error = %error, "AI chat failed, using fallback reply");
                let latest = conversation
                    .iter()
                    .rev()
                    .find(|message| message.role == ChatRole::User)
                    .map(|message| message.content.as_str());
                let text = fallback::chat_reply(latest, context, &mut rand::thread_rng());
                AiReply::fallback(text, error.reason())
            }
        }
    }

    pub async fn expert_evaluation(&self, input: &ExpertEvaluationInput) -> AiReply {
        let messages = vec![
            ChatMessage::system(EVALUATION_SYSTEM_PROMPT),
            ChatMessage::user(evaluation_user_message(input)),
        ];

        match self.request(messages, EVALUATION_SETTINGS).await {
            Ok(text) => AiReply::live(text),
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    student = %input.student_name,
                    "AI expert evaluation failed, using templated report"
                );
                AiReply::fallback(fallback::expert_evaluation(input), error.reason())
            }
        }
    }

    /// Whether the endpoint answers a minimal request.
    pub async fn check_connection(&self) -> bool {
        match self
            .request(vec![ChatMessage::user("Hello")], PROBE_SETTINGS)
            .await
        {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(error = %error, "AI connection check failed");
                false
            }
        }
    }

    async fn request(
        &self,
        messages: Vec<ChatMessage>,
        settings: CompletionSettings,
    ) -> Result<String, CompletionError> {
        let request = CompletionRequest::new(self.model.clone(), messages, settings);
        match tokio::time::timeout(self.timeout, self.client.complete(&request)).await {
            Ok(result) => result,
            Err(_) => Err(CompletionError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
