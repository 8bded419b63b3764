use crate::types::{Message, ModelResponse};

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionTool, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Transport(#[from] OpenAIError),
    #[error("could not build completion request: {0}")]
    Request(String),
}

/// One request/response round-trip to a chat completion endpoint.
///
/// `tools` may be empty, in which case the model is asked for a plain
/// completion and no tool list is sent at all.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn send_message(
        &self,
        conversation: &[Message],
        tools: &[ChatCompletionTool],
    ) -> Result<ModelResponse, GatewayError>;
}

/// Gateway for any OpenAI-compatible endpoint (OpenRouter by default).
pub struct OpenAiGateway {
    inner: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGateway {
    pub fn new(api_key: &str, api_base: &str, model: impl Into<String>) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        // a zero budget makes the first 5xx or 429 final
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        Self {
            inner: Client::with_config(config).with_backoff(no_retry),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ModelGateway for OpenAiGateway {
    async fn send_message(
        &self,
        conversation: &[Message],
        tools: &[ChatCompletionTool],
    ) -> Result<ModelResponse, GatewayError> {
        let messages: Vec<ChatCompletionRequestMessage> =
            conversation.iter().map(ChatCompletionRequestMessage::from).collect();

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(messages).n(1);
        if !tools.is_empty() {
            args.tools(tools.to_vec());
        }
        let request = args
            .build()
            .map_err(|err| GatewayError::Request(err.to_string()))?;

        tracing::debug!(
            model = %self.model,
            messages = conversation.len(),
            tools = tools.len(),
            "sending chat completion"
        );
        let response = self.inner.chat().create(request).await?;
        tracing::debug!(?response, "chat completion received");

        Ok(ModelResponse::from(response))
    }
}
