use super::ToolCallRequest;
use async_openai::types::CreateChatCompletionResponse;

/// What the model answered with. A response carrying tool calls is treated
/// as a tool-call response even if it also has text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelResponse {
    Text(String),
    ToolCalls(Vec<ToolCallRequest>),
    /// Neither text nor tool calls (no choices, or an empty message).
    Empty,
}

impl ModelResponse {
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<CreateChatCompletionResponse> for ModelResponse {
    fn from(value: CreateChatCompletionResponse) -> Self {
        let Some(choice) = value.choices.into_iter().next() else {
            return Self::Empty;
        };
        let message = choice.message;

        let calls: Vec<ToolCallRequest> = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCallRequest {
                tool_name: call.function.name,
                raw_arguments: call.function.arguments,
            })
            .collect();

        if !calls.is_empty() {
            Self::ToolCalls(calls)
        } else if let Some(content) = message.content {
            Self::Text(content)
        } else {
            Self::Empty
        }
    }
}
