use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool as advertised by the connected tool server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// A tool invocation as emitted by the model. `raw_arguments` is whatever
/// text the model produced and is not guaranteed to be valid JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallRequest {
    pub tool_name: String,
    pub raw_arguments: String,
}

impl From<&ToolDescriptor> for ChatCompletionTool {
    fn from(value: &ToolDescriptor) -> Self {
        Self {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: value.name.clone(),
                description: value.description.clone(),
                parameters: Some(value.input_schema.clone()),
                strict: None,
            },
        }
    }
}

pub fn openai_chatcompletion_toolset(tools: &[ToolDescriptor]) -> Vec<ChatCompletionTool> {
    tools.iter().map(ChatCompletionTool::from).collect()
}
