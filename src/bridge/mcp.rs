use super::{BridgeError, ToolBridge};
use crate::recovery::Arguments;
use crate::types::{Message, Role, ToolDescriptor};

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParams, CallToolResult, ClientInfo, Content};
use rmcp::service::{RoleClient, RunningService, ServiceError, ServiceExt};
use rmcp::transport::TokioChildProcess;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::process::Command;

type ClientService = RunningService<RoleClient, ClientInfo>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Option<Vec<PromptArgument>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
}

/// Client side of an MCP server running as a child process, talking
/// JSON-RPC over its stdin/stdout.
pub struct McpBridge {
    service: Option<ClientService>,
    tools: Vec<ToolDescriptor>,
    prompts: Vec<PromptDescriptor>,
}

impl McpBridge {
    /// Spawns `command`, runs the initialize handshake and fetches the
    /// tool and prompt catalogs.
    pub async fn connect(mut command: Command) -> Result<Self, BridgeError> {
        // Ctrl-C goes to the client only, which then closes the server itself
        #[cfg(unix)]
        command.process_group(0);
        let transport = TokioChildProcess::new(command).map_err(BridgeError::Spawn)?;
        let service = ClientInfo::default()
            .serve(transport)
            .await
            .map_err(|err| BridgeError::Transport(format!("initialize: {err}")))?;

        let mut bridge = Self {
            service: Some(service),
            tools: Vec::new(),
            prompts: Vec::new(),
        };
        bridge.reload_catalog().await?;
        Ok(bridge)
    }

    pub fn prompts(&self) -> &[PromptDescriptor] {
        &self.prompts
    }

    pub fn is_closed(&self) -> bool {
        self.service.is_none()
    }

    /// Replaces the tool and prompt catalogs wholesale.
    pub async fn reload_catalog(&mut self) -> Result<(), BridgeError> {
        let service = self.service()?;

        let tools = service
            .list_all_tools()
            .await
            .map_err(|err| map_service_error("list_tools", err))?;

        // prompts are optional; servers without them answer with an error
        let prompts = match service.list_all_prompts().await {
            Ok(prompts) => prompts
                .into_iter()
                .map(|prompt| serde_json::to_value(prompt).and_then(serde_json::from_value))
                .collect::<Result<Vec<PromptDescriptor>, _>>()?,
            Err(err) => {
                tracing::debug!(error = %err, "tool server does not list prompts");
                Vec::new()
            }
        };

        self.tools = tools.into_iter().map(map_tool_descriptor).collect();
        self.prompts = prompts;
        tracing::info!(
            tools = ?self.tools.iter().map(|tool| tool.name.as_str()).collect::<Vec<_>>(),
            prompts = ?self.prompts.iter().map(|prompt| prompt.name.as_str()).collect::<Vec<_>>(),
            "tool server catalog loaded"
        );
        Ok(())
    }

    fn service(&self) -> Result<&ClientService, BridgeError> {
        self.service.as_ref().ok_or(BridgeError::Closed)
    }
}

#[async_trait]
impl ToolBridge for McpBridge {
    fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    async fn invoke(
        &mut self,
        tool_name: &str,
        arguments: Arguments,
    ) -> Result<String, BridgeError> {
        self.find_tool(tool_name)?;
        let service = self.service()?;

        let result = service
            .call_tool(CallToolRequestParams {
                meta: None,
                name: tool_name.to_owned().into(),
                arguments: Some(arguments),
                task: None,
            })
            .await
            .map_err(|err| match err {
                ServiceError::McpError(error) => BridgeError::Invocation {
                    tool: tool_name.to_owned(),
                    message: error.message.to_string(),
                },
                other => map_service_error("call_tool", other),
            })?;

        map_call_result(tool_name, result)
    }

    async fn get_prompt(
        &mut self,
        name: &str,
        arguments: HashMap<String, String>,
    ) -> Result<Vec<Message>, BridgeError> {
        let service = self.service()?;
        let params = serde_json::from_value(json!({
            "name": name,
            "arguments": arguments,
        }))?;

        let result = service
            .get_prompt(params)
            .await
            .map_err(|err| map_service_error("get_prompt", err))?;

        Ok(prompt_messages(&serde_json::to_value(result)?))
    }

    async fn close(&mut self) -> Result<(), BridgeError> {
        let Some(service) = self.service.take() else {
            return Ok(());
        };
        let reason = service
            .cancel()
            .await
            .map_err(|err| BridgeError::Transport(format!("close: {err}")))?;
        tracing::debug!(?reason, "tool server connection closed");
        Ok(())
    }
}

fn map_tool_descriptor(tool: rmcp::model::Tool) -> ToolDescriptor {
    ToolDescriptor {
        name: tool.name.to_string(),
        description: tool.description.map(|d| d.to_string()),
        input_schema: Value::Object((*tool.input_schema).clone()),
    }
}

fn extract_text_content(content: &[Content]) -> String {
    content
        .iter()
        .filter_map(|item| item.as_text().map(|text| text.text.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn map_call_result(name: &str, result: CallToolResult) -> Result<String, BridgeError> {
    let text = extract_text_content(&result.content);

    if result.is_error.unwrap_or(false) {
        return Err(BridgeError::Invocation {
            tool: name.to_owned(),
            message: if text.is_empty() {
                "tool returned an error result".to_owned()
            } else {
                text
            },
        });
    }

    Ok(text)
}

/// Text messages of a `prompts/get` result; non-text content is skipped.
fn prompt_messages(result: &Value) -> Vec<Message> {
    let Some(messages) = result.get("messages").and_then(Value::as_array) else {
        return Vec::new();
    };

    messages
        .iter()
        .filter_map(|message| {
            let role = match message.get("role").and_then(Value::as_str) {
                Some("assistant") => Role::Assistant,
                _ => Role::User,
            };
            let content = message.get("content")?;
            if content.get("type").and_then(Value::as_str) != Some("text") {
                return None;
            }
            let text = content.get("text").and_then(Value::as_str)?;
            Some(Message {
                role,
                content: text.to_owned(),
            })
        })
        .collect()
}

fn map_service_error(context: &str, error: ServiceError) -> BridgeError {
    match error {
        ServiceError::McpError(error) => {
            BridgeError::Transport(format!("{context}: MCP error {}: {}", error.code.0, error.message))
        }
        ServiceError::TransportClosed => BridgeError::Closed,
        other => BridgeError::Transport(format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_schema_is_copied() {
        let mut schema = serde_json::Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("required".into(), json!(["docName"]));
        let tool = rmcp::model::Tool::new("get_user_docs", "Get users local documents", schema);

        let descriptor = map_tool_descriptor(tool);
        assert_eq!(descriptor.name, "get_user_docs");
        assert_eq!(descriptor.description.as_deref(), Some("Get users local documents"));
        assert_eq!(descriptor.input_schema["required"], json!(["docName"]));
    }

    #[test]
    fn text_content_is_joined() {
        let result: CallToolResult = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ]
        }))
        .unwrap();
        assert_eq!(map_call_result("get_user_docs", result).unwrap(), "first\nsecond");
    }

    #[test]
    fn error_result_is_an_invocation_error() {
        let result: CallToolResult = serde_json::from_value(json!({
            "content": [{"type": "text", "text": "no document named todo.txt was found"}],
            "isError": true
        }))
        .unwrap();

        let err = map_call_result("get_user_docs", result).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Invocation { ref tool, ref message }
                if tool == "get_user_docs" && message.contains("todo.txt")
        ));
    }

    #[test]
    fn prompt_messages_keep_text_only() {
        let result = json!({
            "description": "summarize a document",
            "messages": [
                {"role": "user", "content": {"type": "text", "text": "Summarize plan.md"}},
                {"role": "assistant", "content": {"type": "image", "data": "AAAA", "mimeType": "image/png"}},
                {"role": "assistant", "content": {"type": "text", "text": "Sure."}}
            ]
        });
        assert_eq!(
            prompt_messages(&result),
            vec![Message::user("Summarize plan.md"), Message::assistant("Sure.")]
        );
        assert!(prompt_messages(&json!({})).is_empty());
    }

    #[test]
    fn closed_transport_maps_to_closed() {
        assert!(matches!(
            map_service_error("list_tools", ServiceError::TransportClosed),
            BridgeError::Closed
        ));
    }
}
