#![allow(dead_code)]

use async_openai::types::ChatCompletionTool;
use async_trait::async_trait;
use mcp_chat::bridge::{BridgeError, ToolBridge};
use mcp_chat::client::cli::Console;
use mcp_chat::gateway::{GatewayError, ModelGateway};
use mcp_chat::recovery::Arguments;
use mcp_chat::types::{Message, ModelResponse, ToolCallRequest, ToolDescriptor};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A request seen by [`ScriptedGateway`].
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub conversation: Vec<Message>,
    pub tool_names: Vec<String>,
}

/// Gateway that replays queued responses in order and records requests.
#[derive(Default)]
pub struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<ModelResponse, GatewayError>>>,
    requests: Mutex<Vec<SeenRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: ModelResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, error: GatewayError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn send_message(
        &self,
        conversation: &[Message],
        tools: &[ChatCompletionTool],
    ) -> Result<ModelResponse, GatewayError> {
        self.requests.lock().unwrap().push(SeenRequest {
            conversation: conversation.to_vec(),
            tool_names: tools.iter().map(|tool| tool.function.name.clone()).collect(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ModelResponse::Empty))
    }
}

/// Bridge with canned tool results.
#[derive(Default)]
pub struct FakeBridge {
    pub tools: Vec<ToolDescriptor>,
    pub results: HashMap<String, Result<String, String>>,
    pub prompts: HashMap<String, Vec<Message>>,
    pub invocations: Vec<(String, Arguments)>,
    pub prompt_requests: Vec<(String, HashMap<String, String>)>,
    pub close_calls: usize,
}

impl FakeBridge {
    pub fn with_tool(mut self, name: &str, result: Result<&str, &str>) -> Self {
        self.tools.push(ToolDescriptor {
            name: name.to_owned(),
            description: Some(format!("{name} tool")),
            input_schema: json!({"type": "object", "properties": {}}),
        });
        self.results.insert(
            name.to_owned(),
            result.map(str::to_owned).map_err(str::to_owned),
        );
        self
    }

    pub fn with_prompt(mut self, name: &str, messages: Vec<Message>) -> Self {
        self.prompts.insert(name.to_owned(), messages);
        self
    }
}

#[async_trait]
impl ToolBridge for FakeBridge {
    fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    async fn invoke(
        &mut self,
        tool_name: &str,
        arguments: Arguments,
    ) -> Result<String, BridgeError> {
        self.find_tool(tool_name)?;
        self.invocations.push((tool_name.to_owned(), arguments));
        match &self.results[tool_name] {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(BridgeError::Invocation {
                tool: tool_name.to_owned(),
                message: message.clone(),
            }),
        }
    }

    async fn get_prompt(
        &mut self,
        name: &str,
        arguments: HashMap<String, String>,
    ) -> Result<Vec<Message>, BridgeError> {
        self.prompt_requests.push((name.to_owned(), arguments));
        self.prompts
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::Transport(format!("get_prompt: unknown prompt {name}")))
    }

    async fn close(&mut self) -> Result<(), BridgeError> {
        self.close_calls += 1;
        Ok(())
    }
}

pub fn tool_call(name: &str, arguments: &str) -> ToolCallRequest {
    ToolCallRequest {
        tool_name: name.to_owned(),
        raw_arguments: arguments.to_owned(),
    }
}

/// Gateway whose requests never complete. `entered` is notified when a
/// request starts.
#[derive(Default)]
pub struct StalledGateway {
    pub entered: Arc<Notify>,
}

#[async_trait]
impl ModelGateway for StalledGateway {
    async fn send_message(
        &self,
        _conversation: &[Message],
        _tools: &[ChatCompletionTool],
    ) -> Result<ModelResponse, GatewayError> {
        self.entered.notify_one();
        std::future::pending().await
    }
}

/// Console fed from a fixed list of lines. Once the lines run out it
/// reports end of input, or blocks forever when built with `then_block`.
#[derive(Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<anyhow::Result<Option<String>>>,
    block_when_done: bool,
    pub written: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConsole {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            inputs: lines.iter().map(|line| Ok(Some(line.to_string()))).collect(),
            ..Self::default()
        }
    }

    pub fn then_fail(mut self, message: &str) -> Self {
        self.inputs.push_back(Err(anyhow::anyhow!(message.to_owned())));
        self
    }

    pub fn then_block(mut self) -> Self {
        self.block_when_done = true;
        self
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_user_input(&mut self) -> anyhow::Result<Option<String>> {
        match self.inputs.pop_front() {
            Some(input) => input,
            None if self.block_when_done => std::future::pending().await,
            None => Ok(None),
        }
    }

    async fn write_line(&mut self, text: &str) -> anyhow::Result<()> {
        self.written.lock().unwrap().push(text.to_owned());
        Ok(())
    }
}
