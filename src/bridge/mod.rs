//! Invocation of tools hosted by an external tool server.

mod mcp;

pub use mcp::{McpBridge, PromptArgument, PromptDescriptor};

use crate::recovery::Arguments;
use crate::types::{Message, ToolDescriptor};

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown tool {0}")]
    UnknownTool(String),
    #[error("tool {tool} failed: {message}")]
    Invocation { tool: String, message: String },
    #[error("{0}")]
    Transport(String),
    #[error("tool server returned an unexpected payload")]
    Protocol(#[from] serde_json::Error),
    #[error("could not start tool server")]
    Spawn(#[source] std::io::Error),
    #[error("tool server connection is closed")]
    Closed,
}

#[async_trait]
pub trait ToolBridge: Send {
    /// Catalog fetched when the connection was made.
    fn tools(&self) -> &[ToolDescriptor];

    async fn invoke(&mut self, tool_name: &str, arguments: Arguments)
    -> Result<String, BridgeError>;

    /// Fetches a prompt template with `arguments` filled in.
    async fn get_prompt(
        &mut self,
        name: &str,
        arguments: HashMap<String, String>,
    ) -> Result<Vec<Message>, BridgeError>;

    /// Releases the connection. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), BridgeError>;

    fn find_tool(&self, tool_name: &str) -> Result<&ToolDescriptor, BridgeError> {
        self.tools()
            .iter()
            .find(|tool| tool.name == tool_name)
            .ok_or_else(|| BridgeError::UnknownTool(tool_name.to_owned()))
    }
}
