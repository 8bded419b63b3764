//! One user turn: query the model, run the tools it asks for, and collect
//! the text that ends up in front of the user.

use crate::bridge::{BridgeError, ToolBridge};
use crate::gateway::{GatewayError, ModelGateway};
use crate::recovery::parse_tool_arguments;
use crate::types::{Message, ModelResponse, openai_chatcompletion_toolset};

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("model request failed")]
    Gateway(#[from] GatewayError),
    #[error("could not load prompt")]
    Prompt(#[from] BridgeError),
    /// A follow-up completion failed after tools had already run. `output`
    /// holds the lines produced up to that point.
    #[error("follow-up request failed")]
    Followup {
        output: String,
        #[source]
        source: GatewayError,
    },
}

impl TurnError {
    /// Output that was produced before the turn failed, if any.
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            TurnError::Followup { output, .. } => Some(output),
            _ => None,
        }
    }
}

pub struct Orchestrator<G, B> {
    gateway: G,
    bridge: B,
}

impl<G: ModelGateway, B: ToolBridge> Orchestrator<G, B> {
    pub fn new(gateway: G, bridge: B) -> Self {
        Self { gateway, bridge }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub async fn close(&mut self) -> Result<(), BridgeError> {
        self.bridge.close().await
    }

    /// Runs a turn for `query` and returns the output lines joined by `\n`.
    ///
    /// Every tool call in the model's answer is run in order, each followed
    /// by its own plain completion over the conversation so far. A tool that
    /// is unknown or fails ends the turn with a `failed` trace line. A failed
    /// first request is returned as is; a failed follow-up carries the
    /// output gathered so far in [`TurnError::Followup`].
    pub async fn process_query(&mut self, query: &str) -> Result<String, TurnError> {
        let mut messages = vec![Message::user(query)];
        let mut final_text = Vec::new();

        let tools = openai_chatcompletion_toolset(self.bridge.tools());
        let response = self.gateway.send_message(&messages, &tools).await?;

        match response {
            ModelResponse::ToolCalls(calls) => {
                for call in calls {
                    let arguments = parse_tool_arguments(&call.raw_arguments);
                    let args_json = Value::Object(arguments.clone()).to_string();

                    let result = match self.bridge.invoke(&call.tool_name, arguments).await {
                        Ok(result) => result,
                        Err(error) => {
                            tracing::error!(tool = %call.tool_name, %error, "tool call failed");
                            final_text.push(format!(
                                "[Calling tool {} with args {} failed: {}]",
                                call.tool_name, args_json, error
                            ));
                            break;
                        }
                    };
                    final_text.push(format!(
                        "[Calling tool {} with args {}]",
                        call.tool_name, args_json
                    ));

                    messages.push(Message::user(result));

                    let followup = match self.gateway.send_message(&messages, &[]).await {
                        Ok(followup) => followup,
                        Err(source) => {
                            return Err(TurnError::Followup {
                                output: final_text.join("\n"),
                                source,
                            });
                        }
                    };
                    final_text.push(followup.into_text().unwrap_or_default());
                }
            }
            ModelResponse::Text(text) => final_text.push(text),
            ModelResponse::Empty => tracing::error!(query, "failed to process query"),
        }

        Ok(final_text.join("\n"))
    }

    /// Fetches prompt `name` from the tool server and runs its text as a
    /// normal query.
    pub async fn process_prompt(
        &mut self,
        name: &str,
        arguments: HashMap<String, String>,
    ) -> Result<String, TurnError> {
        let messages = self.bridge.get_prompt(name, arguments).await?;
        let query = messages
            .into_iter()
            .map(|message| message.content)
            .collect::<Vec<_>>()
            .join("\n");
        self.process_query(&query).await
    }
}
