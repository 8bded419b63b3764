use super::command::{Command, parse_command};
use super::io::{Console, Terminal};

use crate::bridge::ToolBridge;
use crate::gateway::ModelGateway;
use crate::orchestrator::{Orchestrator, TurnError};

use anyhow::Result;
use std::future::Future;

pub struct CliClient<G, B, C = Terminal> {
    orchestrator: Orchestrator<G, B>,
    console: C,
}

impl<G: ModelGateway, B: ToolBridge> CliClient<G, B> {
    pub fn new(orchestrator: Orchestrator<G, B>) -> Self {
        Self::with_console(orchestrator, Terminal::new())
    }

    /// Chats until `exit`, end of input, Ctrl-C or an I/O error, then closes
    /// the tool server connection.
    pub async fn run(&mut self) -> Result<()> {
        self.run_until(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::error!(%error, "could not listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}

impl<G: ModelGateway, B: ToolBridge, C: Console> CliClient<G, B, C> {
    pub fn with_console(orchestrator: Orchestrator<G, B>, console: C) -> Self {
        Self {
            orchestrator,
            console,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator<G, B> {
        &self.orchestrator
    }

    /// Like [`CliClient::run`], with `interrupt` standing in for Ctrl-C.
    /// The connection is closed on every way out of the loop and a close
    /// failure is only logged, so the loop's own result is what comes back.
    pub async fn run_until(&mut self, interrupt: impl Future) -> Result<()> {
        let result = self.chat(interrupt).await;
        if let Err(error) = self.orchestrator.close().await {
            tracing::error!(%error, "failed to close tool server connection");
        }
        result
    }

    /// Reads queries until `exit`, end of input or `interrupt`. The interrupt
    /// is watched during a turn as well, abandoning the turn. A failed turn
    /// is reported and the loop goes on; only console errors end it early.
    async fn chat(&mut self, interrupt: impl Future) -> Result<()> {
        tokio::pin!(interrupt);
        self.console.write_line("\nMCP Client Started!").await?;

        loop {
            let input = tokio::select! {
                input = self.console.read_user_input() => input?,
                _ = &mut interrupt => {
                    tracing::info!("interrupted while waiting for input");
                    break;
                }
            };
            let Some(input) = input else {
                break;
            };

            let result = match parse_command(&input) {
                Ok(Command::Exit) => break,
                Ok(Command::Empty) => continue,
                Ok(Command::Tools) => {
                    let listing = self.tool_listing();
                    self.console.write_line(&listing).await?;
                    continue;
                }
                Ok(Command::Prompt { name, arguments }) => tokio::select! {
                    result = self.orchestrator.process_prompt(&name, arguments) => result,
                    _ = &mut interrupt => {
                        tracing::info!(prompt = %name, "interrupted during turn");
                        break;
                    }
                },
                Ok(Command::Query(query)) => tokio::select! {
                    result = self.orchestrator.process_query(&query) => result,
                    _ = &mut interrupt => {
                        tracing::info!("interrupted during turn");
                        break;
                    }
                },
                Err(error) => {
                    self.console.write_line(&error.to_string()).await?;
                    continue;
                }
            };
            self.report(result).await?;
        }

        self.console.write_line("closing...").await?;
        Ok(())
    }

    async fn report(&mut self, result: Result<String, TurnError>) -> Result<()> {
        match result {
            Ok(text) => self.console.write_line(&format!("\n{text}")).await,
            Err(error) => {
                if let Some(output) = error.partial_output() {
                    self.console.write_line(&format!("\n{output}")).await?;
                }
                let error = anyhow::Error::from(error);
                tracing::error!("{error:#}");
                self.console.write_line(&format!("error: {error:#}")).await
            }
        }
    }

    fn tool_listing(&self) -> String {
        let tools = self.orchestrator.bridge().tools();
        if tools.is_empty() {
            return "no tools available".to_owned();
        }
        tools
            .iter()
            .map(|tool| match &tool.description {
                Some(description) => format!("{}: {}", tool.name, description),
                None => tool.name.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
