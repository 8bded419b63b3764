use mcp_chat::client::cli::CliClient;
use mcp_chat::config::{Cli, Config};
use mcp_chat::{McpBridge, OpenAiGateway, Orchestrator, ToolBridge, logging};

use anyhow::{Context, Result};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    logging::init();

    let config = Config::from_env(Cli::parse())?;

    let bridge = McpBridge::connect(config.server_command())
        .await
        .with_context(|| format!("failed to connect to MCP server {}", config.server))?;
    let names: Vec<&str> = bridge.tools().iter().map(|tool| tool.name.as_str()).collect();
    println!("Connected to server with tools: {names:?}");

    let gateway = OpenAiGateway::new(&config.api_key, &config.base_url, config.model.as_str());
    let mut cli_client = CliClient::new(Orchestrator::new(gateway, bridge));

    cli_client.run().await
}
