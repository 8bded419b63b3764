use clap::Parser;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-small-3.1-24b-instruct:free";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Parser)]
#[command(name = "mcp-chat")]
#[command(about = "Chat with a language model that can call tools on a local MCP server")]
pub struct Cli {
    /// Tool server to launch: a .js/.ts/.py script or an executable
    pub server: String,

    /// Extra arguments passed to the tool server
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub server_args: Vec<String>,

    /// Model identifier sent with every completion request
    #[arg(long, env = "MCP_CHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the OpenAI-compatible completion API
    #[arg(long, env = "MCP_CHAT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENROUTER_API_KEY is not set")]
    MissingApiKey,
    #[error("no tool server given")]
    MissingServer,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub server: String,
    pub server_args: Vec<String>,
}

impl Config {
    /// Reads the credential from the environment. Call `dotenvy::dotenv`
    /// first if a `.env` file should be honoured.
    pub fn from_env(cli: Cli) -> Result<Self, ConfigError> {
        Self::new(cli, std::env::var(API_KEY_VAR).ok())
    }

    pub fn new(cli: Cli, api_key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        if cli.server.trim().is_empty() {
            return Err(ConfigError::MissingServer);
        }

        Ok(Self {
            api_key,
            model: cli.model,
            base_url: cli.base_url,
            server: cli.server,
            server_args: cli.server_args,
        })
    }

    /// Command that launches the tool server, picking an interpreter from
    /// the script extension.
    pub fn server_command(&self) -> Command {
        let interpreter = match Path::new(&self.server)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some("js" | "mjs" | "ts") => Some("node"),
            Some("py") => Some("python3"),
            _ => None,
        };

        let mut command = match interpreter {
            Some(interpreter) => {
                let mut command = Command::new(interpreter);
                command.arg(&self.server);
                command
            }
            None => Command::new(&self.server),
        };
        command.args(&self.server_args);
        command
    }
}
