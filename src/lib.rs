pub mod bridge;
pub mod client;
pub mod config;
pub mod doc_server;
pub mod gateway;
pub mod logging;
pub mod orchestrator;
pub mod recovery;
pub mod types;

pub use bridge::{McpBridge, ToolBridge};
pub use gateway::{ModelGateway, OpenAiGateway};
pub use orchestrator::Orchestrator;
