use mcp_chat::doc_server::{DocServer, DocStore};
use mcp_chat::logging;

use anyhow::{Context, Result};
use clap::Parser;
use rmcp::service::ServiceExt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doc-server")]
#[command(about = "MCP server for reading and editing local documents over stdio")]
struct Args {
    /// Directory holding the documents
    #[arg(long, env = "DOC_SERVER_DOCS", default_value = "docs")]
    docs: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    logging::init();
    let args = Args::parse();

    let store = DocStore::new(args.docs);
    tracing::debug!(docs = %store.root().display(), "starting document server");
    let service = DocServer::new(store.clone())
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    tracing::info!(docs = %store.root().display(), "document MCP server running on stdio");

    service.waiting().await?;
    Ok(())
}
