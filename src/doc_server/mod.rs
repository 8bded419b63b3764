//! MCP server exposing a directory of user documents as tools.

mod store;

pub use store::{DocError, DocStore};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetUserDocs {
    #[schemars(description = "The name of the user's document")]
    pub doc_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditUserDocs {
    #[schemars(description = "The name of the user's document")]
    pub doc_name: String,

    #[schemars(description = "The text to replace. Must match exactly")]
    pub old_string: String,

    #[schemars(description = "The text to insert in place of the old text")]
    pub new_string: String,
}

#[derive(Clone)]
pub struct DocServer {
    store: DocStore,
    tool_router: ToolRouter<Self>,
}

impl DocServer {
    pub fn new(store: DocStore) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl DocServer {
    #[tool(description = "Get users local documents")]
    async fn get_user_docs(
        &self,
        Parameters(GetUserDocs { doc_name }): Parameters<GetUserDocs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(self.store.read(&doc_name).await))
    }

    #[tool(
        description = "Edit a document by replacing a string in the documents content with a new string"
    )]
    async fn edit_user_docs(
        &self,
        Parameters(EditUserDocs {
            doc_name,
            old_string,
            new_string,
        }): Parameters<EditUserDocs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(
            self.store.edit(&doc_name, &old_string, &new_string).await,
        ))
    }
}

#[tool_handler]
impl ServerHandler for DocServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Reads and edits the user's local documents.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

fn into_tool_result(result: Result<String, DocError>) -> CallToolResult {
    match result {
        Ok(contents) => CallToolResult::success(vec![Content::text(contents)]),
        Err(error) => CallToolResult::error(vec![Content::text(error.to_string())]),
    }
}
