mod message;
mod response;
mod tool;

pub use message::{Message, Role};
pub use response::ModelResponse;
pub use tool::{ToolCallRequest, ToolDescriptor, openai_chatcompletion_toolset};
