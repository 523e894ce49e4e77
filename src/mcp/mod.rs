//! MCP (Model Context Protocol) server implementation
//!
//! Exposes the RAG bridge tools over stdio for MCP hosts such as Claude
//! Desktop.

mod server;
mod tools;
mod types;

pub use server::McpServer;
pub use tools::{enabled_tools, handle_tool_call, tool_definitions, ToolKind};
pub use types::{
    ErrorCode, McpError, McpRequest, McpResponse, ToolContent, ToolDefinition, ToolResult,
};
