//! MCP tool definitions and handlers
//!
//! Listing and dispatch both derive from `ToolKind::ALL`, so the two can
//! never disagree about which tools are enabled.

use super::types::{ToolDefinition, ToolResult};
use crate::config::Config;
use crate::error::Result;
use crate::rag::{post_chat, ChatRequest, RagResponse};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{error, info};

/// The invocable tools, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    CodeAssistant,
    UniversalCodeAssistant,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::CodeAssistant, ToolKind::UniversalCodeAssistant];

    /// Wire name of the tool
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::CodeAssistant => "code_assistant",
            ToolKind::UniversalCodeAssistant => "universal_code_assistant",
        }
    }

    /// Whether the corresponding feature flag exposes this tool
    pub fn enabled(self, config: &Config) -> bool {
        match self {
            ToolKind::CodeAssistant => config.enable_dotnet_rag,
            ToolKind::UniversalCodeAssistant => config.enable_universal_rag,
        }
    }

    /// Full URL of the chat endpoint this tool forwards to
    pub fn endpoint_url(self, config: &Config) -> String {
        match self {
            ToolKind::CodeAssistant => config.rag_chat_url(),
            ToolKind::UniversalCodeAssistant => config.universal_rag_url(),
        }
    }

    /// Label used in remote-failure texts
    fn api_label(self) -> &'static str {
        match self {
            ToolKind::CodeAssistant => "RAG API",
            ToolKind::UniversalCodeAssistant => "Universal RAG API",
        }
    }

    /// Label used in validation and empty-response texts
    fn assistant_label(self) -> &'static str {
        match self {
            ToolKind::CodeAssistant => "code assistant",
            ToolKind::UniversalCodeAssistant => "universal code assistant",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ToolKind::CodeAssistant => {
                "Intelligent code assistant powered by RAG (Retrieval-Augmented Generation).\n\n\
                 Use this tool to generate C#/.NET code that follows the indexed codebase's \
                 patterns, query project architecture and structure, find existing methods, \
                 DTOs, services, or interfaces, and generate SQL queries for the project's \
                 database schema.\n\n\
                 The tool has access to complete codebase context: ASP.NET Core APIs and \
                 controllers, database schemas, service interfaces and implementations, \
                 entities and view models, and repository/data-access layers.\n\n\
                 Returns detailed code examples with explanations."
            }
            ToolKind::UniversalCodeAssistant => {
                "Universal code assistant powered by RAG for any programming language.\n\n\
                 Use this tool to query a non-.NET codebase (Python, Java, React, Go, Rust, \
                 PHP, Ruby, C++, Flutter), understand its architecture and patterns, find \
                 existing functions, classes, components, or modules, and generate code \
                 following the project's conventions.\n\n\
                 The language/framework is configured on the RAG server side."
            }
        }
    }

    fn message_description(self) -> &'static str {
        match self {
            ToolKind::CodeAssistant => {
                "Your code-related question or request. Be specific about what you need. \
                 Examples: 'Create a C# function to get employee requests by ID', \
                 'Show me how pagination is implemented in this project', \
                 'Generate a DTO for the Employee table'"
            }
            ToolKind::UniversalCodeAssistant => {
                "Your code-related question or request. Be specific about what you need. \
                 Examples: 'How is authentication implemented?', \
                 'Show me the main API routes', \
                 'How is state management done in this project?'"
            }
        }
    }

    /// Tool definition for `tools/list`
    pub fn definition(self, config: &Config) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": self.message_description()
                    },
                    "session_id": {
                        "type": "string",
                        "description": "Optional session ID for conversation continuity. \
                                        Reuse the same session_id to keep context across \
                                        multiple questions.",
                        "default": config.default_session_id.as_str()
                    }
                },
                "required": ["message"]
            }),
        }
    }
}

/// Tools currently enabled by configuration, in declaration order
pub fn enabled_tools(config: &Config) -> Vec<ToolKind> {
    ToolKind::ALL
        .iter()
        .copied()
        .filter(|tool| tool.enabled(config))
        .collect()
}

/// Definitions of the enabled tools, for `tools/list`
pub fn tool_definitions(config: &Config) -> Vec<ToolDefinition> {
    enabled_tools(config)
        .into_iter()
        .map(|tool| tool.definition(config))
        .collect()
}

/// Handle a tool call
///
/// This is the single top-level failure boundary: expected failures come
/// back from the handler as error-flagged results, and anything the handler
/// did not anticipate is converted to generic error text here. Nothing
/// propagates to the transport loop.
pub async fn handle_tool_call(
    name: &str,
    arguments: &HashMap<String, Value>,
    config: &Config,
) -> ToolResult {
    info!("Tool called: {}", name);

    let available = enabled_tools(config);
    let Some(kind) = available.iter().copied().find(|tool| tool.name() == name) else {
        let names: Vec<&str> = available.iter().map(|tool| tool.name()).collect();
        return ToolResult::error(format!(
            "Unknown tool: '{}'. Available tools: {}",
            name,
            names.join(", ")
        ));
    };

    match run_assistant(kind, arguments, config).await {
        Ok(result) => result,
        Err(e) => {
            error!("Error executing tool '{}': {}", name, e);
            ToolResult::error(format!("Error executing tool '{}': {}", name, e))
        }
    }
}

/// Validate → send → await → map, for one assistant invocation.
async fn run_assistant(
    kind: ToolKind,
    arguments: &HashMap<String, Value>,
    config: &Config,
) -> Result<ToolResult> {
    let message = arguments
        .get("message")
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .trim()
        .to_string();

    if message.is_empty() {
        return Ok(ToolResult::error(format!(
            "Please provide a message/question for the {}.",
            kind.assistant_label()
        )));
    }

    let session_id = arguments
        .get("session_id")
        .and_then(|value| value.as_str())
        .unwrap_or(&config.default_session_id)
        .to_string();

    let url = kind.endpoint_url(config);
    let request = ChatRequest {
        session_id,
        message,
    };

    info!("Calling {}: {}", kind.api_label(), url);

    let data = match post_chat(&url, config.request_timeout(), &request).await {
        Ok(data) => data,
        Err(e) => return Ok(ToolResult::error(e.user_text())),
    };

    info!("{} response received, ok={}", kind.api_label(), data.ok);

    if !data.ok {
        let error_msg = data
            .failure_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown error from {}", kind.api_label()));
        error!("{} reported failure: {}", kind.api_label(), error_msg);
        return Ok(ToolResult::error(format!(
            "{} Error: {}",
            kind.api_label(),
            error_msg
        )));
    }

    Ok(ToolResult::text(render_response(kind, &data)))
}

/// Assemble the user-visible text from a successful response.
///
/// Part order is fixed: answer, SQL block, markdown, clarification, footer.
/// The SQL and markdown sections only apply to the .NET assistant.
fn render_response(kind: ToolKind, data: &RagResponse) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(answer) = data.answer_text() {
        parts.push(answer.to_string());
    }

    if kind == ToolKind::CodeAssistant {
        if let Some(sql) = data.sql_text() {
            parts.push(format!("\n\n### Generated SQL\n```sql\n{}\n```", sql));
        }
        if let Some(markdown) = data.markdown_text() {
            parts.push(format!("\n\n{}", markdown));
        }
    }

    if let Some(clarification) = data.clarification_text() {
        parts.push(format!("\n\n**Clarification Needed:** {}", clarification));
    }

    if data.chunks_count > 0 {
        let footer = match kind {
            ToolKind::CodeAssistant => format!(
                "\n\n---\n*Context: {} code chunks analyzed from your codebase*",
                data.chunks_count
            ),
            ToolKind::UniversalCodeAssistant => format!(
                "\n\n---\n*Context: {} code chunks analyzed ({} codebase)*",
                data.chunks_count,
                data.language_or_unknown()
            ),
        };
        parts.push(footer);
    }

    if parts.is_empty() {
        format!("No response from {}.", kind.assistant_label())
    } else {
        parts.join("\n")
    }
}
