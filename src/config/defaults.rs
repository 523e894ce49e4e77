//! Default values for configuration

/// Default base URL of the RAG API server
pub fn default_base_url() -> String {
    "http://localhost:8900".to_string()
}

/// Default path of the .NET RAG chat endpoint
pub fn default_chat_endpoint() -> String {
    "/api/chat/rag".to_string()
}

/// Default path of the universal RAG chat endpoint
pub fn default_universal_endpoint() -> String {
    "/api/chat/universal".to_string()
}

/// Default session id used when the caller does not supply one
pub fn default_session_id() -> String {
    "claude-desktop-session".to_string()
}

/// Default outbound request timeout in seconds
pub fn default_request_timeout_secs() -> f64 {
    120.0
}

/// Default: expose the `code_assistant` tool
pub fn default_enable_dotnet_rag() -> bool {
    true
}

/// Default: expose the `universal_code_assistant` tool
pub fn default_enable_universal_rag() -> bool {
    true
}

/// Default path of the reserved SQL agent endpoint
pub fn default_sql_agent_endpoint() -> String {
    "/api/sql/agent".to_string()
}

/// Default path of the reserved React agent endpoint
pub fn default_react_agent_endpoint() -> String {
    "/api/react/agent".to_string()
}

/// Default path of the reserved Java agent endpoint
pub fn default_java_agent_endpoint() -> String {
    "/api/java/agent".to_string()
}
