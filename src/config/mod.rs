//! Configuration management for ragbridge
//!
//! Every setting comes from an environment variable with a literal default.
//! Values are resolved once at startup and immutable afterwards; invalid
//! values are startup errors, never runtime ones.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Resolved process configuration.
///
/// Built once in `main` and passed by reference into the MCP server and
/// tool handlers. The full endpoint URLs are recomputed from the current
/// fields on every access.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the RAG API server
    pub base_url: String,

    /// Path of the .NET RAG chat endpoint
    pub chat_endpoint: String,

    /// Path of the universal RAG chat endpoint
    pub universal_endpoint: String,

    /// Session id used when the caller does not supply one
    pub default_session_id: String,

    /// Outbound request timeout in seconds
    pub request_timeout_secs: f64,

    /// Expose the `code_assistant` tool
    pub enable_dotnet_rag: bool,

    /// Expose the `universal_code_assistant` tool
    pub enable_universal_rag: bool,

    /// Reserved endpoint for a future SQL agent tool; no handler uses it yet
    pub sql_agent_endpoint: String,

    /// Reserved endpoint for a future React agent tool; no handler uses it yet
    pub react_agent_endpoint: String,

    /// Reserved endpoint for a future Java agent tool; no handler uses it yet
    pub java_agent_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_endpoint: default_chat_endpoint(),
            universal_endpoint: default_universal_endpoint(),
            default_session_id: default_session_id(),
            request_timeout_secs: default_request_timeout_secs(),
            enable_dotnet_rag: default_enable_dotnet_rag(),
            enable_universal_rag: default_enable_universal_rag(),
            sql_agent_endpoint: default_sql_agent_endpoint(),
            react_agent_endpoint: default_react_agent_endpoint(),
            java_agent_endpoint: default_java_agent_endpoint(),
        }
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// `from_env` passes `std::env::var`; tests pass a closure over a map
    /// so they never mutate process-global state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup("RAG_API_BASE_URL") {
            config.base_url = value;
        }
        if let Some(value) = lookup("RAG_CHAT_ENDPOINT") {
            config.chat_endpoint = value;
        }
        if let Some(value) = lookup("UNIVERSAL_RAG_ENDPOINT") {
            config.universal_endpoint = value;
        }
        if let Some(value) = lookup("DEFAULT_SESSION_ID") {
            config.default_session_id = value;
        }
        if let Some(value) = lookup("REQUEST_TIMEOUT") {
            config.request_timeout_secs = value.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "REQUEST_TIMEOUT must be a number of seconds, got '{}'",
                    value
                ))
            })?;
        }
        if let Some(value) = lookup("ENABLE_DOTNET_RAG") {
            config.enable_dotnet_rag = parse_flag(&value);
        }
        if let Some(value) = lookup("ENABLE_UNIVERSAL_RAG") {
            config.enable_universal_rag = parse_flag(&value);
        }
        if let Some(value) = lookup("SQL_AGENT_ENDPOINT") {
            config.sql_agent_endpoint = value;
        }
        if let Some(value) = lookup("REACT_AGENT_ENDPOINT") {
            config.react_agent_endpoint = value;
        }
        if let Some(value) = lookup("JAVA_AGENT_ENDPOINT") {
            config.java_agent_endpoint = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Full URL for the .NET RAG chat endpoint
    pub fn rag_chat_url(&self) -> String {
        format!("{}{}", self.base_url, self.chat_endpoint)
    }

    /// Full URL for the universal RAG chat endpoint
    pub fn universal_rag_url(&self) -> String {
        format!("{}{}", self.base_url, self.universal_endpoint)
    }

    /// Full URL for the reserved SQL agent endpoint
    pub fn sql_agent_url(&self) -> String {
        format!("{}{}", self.base_url, self.sql_agent_endpoint)
    }

    /// Full URL for the reserved React agent endpoint
    pub fn react_agent_url(&self) -> String {
        format!("{}{}", self.base_url, self.react_agent_endpoint)
    }

    /// Full URL for the reserved Java agent endpoint
    pub fn java_agent_url(&self) -> String {
        format!("{}{}", self.base_url, self.java_agent_endpoint)
    }

    /// Outbound request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url).map_err(|e| {
            Error::Config(format!("RAG_API_BASE_URL is not a valid URL: {}", e))
        })?;

        if !self.request_timeout_secs.is_finite() || self.request_timeout_secs <= 0.0 {
            return Err(Error::Config(
                "REQUEST_TIMEOUT must be a positive number of seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Boolean flags parse case-insensitively; `"true"` enables, anything else
/// disables.
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8900");
        assert_eq!(config.chat_endpoint, "/api/chat/rag");
        assert_eq!(config.universal_endpoint, "/api/chat/universal");
        assert_eq!(config.default_session_id, "claude-desktop-session");
        assert_eq!(config.request_timeout_secs, 120.0);
        assert!(config.enable_dotnet_rag);
        assert!(config.enable_universal_rag);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_lookup_gives_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.rag_chat_url(), "http://localhost:8900/api/chat/rag");
        assert_eq!(
            config.universal_rag_url(),
            "http://localhost:8900/api/chat/universal"
        );
    }

    #[test]
    fn test_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("RAG_API_BASE_URL", "http://10.0.0.5:9000"),
            ("RAG_CHAT_ENDPOINT", "/v2/chat"),
            ("DEFAULT_SESSION_ID", "ci-session"),
            ("REQUEST_TIMEOUT", "2.5"),
        ]))
        .unwrap();

        assert_eq!(config.rag_chat_url(), "http://10.0.0.5:9000/v2/chat");
        assert_eq!(
            config.universal_rag_url(),
            "http://10.0.0.5:9000/api/chat/universal"
        );
        assert_eq!(config.default_session_id, "ci-session");
        assert_eq!(config.request_timeout_secs, 2.5);
    }

    #[test]
    fn test_flag_parsing_is_case_insensitive() {
        for value in ["true", "TRUE", "True", " true "] {
            let config =
                Config::from_lookup(lookup_from(&[("ENABLE_DOTNET_RAG", value)])).unwrap();
            assert!(config.enable_dotnet_rag, "'{}' should enable", value);
        }
        for value in ["false", "FALSE", "1", "yes", "on", ""] {
            let config =
                Config::from_lookup(lookup_from(&[("ENABLE_DOTNET_RAG", value)])).unwrap();
            assert!(!config.enable_dotnet_rag, "'{}' should disable", value);
        }
    }

    #[test]
    fn test_invalid_timeout_is_a_startup_error() {
        let result = Config::from_lookup(lookup_from(&[("REQUEST_TIMEOUT", "soon")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_nonpositive_timeout_is_rejected() {
        for value in ["0", "-5"] {
            let result = Config::from_lookup(lookup_from(&[("REQUEST_TIMEOUT", value)]));
            assert!(matches!(result, Err(Error::Config(_))), "'{}'", value);
        }
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("RAG_API_BASE_URL", "not a url")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_reserved_endpoints_are_parsed_but_inert() {
        let config = Config::from_lookup(lookup_from(&[("SQL_AGENT_ENDPOINT", "/v2/sql")]))
            .unwrap();
        assert_eq!(config.sql_agent_url(), "http://localhost:8900/v2/sql");
        assert_eq!(
            config.react_agent_url(),
            "http://localhost:8900/api/react/agent"
        );
        assert_eq!(
            config.java_agent_url(),
            "http://localhost:8900/api/java/agent"
        );
    }
}
