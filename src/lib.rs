//! ragbridge - MCP stdio bridge for a remote RAG code assistant API
//!
//! This crate provides:
//! - A static catalog of code-assistant tools, filtered by feature flags
//! - An MCP server over stdio for Claude Desktop and other MCP hosts
//! - A thin HTTP client forwarding each invocation to the RAG API

pub mod config;
pub mod error;
pub mod mcp;
pub mod rag;

pub use config::Config;
pub use error::{Error, Result};
