//! ragbridge CLI entry point

use clap::{Parser, Subcommand};
use ragbridge::{config::Config, error::Result, mcp::{tool_definitions, McpServer}};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ragbridge")]
#[command(version, about = "MCP stdio bridge for a remote RAG code assistant API", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio
    Serve,

    /// List the tools enabled by the current configuration
    Tools,

    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. Everything goes to stderr: in serve mode stdout
    // carries only MCP protocol frames.
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve => {
            info!("Starting ragbridge MCP server...");
            info!(
                "RAG API URL (.NET): {} ({})",
                config.rag_chat_url(),
                if config.enable_dotnet_rag { "enabled" } else { "disabled" }
            );
            info!(
                "RAG API URL (Universal): {} ({})",
                config.universal_rag_url(),
                if config.enable_universal_rag { "enabled" } else { "disabled" }
            );
            info!("Request timeout: {}s", config.request_timeout_secs);

            let server = McpServer::new(config);
            server
                .run()
                .await
                .map_err(|e| ragbridge::Error::McpProtocol(e.to_string()))?;
        }

        Commands::Tools => {
            let tools = tool_definitions(&config);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tools)?);
            } else if tools.is_empty() {
                println!(
                    "No tools enabled. Set ENABLE_DOTNET_RAG or ENABLE_UNIVERSAL_RAG to true."
                );
            } else {
                for tool in &tools {
                    println!("{}", tool.name);
                    println!("  {}", tool.description.lines().next().unwrap_or_default());
                }
            }
        }

        Commands::Config => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Base URL:           {}", config.base_url);
                println!("Chat URL:           {}", config.rag_chat_url());
                println!("Universal URL:      {}", config.universal_rag_url());
                println!("Default session id: {}", config.default_session_id);
                println!("Request timeout:    {}s", config.request_timeout_secs);
                println!(
                    "code_assistant:            {}",
                    if config.enable_dotnet_rag { "enabled" } else { "disabled" }
                );
                println!(
                    "universal_code_assistant:  {}",
                    if config.enable_universal_rag { "enabled" } else { "disabled" }
                );
            }
        }
    }

    Ok(())
}
