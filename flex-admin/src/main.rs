//! Flex Admin Entry Point
//!
//! Connects to OpenSearch and runs a single admin command, printing its JSON
//! result to stdout.

use clap::Parser;
use dotenv::dotenv;
use flex_admin::{execute, AdminError, Command, Dependencies};
use flex_repository::config::DEFAULT_URL;
use flex_repository::{FlexConfig, IndexConfig};
use flex_shared::DEFAULT_RESULT_SIZE;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Flex admin - manage category mappings and query the search index
#[derive(Parser, Debug)]
#[command(name = "flex-admin", version, about, long_about = None)]
struct Args {
    /// Collection (index) name
    #[arg(long, env = "SEARCH_INDEX")]
    index: String,

    /// OpenSearch server URL
    #[arg(long, env = "OPENSEARCH_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Hit cap for query shortcuts
    #[arg(long, env = "FLEX_RESULT_SIZE", default_value_t = DEFAULT_RESULT_SIZE)]
    result_size: usize,

    /// Refresh indices after each write
    #[arg(long)]
    refresh: bool,

    #[command(subcommand)]
    command: Command,
}

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), AdminError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("flex_admin=info,flex_repository=info"));

    if env::var("FLEX_LOG_JSON").is_ok() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| AdminError::config(e.to_string()))?;

        info!(
            service_name = "flex-admin",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        // Logs go to stderr so stdout carries only the command result
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .pretty(),
            )
            .try_init()
            .map_err(|e| AdminError::config(e.to_string()))?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AdminError> {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Args::parse();

    init_tracing()?;

    let config = FlexConfig::new(args.index)
        .with_url(args.url)
        .with_result_size(args.result_size);
    let index_config = IndexConfig::default().with_refresh(args.refresh);

    let deps = match Dependencies::new(config, index_config).await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match execute(&deps.service, args.command).await {
        Ok(output) => {
            let rendered = serde_json::to_string_pretty(&output)
                .map_err(|e| AdminError::input(e.to_string()))?;
            println!("{}", rendered);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            Err(e)
        }
    }
}
