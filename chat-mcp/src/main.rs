use anyhow::Result;
use clap::Parser;

use chat_mcp::cli::{Cli, Commands};
use chat_mcp::config::FileConfig;
use chat_mcp::handlers;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    mcp_protocol::init_tracing("chat_mcp", cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => FileConfig::load_from_path(path)?,
        None => FileConfig::load()?,
    };
    if let Some(model) = cli.model {
        config.chat.model = model;
    }
    let options = config.tools.client_options();

    match cli.command {
        Commands::Tools => {
            let client = handlers::shop_client(options)?;
            handlers::run_tools(&client)?;
        }
        Commands::Call { tool, args, id } => {
            let client = handlers::shop_client(options)?;
            if handlers::run_call(&client, &tool, &args, &id).await? {
                std::process::exit(1);
            }
        }
        Commands::Chat { message } => {
            handlers::run_chat(config.chat, options, &message).await?;
        }
        Commands::Request { method, params } => {
            let client = handlers::shop_client(options)?;
            handlers::run_request(&client, &method, params.as_deref())?;
        }
    }

    Ok(())
}
