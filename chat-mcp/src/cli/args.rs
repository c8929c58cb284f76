//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chat-mcp")]
#[command(about = "Shop chat assistant tool client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: nearest .chat-mcp.toml, then ~/.config/chat-mcp/)
    #[arg(long, short = 'c', env = "CHAT_MCP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Model name sent to the completion backend (overrides config)
    #[arg(short = 'm', long, env = "CHAT_MCP_MODEL", global = true)]
    pub model: Option<String>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the registered tools in function-calling format
    Tools,
    /// Call a tool directly
    Call {
        /// Tool name
        tool: String,
        /// Arguments as a JSON object
        #[arg(long, short, default_value = "{}")]
        args: String,
        /// Correlation id for the call
        #[arg(long, default_value = "call_cli")]
        id: String,
    },
    /// Send one message through a chat session (canned backend)
    Chat {
        /// Message to send
        message: String,
    },
    /// Print a JSON-RPC request envelope
    Request {
        /// Method name
        method: String,
        /// Params as a JSON object
        #[arg(long, short)]
        params: Option<String>,
    },
}
