//! CLI module
//!
//! Argument definitions for the `chat-mcp` binary.

pub mod args;

pub use args::{Cli, Commands};
