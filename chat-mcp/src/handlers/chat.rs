//! Chat command handler

use std::sync::Arc;

use anyhow::Result;

use crate::chat::{CannedBackend, ChatSession};
use crate::client::ClientOptions;
use crate::config::ChatConfig;
use crate::events::EventKind;
use crate::shop::{shared_cart, shop_tools, Catalog};

use super::event_logger;

/// Handle the `chat` command - one user turn against the canned backend
pub async fn run_chat(config: ChatConfig, options: ClientOptions, message: &str) -> Result<()> {
    let mut session = ChatSession::new(config, options, Arc::new(CannedBackend));
    for tool in shop_tools(Catalog::demo(), shared_cart()) {
        session.register_tool(tool)?;
    }

    let logger = event_logger();
    for kind in EventKind::ALL {
        session.on(kind, &logger);
    }

    session.send_message(message).await?;

    for message in session.messages() {
        println!("[{}] {}", message.role, message.content);
    }
    Ok(())
}
