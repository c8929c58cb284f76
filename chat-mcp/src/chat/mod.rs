//! Chat session layer
//!
//! Transcript types, the completion backend seam and the session that ties
//! them to a tool client.

pub mod backend;
pub mod session;
pub mod types;

pub use backend::{CannedBackend, ChatCompletionRequest, ChatCompletionResponse, CompletionBackend};
pub use session::{ChatError, ChatSession, ROUND_LIMIT_REPLY};
pub use types::{ChatMessage, ChatState, Role};
