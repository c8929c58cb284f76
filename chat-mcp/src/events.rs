//! Chat events and the in-process event bus
//!
//! The event vocabulary is closed: every [`ChatEvent`] variant has a matching
//! [`EventKind`], and subscribers register against a kind. Emission is
//! synchronous. A subscriber that fails or panics is logged and skipped; the
//! emitter never sees the failure.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use mcp_protocol::{McpError, ToolResult};
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatState};
use crate::tools::ToolCall;

// ============================================================================
// Events
// ============================================================================

/// Kinds of observable occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Message,
    ToolCall,
    ToolResult,
    Error,
    StateChange,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Message,
        EventKind::ToolCall,
        EventKind::ToolResult,
        EventKind::Error,
        EventKind::StateChange,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Message => "message",
            EventKind::ToolCall => "toolCall",
            EventKind::ToolResult => "toolResult",
            EventKind::Error => "error",
            EventKind::StateChange => "stateChange",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payloads, one variant per [`EventKind`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ChatEvent {
    /// A message was appended to the transcript
    Message(ChatMessage),
    /// A tool call passed validation and is about to run
    ToolCall(ToolCall),
    /// A tool handler completed
    ToolResult(ToolResult),
    /// A lookup, validation or execution failure
    Error(McpError),
    /// Session state snapshot after a change
    StateChange(ChatState),
}

impl ChatEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ChatEvent::Message(_) => EventKind::Message,
            ChatEvent::ToolCall(_) => EventKind::ToolCall,
            ChatEvent::ToolResult(_) => EventKind::ToolResult,
            ChatEvent::Error(_) => EventKind::Error,
            ChatEvent::StateChange(_) => EventKind::StateChange,
        }
    }
}

// ============================================================================
// Subscribers
// ============================================================================

type SubscriberFn = dyn Fn(&ChatEvent) -> anyhow::Result<()> + Send + Sync;

/// Handle to an event callback
///
/// Clones share identity, so subscribing a clone of an already subscribed
/// handle is a no-op and either clone can be used to unsubscribe.
#[derive(Clone)]
pub struct Subscriber {
    callback: Arc<SubscriberFn>,
}

impl Subscriber {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&ChatEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Whether both handles refer to the same callback
    pub fn same(&self, other: &Subscriber) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.callback) as *const (),
            Arc::as_ptr(&other.callback) as *const (),
        )
    }

    fn call(&self, event: &ChatEvent) -> anyhow::Result<()> {
        (self.callback)(event)
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("ptr", &(Arc::as_ptr(&self.callback) as *const ()))
            .finish()
    }
}

// ============================================================================
// Bus
// ============================================================================

/// Publish/subscribe over the fixed [`EventKind`] vocabulary
#[derive(Debug, Clone)]
pub struct EventBus {
    listeners: HashMap<EventKind, Vec<Subscriber>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let listeners = EventKind::ALL
            .iter()
            .map(|kind| (*kind, Vec::new()))
            .collect();
        Self { listeners }
    }

    /// Subscribe to a kind; already subscribed handles are ignored
    pub fn on(&mut self, kind: EventKind, subscriber: &Subscriber) {
        let set = self.listeners.entry(kind).or_default();
        if !set.iter().any(|s| s.same(subscriber)) {
            set.push(subscriber.clone());
        }
    }

    /// Unsubscribe; unknown handles are ignored
    pub fn off(&mut self, kind: EventKind, subscriber: &Subscriber) {
        if let Some(set) = self.listeners.get_mut(&kind) {
            set.retain(|s| !s.same(subscriber));
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Drop every subscriber, keeping the per-kind sets
    pub fn clear(&mut self) {
        for set in self.listeners.values_mut() {
            set.clear();
        }
    }

    /// Deliver an event to every subscriber of its kind
    pub fn emit(&self, event: &ChatEvent) {
        let kind = event.kind();
        let Some(set) = self.listeners.get(&kind) else {
            return;
        };

        for subscriber in set {
            match catch_unwind(AssertUnwindSafe(|| subscriber.call(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!(event = %kind, "Error in event handler: {:#}", e);
                }
                Err(panic) => {
                    tracing::error!(
                        event = %kind,
                        "Event handler panicked: {}",
                        panic_message(panic.as_ref())
                    );
                }
            }
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
