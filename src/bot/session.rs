//! Per-chat ephemeral session state
//!
//! The only per-chat state the bot keeps is a greeted flag. It lives in
//! memory for the lifetime of the process; a restart clears every flag,
//! which is acceptable because the greeting is a courtesy, not a
//! correctness requirement.

use std::collections::HashMap;
use teloxide::types::ChatId;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct ChatSession {
    greeted: bool,
}

/// In-memory store of per-chat sessions, keyed by chat id.
///
/// Owned by the dispatcher and injected into handlers; not a global.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<ChatId, ChatSession>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this chat has already been greeted.
    pub async fn is_greeted(&self, chat: ChatId) -> bool {
        self.sessions
            .lock()
            .await
            .get(&chat)
            .is_some_and(|s| s.greeted)
    }

    /// Marks the chat as greeted. The flag only ever moves to `true`;
    /// there is no reset.
    pub async fn mark_greeted(&self, chat: ChatId) {
        self.sessions.lock().await.entry(chat).or_default().greeted = true;
    }
}
