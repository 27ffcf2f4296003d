//! Per-user interaction state

use nexora_core::{ChatMessage, Recommendation};

/// One user's conversation with the assistant
///
/// Holds at most one recommendation awaiting accept or dismiss, plus the
/// chat history. Owned by the caller; the engine only mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user_id: String,
    pub(crate) pending: Option<Recommendation>,
    pub(crate) history: Vec<ChatMessage>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            pending: None,
            history: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The recommendation on screen, if any
    pub fn pending(&self) -> Option<&Recommendation> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }
}
