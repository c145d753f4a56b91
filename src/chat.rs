use std::sync::Arc;

use crate::storage::BlobStore;
use crate::types::ChatMessage;

/// Storage key for the serialized assistant transcript.
pub const CHAT_KEY: &str = "agri_yield_chat_history";

/// Persisted assistant conversation.
///
/// Same degradation policy as the prediction history: storage trouble is
/// logged, never surfaced, and the conversation carries on in memory.
#[derive(Clone)]
pub struct ChatTranscript {
    store: Arc<dyn BlobStore>,
}

impl ChatTranscript {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Messages in send order, oldest first. Missing or corrupt storage
    /// reads as an empty transcript.
    pub fn load(&self) -> Vec<ChatMessage> {
        match self.store.get(CHAT_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(messages) => messages,
                Err(e) => {
                    log::warn!("stored chat transcript is unreadable: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("failed to read chat transcript: {e}");
                Vec::new()
            }
        }
    }

    /// Replaces the stored transcript with the given messages.
    pub fn save(&self, messages: &[ChatMessage]) {
        match serde_json::to_string(messages) {
            Ok(serialized) => {
                if let Err(e) = self.store.set(CHAT_KEY, &serialized) {
                    log::warn!("failed to persist chat transcript: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize chat transcript: {e}"),
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(CHAT_KEY) {
            log::warn!("failed to clear chat transcript: {e}");
        }
    }
}
