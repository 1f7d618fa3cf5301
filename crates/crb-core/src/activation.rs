use std::collections::HashSet;

use tokio::sync::RwLock;

use crate::domain::ChatId;

/// Chats where plain (non-command) messages are relayed to the model.
///
/// Empty at start; only the `start`/`stop` commands mutate it.
#[derive(Debug, Default)]
pub struct ActivationRegistry {
    active: RwLock<HashSet<ChatId>>,
}

impl ActivationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent. Returns true if the chat was not active before.
    pub async fn activate(&self, chat_id: ChatId) -> bool {
        self.active.write().await.insert(chat_id)
    }

    /// Returns whether the chat was active.
    pub async fn deactivate(&self, chat_id: ChatId) -> bool {
        self.active.write().await.remove(&chat_id)
    }

    pub async fn is_active(&self, chat_id: ChatId) -> bool {
        self.active.read().await.contains(&chat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let reg = ActivationRegistry::new();
        assert!(!reg.is_active(ChatId(1)).await);
    }

    #[tokio::test]
    async fn activation_is_idempotent() {
        let reg = ActivationRegistry::new();
        assert!(reg.activate(ChatId(1)).await);
        assert!(!reg.activate(ChatId(1)).await);
        assert!(reg.is_active(ChatId(1)).await);

        assert!(reg.deactivate(ChatId(1)).await);
        assert!(!reg.is_active(ChatId(1)).await);
    }

    #[tokio::test]
    async fn deactivating_unknown_chat_changes_nothing() {
        let reg = ActivationRegistry::new();
        reg.activate(ChatId(2)).await;

        assert!(!reg.deactivate(ChatId(1)).await);
        assert!(!reg.is_active(ChatId(1)).await);
        assert!(reg.is_active(ChatId(2)).await);
    }
}
