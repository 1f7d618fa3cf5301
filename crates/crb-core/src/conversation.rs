use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::ConversationKey;

/// One message in a conversation, labelled with the identity that said it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub sender: String,
    pub message: String,
}

impl Turn {
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
        }
    }
}

/// In-memory conversation histories, keyed per chat + user.
///
/// Histories live for the process lifetime: no eviction, no size cap. The lock
/// is only held for single operations, never across a remote call.
#[derive(Debug, Default)]
pub struct ConversationStore {
    histories: Mutex<HashMap<ConversationKey, Vec<Turn>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the history for `key`; empty for an unseen key.
    ///
    /// Reading never creates an entry.
    pub async fn history(&self, key: ConversationKey) -> Vec<Turn> {
        self.histories
            .lock()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    /// Append `turn` at the tail, creating the history on first use.
    pub async fn append(&self, key: ConversationKey, turn: Turn) {
        self.histories
            .lock()
            .await
            .entry(key)
            .or_default()
            .push(turn);
    }

    /// Reset the history for `key` and report whether one existed.
    ///
    /// A cleared history stays registered (empty); an unseen key is left
    /// untouched.
    pub async fn clear(&self, key: ConversationKey) -> bool {
        match self.histories.lock().await.get_mut(&key) {
            Some(turns) => {
                turns.clear();
                true
            }
            None => false,
        }
    }

    pub async fn contains(&self, key: ConversationKey) -> bool {
        self.histories.lock().await.contains_key(&key)
    }

    /// Number of known conversations.
    pub async fn len(&self) -> usize {
        self.histories.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.histories.lock().await.is_empty()
    }
}
