use crate::domain::{ChatId, ConversationKey, MessageRef, UserId};

/// Kind of chat a message arrived in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatKind {
    /// One-to-one chat with the bot. Always relayed.
    Direct,
    /// Group, supergroup or channel. Relayed only while activated.
    Shared,
}

/// Cross-messenger incoming text message.
///
/// Telegram-specific fields live in the Telegram adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomingMessage {
    pub message: MessageRef,
    pub chat_kind: ChatKind,
    pub author_id: UserId,
    pub text: String,
}

impl IncomingMessage {
    pub fn chat_id(&self) -> ChatId {
        self.message.chat_id
    }

    pub fn conversation_key(&self) -> ConversationKey {
        ConversationKey::new(self.chat_id(), self.author_id)
    }
}

/// Identity of the bot account, known once the platform connection is up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadyInfo {
    pub user_id: UserId,
    pub username: String,
}

/// Entry of the command menu advertised to the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_presence: bool,
    pub supports_command_menu: bool,
    pub max_message_len: usize,
}
