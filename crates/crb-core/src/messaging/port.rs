use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{CommandInfo, MessagingCapabilities},
    Result,
};

/// Cross-messenger outbound port.
///
/// Text is sent as plain text; the model output is never interpreted as markup.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    /// Post `text` into a chat.
    async fn send(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    /// Post `text` into the chat of `to`, quoting that message.
    async fn reply(&self, to: MessageRef, text: &str) -> Result<MessageRef>;

    /// Show the "typing..." indicator. Platforms expire it after a few seconds.
    async fn send_typing(&self, chat_id: ChatId) -> Result<()>;

    async fn set_presence(&self, activity: &str) -> Result<()>;

    async fn register_commands(&self, commands: &[CommandInfo]) -> Result<()>;
}
