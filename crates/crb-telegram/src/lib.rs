//! Telegram adapter (teloxide).
//!
//! This crate implements the `crb-core` MessagingPort over the Telegram Bot API
//! and feeds inbound updates to the core router.

use async_trait::async_trait;

use teloxide::{prelude::*, types::BotCommand};

pub mod handlers;
pub mod router;

use crb_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{CommandInfo, MessagingCapabilities},
    },
    Result,
};

/// Bot API hard limit for a text message.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }
}

/// Menu entries for `setMyCommands`.
pub fn bot_commands(commands: &[CommandInfo]) -> Vec<BotCommand> {
    commands
        .iter()
        .map(|c| BotCommand::new(c.name, c.description))
        .collect()
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            supports_presence: false,
            supports_command_menu: true,
            max_message_len: TELEGRAM_MESSAGE_LIMIT,
        }
    }

    async fn send(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .bot
            .send_message(Self::tg_chat(chat_id), text.to_string())
            .await
            .map_err(Self::map_err)?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn reply(&self, to: MessageRef, text: &str) -> Result<MessageRef> {
        let msg = self
            .bot
            .send_message(Self::tg_chat(to.chat_id), text.to_string())
            .reply_to_message_id(Self::tg_msg_id(to.message_id))
            .allow_sending_without_reply(true)
            .await
            .map_err(Self::map_err)?;

        Ok(MessageRef {
            chat_id: to.chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn send_typing(&self, chat_id: ChatId) -> Result<()> {
        self.bot
            .send_chat_action(Self::tg_chat(chat_id), teloxide::types::ChatAction::Typing)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn set_presence(&self, activity: &str) -> Result<()> {
        // Bots have no presence/activity status on Telegram.
        tracing::debug!(activity, "presence not supported on telegram");
        Ok(())
    }

    async fn register_commands(&self, commands: &[CommandInfo]) -> Result<()> {
        self.bot
            .set_my_commands(bot_commands(commands))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crb_core::router::COMMANDS;

    #[test]
    fn command_menu_mirrors_router_commands() {
        let menu = bot_commands(COMMANDS);
        let names: Vec<&str> = menu.iter().map(|c| c.command.as_str()).collect();
        assert_eq!(names, vec!["start", "stop", "chat", "clear", "help"]);
        assert!(menu
            .iter()
            .all(|c| !c.description.is_empty() && c.description.len() <= 256));
    }
}
