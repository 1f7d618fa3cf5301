//! Inbound event routing.
//!
//! Every platform event lands in [`MessageRouter`], which decides whether it is
//! noise, a command, or a chat turn, and drives the conversation store and the
//! model accordingly.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    activation::ActivationRegistry,
    config::{Config, Persona},
    conversation::{ConversationStore, Turn},
    domain::MessageRef,
    errors::CommandError,
    formatting::split_message,
    messaging::{
        port::MessagingPort,
        types::{ChatKind, CommandInfo, IncomingMessage, ReadyInfo},
        typing::TypingIndicator,
    },
    model::{ChatModel, ChatRequest},
    Result,
};

pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "start",
        usage: "",
        description: "Start a chat session in the current channel",
    },
    CommandInfo {
        name: "stop",
        usage: "",
        description: "Stop responding in the current channel",
    },
    CommandInfo {
        name: "chat",
        usage: "<message>",
        description: "Chat with the bot without starting a session",
    },
    CommandInfo {
        name: "clear",
        usage: "",
        description: "Clear your chat history in the current channel",
    },
    CommandInfo {
        name: "help",
        usage: "",
        description: "Show this message",
    },
];

const SESSION_STARTED: &str =
    "Chat session started in this channel! Just talk normally and I'll respond.";
const SESSION_ENDED: &str =
    "Chat session ended. I'll no longer respond to messages in this channel unless you use commands.";
const NO_ACTIVE_SESSION: &str = "There's no active chat session in this channel.";
const HISTORY_CLEARED: &str = "Your chat history has been cleared.";
const NOTHING_TO_CLEAR: &str = "You don't have any chat history to clear.";

/// Platform event interface, registered once with the messaging adapter.
#[async_trait]
pub trait RelayHandler: Send + Sync {
    async fn on_ready(&self, ready: ReadyInfo);

    async fn on_message(&self, msg: IncomingMessage);

    async fn on_command(
        &self,
        name: &str,
        args: &str,
        ctx: &IncomingMessage,
    ) -> std::result::Result<(), CommandError>;

    async fn on_command_error(&self, ctx: &IncomingMessage, err: CommandError);
}

/// A command line split into its parts: `/name@target args`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub target: Option<String>,
    pub args: String,
}

/// Parse `text` as a command if it starts with `prefix`.
pub fn parse_command(text: &str, prefix: &str) -> Option<ParsedCommand> {
    let body = text.strip_prefix(prefix)?;

    let mut parts = body.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim().to_string();

    let (name, target) = match head.split_once('@') {
        Some((name, target)) => (name, Some(target.to_string())),
        None => (head, None),
    };

    Some(ParsedCommand {
        name: name.to_lowercase(),
        target,
        args,
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Route {
    Ignore(&'static str),
    Command(ParsedCommand),
    Chat,
}

pub struct MessageRouter {
    persona: Persona,
    command_prefix: String,
    presence: String,
    conversations: Arc<ConversationStore>,
    channels: Arc<ActivationRegistry>,
    model: Arc<dyn ChatModel>,
    messenger: Arc<dyn MessagingPort>,
    me: RwLock<Option<ReadyInfo>>,
}

impl MessageRouter {
    pub fn new(
        cfg: &Config,
        conversations: Arc<ConversationStore>,
        channels: Arc<ActivationRegistry>,
        model: Arc<dyn ChatModel>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            persona: cfg.persona.clone(),
            command_prefix: cfg.command_prefix.clone(),
            presence: cfg.presence.clone(),
            conversations,
            channels,
            model,
            messenger,
            me: RwLock::new(None),
        }
    }

    pub fn conversations(&self) -> &Arc<ConversationStore> {
        &self.conversations
    }

    pub fn channels(&self) -> &Arc<ActivationRegistry> {
        &self.channels
    }

    async fn classify(&self, msg: &IncomingMessage) -> Route {
        let me = self.me.read().await;

        if me.as_ref().is_some_and(|me| me.user_id == msg.author_id) {
            return Route::Ignore("self-authored");
        }

        if let Some(cmd) = parse_command(&msg.text, &self.command_prefix) {
            let addressed_elsewhere = match (&cmd.target, me.as_ref()) {
                (Some(target), Some(me)) => !target.eq_ignore_ascii_case(&me.username),
                _ => false,
            };
            if addressed_elsewhere {
                return Route::Ignore("command for another bot");
            }
            return Route::Command(cmd);
        }

        if msg.chat_kind == ChatKind::Direct || self.channels.is_active(msg.chat_id()).await {
            Route::Chat
        } else {
            Route::Ignore("inactive chat")
        }
    }

    /// One round-trip: record the user turn, ask the model, record and send
    /// the bot turn.
    async fn relay(&self, msg: &IncomingMessage, text: &str) -> Result<()> {
        let key = msg.conversation_key();
        self.conversations
            .append(key, Turn::new(&self.persona.user_name, text))
            .await;

        let req = ChatRequest {
            prompt: self.persona.prompt.clone(),
            bot_name: self.persona.bot_name.clone(),
            user_name: self.persona.user_name.clone(),
            chat_history: self.conversations.history(key).await,
        };
        tracing::info!(
            conversation = %key,
            turns = req.chat_history.len(),
            "relaying message"
        );

        let typing = TypingIndicator::start(self.messenger.clone(), msg.chat_id()).await;
        let reply = self.model.get_reply(&req).await;
        typing.stop().await;

        self.conversations
            .append(key, Turn::new(&self.persona.bot_name, reply.clone()))
            .await;

        self.reply_text(msg.message, &reply).await
    }

    /// Reply with `text`, split to the platform limit. The first chunk quotes
    /// the original message; the rest follow as plain sends.
    async fn reply_text(&self, to: MessageRef, text: &str) -> Result<()> {
        let limit = self.messenger.capabilities().max_message_len;
        let chunks = split_message(text, limit);
        if chunks.is_empty() {
            tracing::warn!(chat = to.chat_id.0, "model reply is empty; nothing sent");
            return Ok(());
        }

        for (idx, chunk) in chunks.iter().enumerate() {
            if idx == 0 {
                self.messenger.reply(to, chunk).await?;
            } else {
                self.messenger.send(to.chat_id, chunk).await?;
            }
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        let mut out = String::from("Commands:");
        for cmd in COMMANDS {
            out.push('\n');
            out.push_str(&self.command_prefix);
            out.push_str(cmd.name);
            if !cmd.usage.is_empty() {
                out.push(' ');
                out.push_str(cmd.usage);
            }
            out.push_str(" - ");
            out.push_str(cmd.description);
        }
        out
    }
}

#[async_trait]
impl RelayHandler for MessageRouter {
    async fn on_ready(&self, ready: ReadyInfo) {
        tracing::info!("Logged in as {} ({})", ready.username, ready.user_id.0);
        *self.me.write().await = Some(ready);

        let caps = self.messenger.capabilities();
        if caps.supports_presence {
            if let Err(e) = self.messenger.set_presence(&self.presence).await {
                tracing::warn!("failed to set presence: {e}");
            }
        }
        if caps.supports_command_menu {
            if let Err(e) = self.messenger.register_commands(COMMANDS).await {
                tracing::warn!("failed to register command menu: {e}");
            }
        }
    }

    async fn on_message(&self, msg: IncomingMessage) {
        match self.classify(&msg).await {
            Route::Ignore(reason) => {
                tracing::trace!(chat = msg.chat_id().0, reason, "ignoring message");
            }
            Route::Command(cmd) => {
                if let Err(err) = self.on_command(&cmd.name, &cmd.args, &msg).await {
                    self.on_command_error(&msg, err).await;
                }
            }
            Route::Chat => {
                if let Err(e) = self.relay(&msg, &msg.text).await {
                    tracing::error!(chat = msg.chat_id().0, "failed to deliver reply: {e}");
                }
            }
        }
    }

    async fn on_command(
        &self,
        name: &str,
        args: &str,
        ctx: &IncomingMessage,
    ) -> std::result::Result<(), CommandError> {
        let chat_id = ctx.chat_id();
        match name {
            "start" => {
                self.channels.activate(chat_id).await;
                tracing::info!(chat = chat_id.0, "chat session started");
                self.messenger.send(chat_id, SESSION_STARTED).await?;
            }
            "stop" => {
                if self.channels.deactivate(chat_id).await {
                    tracing::info!(chat = chat_id.0, "chat session ended");
                    self.messenger.send(chat_id, SESSION_ENDED).await?;
                } else {
                    self.messenger.send(chat_id, NO_ACTIVE_SESSION).await?;
                }
            }
            "chat" => {
                let text = args.trim();
                if text.is_empty() {
                    return Err(CommandError::MissingArgument("message"));
                }
                self.relay(ctx, text).await?;
            }
            "clear" => {
                let key = ctx.conversation_key();
                let text = if self.conversations.clear(key).await {
                    tracing::info!(conversation = %key, "history cleared");
                    HISTORY_CLEARED
                } else {
                    NOTHING_TO_CLEAR
                };
                self.messenger.reply(ctx.message, text).await?;
            }
            "help" => {
                self.messenger.reply(ctx.message, &self.help_text()).await?;
            }
            other => return Err(CommandError::NotFound(other.to_string())),
        }
        Ok(())
    }

    async fn on_command_error(&self, ctx: &IncomingMessage, err: CommandError) {
        if let CommandError::NotFound(name) = &err {
            tracing::debug!(command = %name, "ignoring unknown command");
            return;
        }

        tracing::warn!(chat = ctx.chat_id().0, "command failed: {err}");
        let text = format!("An error occurred: {err}");
        if let Err(e) = self.messenger.reply(ctx.message, &text).await {
            tracing::error!(chat = ctx.chat_id().0, "failed to report command error: {e}");
        }
    }
}
