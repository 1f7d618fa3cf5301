use std::sync::Arc;

use anyhow::Context as _;
use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use crb_core::{
    activation::ActivationRegistry,
    config::Config,
    conversation::ConversationStore,
    domain::UserId,
    messaging::{port::MessagingPort, types::ReadyInfo},
    model::ChatModel,
    router::{MessageRouter, RelayHandler},
};

use crate::handlers;
use crate::TelegramMessenger;

/// Connect to Telegram, announce readiness to the router, then long-poll until
/// the process is stopped.
pub async fn run_polling(
    cfg: Arc<Config>,
    model: Arc<dyn ChatModel>,
    conversations: Arc<ConversationStore>,
    channels: Arc<ActivationRegistry>,
) -> anyhow::Result<()> {
    let token = cfg.telegram_bot_token()?;
    let bot = Bot::new(token);

    let me = bot
        .get_me()
        .await
        .context("failed to reach Telegram (is TELEGRAM_BOT_TOKEN valid?)")?;

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let relay: Arc<dyn RelayHandler> = Arc::new(MessageRouter::new(
        &cfg,
        conversations,
        channels,
        model,
        messenger,
    ));

    relay
        .on_ready(ReadyInfo {
            user_id: UserId(me.id.0 as i64),
            username: me.username().to_string(),
        })
        .await;

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![relay])
        .build()
        .dispatch()
        .await;

    Ok(())
}
