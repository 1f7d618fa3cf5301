//! Telegram update handlers.
//!
//! Updates are converted into platform-neutral `IncomingMessage`s; every
//! decision after that belongs to the core router.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use crb_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::{ChatKind, IncomingMessage},
    router::RelayHandler,
};

pub async fn handle_message(msg: Message, relay: Arc<dyn RelayHandler>) -> ResponseResult<()> {
    if let Some(incoming) = to_incoming(&msg) {
        relay.on_message(incoming).await;
    }
    Ok(())
}

/// Text messages with a known sender; everything else (media, service
/// messages, anonymous admins) is dropped.
pub fn to_incoming(msg: &Message) -> Option<IncomingMessage> {
    let user = msg.from()?;
    let text = msg.text()?;

    let chat_kind = if msg.chat.is_private() {
        ChatKind::Direct
    } else {
        ChatKind::Shared
    };

    Some(IncomingMessage {
        message: MessageRef {
            chat_id: ChatId(msg.chat.id.0),
            message_id: MessageId(msg.id.0),
        },
        chat_kind,
        author_id: UserId(user.id.0 as i64),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: serde_json::Value) -> Message {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn private_text_is_direct() {
        let msg = parse(json!({
            "message_id": 42,
            "date": 1700000000,
            "chat": {"id": 7, "type": "private", "first_name": "Ann", "username": "ann"},
            "from": {"id": 7, "is_bot": false, "first_name": "Ann", "username": "ann"},
            "text": "hello"
        }));

        let incoming = to_incoming(&msg).unwrap();
        assert_eq!(incoming.chat_kind, ChatKind::Direct);
        assert_eq!(incoming.chat_id(), ChatId(7));
        assert_eq!(incoming.message.message_id, MessageId(42));
        assert_eq!(incoming.author_id, UserId(7));
        assert_eq!(incoming.text, "hello");
    }

    #[test]
    fn group_text_is_shared() {
        let msg = parse(json!({
            "message_id": 5,
            "date": 1700000000,
            "chat": {"id": -4001, "type": "group", "title": "Relay"},
            "from": {"id": 8, "is_bot": false, "first_name": "Bo"},
            "text": "/start"
        }));

        let incoming = to_incoming(&msg).unwrap();
        assert_eq!(incoming.chat_kind, ChatKind::Shared);
        assert_eq!(incoming.chat_id(), ChatId(-4001));
        assert_eq!(incoming.author_id, UserId(8));
        assert_eq!(incoming.text, "/start");
    }
}
