use std::{sync::Arc, time::Duration};

use tokio::{sync::oneshot, task::JoinHandle, time::Instant};

use crate::{domain::ChatId, messaging::port::MessagingPort};

/// Telegram drops the indicator after ~5s; refresh a bit earlier.
const REFRESH_EVERY: Duration = Duration::from_secs(4);

/// Keeps the "typing..." indicator alive until stopped or dropped.
pub struct TypingIndicator {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TypingIndicator {
    /// Show the indicator once right away, then refresh it in the background.
    pub async fn start(messenger: Arc<dyn MessagingPort>, chat_id: ChatId) -> Self {
        refresh(messenger.as_ref(), chat_id).await;

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut tick = tokio::time::interval_at(Instant::now() + REFRESH_EVERY, REFRESH_EVERY);
            loop {
                tokio::select! {
                    _ = tick.tick() => refresh(messenger.as_ref(), chat_id).await,
                    _ = &mut stop_rx => break,
                }
            }
        });

        Self {
            stop_tx: Some(stop_tx),
            task: Some(task),
        }
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

async fn refresh(messenger: &dyn MessagingPort, chat_id: ChatId) {
    if let Err(e) = messenger.send_typing(chat_id).await {
        tracing::debug!(chat = chat_id.0, "typing indicator failed: {e}");
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
