//! Telegram transport
//!
//! Feeds incoming text messages into a [`PlaylistBot`] and sends its replies
//! back to the chat they came from. One chat is one user.

use crate::delivery::MessageSink;
use crate::error::{Error, Result};
use crate::service::PlaylistBot;
use crate::types::UserId;
use async_trait::async_trait;
use teloxide::prelude::*;

/// [`MessageSink`] that posts plain-text messages to Telegram chats
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    /// Wrap a Telegram API client
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    async fn send(&self, user: UserId, text: String) -> Result<()> {
        self.bot
            .send_message(ChatId(user.get()), text)
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(())
    }
}

async fn handle_update(msg: Message, service: PlaylistBot) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let user = UserId(msg.chat.id.0);

    // Replies already went out (or failed) through the sink; nothing to retry here
    if let Err(e) = service.handle_message(user, text).await {
        tracing::warn!(user = %user, error = %e, "message handling failed");
    }
    Ok(())
}

/// Poll Telegram for updates until a termination signal arrives
///
/// Updates from one chat are handled one at a time in arrival order, which
/// keeps each user's replies ordered. Different chats run concurrently.
pub async fn run(bot: Bot, service: PlaylistBot) {
    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_update));

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service])
        .build();

    let token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        crate::shutdown_signal().await;
        match token.shutdown() {
            Ok(done) => done.await,
            Err(e) => tracing::debug!(error = %e, "dispatcher was not running"),
        }
    });

    tracing::info!("polling Telegram for updates");
    dispatcher.dispatch().await;
    tracing::info!("dispatcher stopped");
}
