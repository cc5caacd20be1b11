//! Telegram Update Poller - Long-poll Loop
//!
//! Pulls updates with `getUpdates`, converts each one into an
//! `Incoming` event and hands it to the conversation handler. Updates
//! are processed one at a time, in order. A failed poll is logged and
//! retried after a fixed backoff.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use super::client::TelegramClient;
use super::types::Update;
use crate::domain::subscription::MenuAction;
use crate::ports::alert_store::AlertStore;
use crate::ports::messenger::{Incoming, Messenger};
use crate::usecases::conversation::ConversationHandler;

/// Convert a raw update into a conversation event.
///
/// Returns `None` for updates the bot does not react to (edited
/// messages, stickers, unknown callback data).
pub fn to_incoming(update: Update) -> Option<Incoming> {
  if let Some(query) = update.callback_query {
    let Some(action) = query.data.as_deref().and_then(MenuAction::from_callback_data) else {
      debug!(data = ?query.data, "Ignoring unknown callback data");
      return None;
    };
    let chat = query.message.map_or(query.from.id, |m| m.chat.id);
    return Some(Incoming::Action {
      user: query.from.id,
      chat,
      action,
      callback_id: query.id,
    });
  }

  let message = update.message?;
  let user = message.from.map_or(message.chat.id, |u| u.id);
  let chat = message.chat.id;
  let text = message.text?;

  if is_start_command(&text) {
    Some(Incoming::Start { user, chat })
  } else {
    Some(Incoming::Text { user, chat, text })
  }
}

/// `/start`, `/start payload` and `/start@botname`.
fn is_start_command(text: &str) -> bool {
  text
    .split_whitespace()
    .next()
    .and_then(|command| command.split('@').next())
    .is_some_and(|command| command == "/start")
}

/// Long-poll loop feeding the conversation handler.
pub struct UpdatePoller {
  /// Bot API client.
  client: Arc<TelegramClient>,
  /// Pause after a failed poll.
  error_backoff: Duration,
}

impl UpdatePoller {
  /// Create a new poller.
  pub fn new(client: Arc<TelegramClient>, error_backoff: Duration) -> Self {
    Self {
      client,
      error_backoff,
    }
  }

  /// Poll until shutdown.
  #[instrument(skip_all, name = "update_poller")]
  pub async fn run<S: AlertStore, M: Messenger>(
    &self,
    handler: &ConversationHandler<S, M>,
    mut shutdown_rx: broadcast::Receiver<()>,
  ) -> Result<()> {
    info!("Telegram update poller started");
    let mut offset = 0_i64;

    loop {
      let polled = tokio::select! {
        biased;
        _ = shutdown_rx.recv() => {
          info!("Update poller shutting down");
          return Ok(());
        }
        polled = self.client.get_updates(offset) => polled,
      };

      match polled {
        Ok(updates) => {
          for update in updates {
            offset = offset.max(update.update_id + 1);
            if let Some(incoming) = to_incoming(update) {
              handler.handle(incoming).await;
            }
          }
        }
        Err(e) => {
          warn!(error = %format!("{e:#}"), "getUpdates failed, backing off");
          tokio::select! {
            biased;
            _ = shutdown_rx.recv() => return Ok(()),
            () = tokio::time::sleep(self.error_backoff) => {}
          }
        }
      }
    }
  }
}
