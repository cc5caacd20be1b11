//! Conversation Use Case - Bot Command Handling
//!
//! Applies chat events to the alert store and answers with localized
//! menus. Flow:
//! 1. `/start` shows the welcome text and the language picker
//! 2. Picking a language stores it and opens the main menu
//! 3. "Create alert" arms threshold input; the next text message is
//!    parsed as the threshold
//! 4. "View alert" / "Delete alert" read or clear the threshold
//!
//! Storage and reply failures are logged; the in-memory state change is
//! kept and the conversation carries on.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::subscription::{ChatId, Language, MenuAction, UserId, parse_threshold};
use crate::domain::texts::Texts;
use crate::ports::alert_store::AlertStore;
use crate::ports::messenger::{Button, Incoming, Messenger, OutgoingMessage};

/// Routes incoming chat events.
pub struct ConversationHandler<S: AlertStore, M: Messenger> {
  store: Arc<S>,
  messenger: Arc<M>,
}

impl<S: AlertStore, M: Messenger> ConversationHandler<S, M> {
  /// Create a new handler.
  pub fn new(store: Arc<S>, messenger: Arc<M>) -> Self {
    Self { store, messenger }
  }

  /// Handle one event.
  #[instrument(skip(self))]
  pub async fn handle(&self, incoming: Incoming) {
    match incoming {
      Incoming::Start { chat, .. } => self.welcome(chat).await,
      Incoming::Action {
        user,
        chat,
        action,
        callback_id,
      } => {
        if let Err(e) = self.messenger.acknowledge(&callback_id).await {
          debug!(error = %e, "Failed to answer callback query");
        }
        self.on_action(user, chat, action).await;
      }
      Incoming::Text { user, chat, text } => self.on_text(user, chat, &text).await,
    }
  }

  async fn on_action(&self, user: UserId, chat: ChatId, action: MenuAction) {
    match action {
      MenuAction::SelectLanguage(language) => {
        log_storage(self.store.set_language(user, language).await);
        let texts = Texts::for_language(language);
        self.reply(chat, OutgoingMessage::text(texts.language_selected)).await;
        self.reply(chat, main_menu(texts)).await;
      }
      MenuAction::CreateAlert => {
        let language = self.language(user).await;
        log_storage(self.store.begin_threshold_input(user, language).await);
        let texts = Texts::for_language(language);
        self.reply(chat, OutgoingMessage::text(texts.enter_amount)).await;
      }
      MenuAction::ViewAlert => {
        let subscription = self.store.get(user).await;
        let language = subscription.as_ref().map(|s| s.language).unwrap_or_default();
        let texts = Texts::for_language(language);
        let text = match subscription.and_then(|s| s.threshold) {
          Some(threshold) => format!("{}{}", texts.current_alert_prefix, threshold.normalize()),
          None => texts.no_alert.to_string(),
        };
        self.reply(chat, with_back_button(text, texts)).await;
      }
      MenuAction::DeleteAlert => {
        let language = self.language(user).await;
        log_storage(self.store.clear_threshold(user).await);
        let texts = Texts::for_language(language);
        self.reply(chat, with_back_button(texts.alert_deleted, texts)).await;
      }
      MenuAction::BackToMenu => {
        let language = self.language(user).await;
        self.reply(chat, main_menu(Texts::for_language(language))).await;
      }
    }
  }

  async fn on_text(&self, user: UserId, chat: ChatId, text: &str) {
    let Some(subscription) = self.store.get(user).await else {
      debug!(user, "Ignoring text from unknown user");
      return;
    };
    if !subscription.awaiting_input {
      debug!(user, "Ignoring text outside threshold input");
      return;
    }

    let texts = Texts::for_language(subscription.language);
    match parse_threshold(text) {
      Ok(threshold) => {
        log_storage(self.store.set_threshold(user, threshold).await);
        info!(user, %threshold, "Alert created");
        self.reply(chat, with_back_button(texts.alert_created, texts)).await;
      }
      Err(e) => {
        debug!(user, error = %e, "Rejected threshold input");
        self.reply(chat, OutgoingMessage::text(texts.invalid_amount)).await;
      }
    }
  }

  async fn welcome(&self, chat: ChatId) {
    let texts = Texts::for_language(Language::Russian);
    let picker = [Language::Russian, Language::English]
      .into_iter()
      .map(|l| Button::new(Texts::language_name(l), MenuAction::SelectLanguage(l)))
      .collect();
    self
      .reply(chat, OutgoingMessage::text(texts.welcome).with_row(picker))
      .await;
  }

  async fn language(&self, user: UserId) -> Language {
    self
      .store
      .get(user)
      .await
      .map(|s| s.language)
      .unwrap_or_default()
  }

  async fn reply(&self, chat: ChatId, message: OutgoingMessage) {
    if let Err(e) = self.messenger.send(chat, &message).await {
      warn!(chat, error = %format!("{e:#}"), "Failed to send reply");
    }
  }
}

/// Main menu: one button per row.
fn main_menu(texts: &Texts) -> OutgoingMessage {
  OutgoingMessage::text(texts.main_menu)
    .with_row(vec![Button::new(texts.create_alert, MenuAction::CreateAlert)])
    .with_row(vec![Button::new(texts.view_alert, MenuAction::ViewAlert)])
    .with_row(vec![Button::new(texts.delete_alert, MenuAction::DeleteAlert)])
}

fn with_back_button(text: impl Into<String>, texts: &Texts) -> OutgoingMessage {
  OutgoingMessage::text(text).with_row(vec![Button::new(
    texts.back_to_menu,
    MenuAction::BackToMenu,
  )])
}

fn log_storage(result: anyhow::Result<()>) {
  if let Err(e) = result {
    warn!(error = %format!("{e:#}"), "Subscription change not persisted");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_main_menu_layout() {
    let menu = main_menu(Texts::for_language(Language::English));
    assert_eq!(menu.text, "Main menu. Choose an action:");
    assert_eq!(menu.keyboard.len(), 3);
    assert_eq!(menu.keyboard[0][0].action, MenuAction::CreateAlert);
    assert_eq!(menu.keyboard[2][0].action, MenuAction::DeleteAlert);
  }
}
