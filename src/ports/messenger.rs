//! Messenger Port - Outgoing Chat Interface
//!
//! The usecases layer builds `OutgoingMessage`s from domain types;
//! adapters translate them into the chat platform's wire format and
//! turn platform updates into `Incoming` events.

use async_trait::async_trait;

use crate::domain::subscription::{ChatId, MenuAction, UserId};

/// One inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
  /// Visible label.
  pub label: String,
  /// Action sent back when pressed.
  pub action: MenuAction,
}

impl Button {
  pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
    Self {
      label: label.into(),
      action,
    }
  }
}

/// A text message with an optional inline keyboard (rows of buttons).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
  pub text: String,
  pub keyboard: Vec<Vec<Button>>,
}

impl OutgoingMessage {
  /// Plain text, no keyboard.
  pub fn text(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      keyboard: Vec::new(),
    }
  }

  /// Append a row of buttons.
  #[must_use]
  pub fn with_row(mut self, row: Vec<Button>) -> Self {
    self.keyboard.push(row);
    self
  }
}

/// An event received from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
  /// `/start` command.
  Start { user: UserId, chat: ChatId },
  /// Inline keyboard button press.
  Action {
    user: UserId,
    chat: ChatId,
    action: MenuAction,
    callback_id: String,
  },
  /// Any other text message.
  Text {
    user: UserId,
    chat: ChatId,
    text: String,
  },
}

/// Trait for chat transports.
#[async_trait]
pub trait Messenger: Send + Sync + 'static {
  /// Send a message to a chat (a subscriber's private chat for alerts).
  async fn send(&self, chat: ChatId, message: &OutgoingMessage) -> anyhow::Result<()>;

  /// Acknowledge a button press so the client stops its spinner.
  async fn acknowledge(&self, callback_id: &str) -> anyhow::Result<()>;
}
