//! Telegram Bot API Request/Response Types
//!
//! Only the subset of the Bot API the bot uses: `getUpdates`,
//! `sendMessage` with inline keyboards, and `answerCallbackQuery`.

use serde::{Deserialize, Serialize};

/// Generic Bot API response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
  pub ok: bool,
  pub result: Option<T>,
  pub description: Option<String>,
  pub error_code: Option<i64>,
}

/// One incoming update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
  pub update_id: i64,
  pub message: Option<Message>,
  pub callback_query: Option<CallbackQuery>,
}

/// A chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
  pub message_id: i64,
  pub from: Option<User>,
  pub chat: Chat,
  pub text: Option<String>,
}

/// Message author.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
  pub id: i64,
}

/// Chat a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
  pub id: i64,
}

/// Inline button press.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
  pub id: String,
  pub from: User,
  /// Message the keyboard was attached to.
  pub message: Option<Message>,
  pub data: Option<String>,
}

/// `getUpdates` parameters.
#[derive(Debug, Clone, Serialize)]
pub struct GetUpdatesRequest {
  pub offset: i64,
  /// Long-poll timeout in seconds.
  pub timeout: u64,
  pub allowed_updates: Vec<&'static str>,
}

/// `sendMessage` parameters.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
  pub chat_id: i64,
  pub text: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reply_markup: Option<InlineKeyboardMarkup>,
}

/// Inline keyboard attached to a message.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
  pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// One callback button.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
  pub text: String,
  pub callback_data: &'static str,
}

/// `answerCallbackQuery` parameters.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerCallbackQueryRequest<'a> {
  pub callback_query_id: &'a str,
}
