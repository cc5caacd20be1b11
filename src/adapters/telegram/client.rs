//! Telegram Bot API Client - Rate-limited HTTP Client
//!
//! Wraps reqwest for the three Bot API methods the bot uses and
//! implements the `Messenger` port. Outgoing messages pass through a
//! governor rate limiter so an alert burst stays under Telegram's
//! per-bot limit.
//!
//! The bot token is part of every request URL, so reqwest errors are
//! stripped of their URL before they are returned or logged.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::types::{
  AnswerCallbackQueryRequest, ApiResponse, GetUpdatesRequest, InlineKeyboardButton,
  InlineKeyboardMarkup, SendMessageRequest, Update,
};
use crate::config::TelegramConfig;
use crate::domain::subscription::ChatId;
use crate::ports::messenger::{Messenger, OutgoingMessage};

/// Slack added on top of the long-poll timeout for the HTTP timeout.
const LONG_POLL_SLACK: Duration = Duration::from_secs(10);

/// Telegram Bot API client.
pub struct TelegramClient {
  /// Underlying HTTP client.
  http: Client,
  /// `{api_url}/bot{token}`; never logged.
  base_url: String,
  /// Long-poll timeout for getUpdates.
  long_poll_timeout: Duration,
  /// Outgoing message limiter.
  limiter: DefaultDirectRateLimiter,
}

impl TelegramClient {
  /// Create a new client for `token`.
  pub fn new(token: &str, config: &TelegramConfig) -> Result<Self> {
    let long_poll_timeout = Duration::from_secs(config.long_poll_timeout_seconds);

    let http = Client::builder()
      .timeout(long_poll_timeout + LONG_POLL_SLACK)
      .pool_max_idle_per_host(4)
      .build()
      .context("Failed to build HTTP client")?;

    let per_second = NonZeroU32::new(config.max_messages_per_second)
      .context("telegram.max_messages_per_second must be positive")?;

    Ok(Self {
      http,
      base_url: format!("{}/bot{}", config.api_url.trim_end_matches('/'), token),
      long_poll_timeout,
      limiter: RateLimiter::direct(Quota::per_second(per_second)),
    })
  }

  /// Call a Bot API method with a JSON body.
  async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
  where
    B: Serialize + Sync,
    T: DeserializeOwned,
  {
    let url = format!("{}/{method}", self.base_url);

    let response = self
      .http
      .post(&url)
      .json(body)
      .send()
      .await
      .map_err(|e| anyhow::Error::new(e.without_url()))
      .with_context(|| format!("Telegram {method} request failed"))?;

    let envelope: ApiResponse<T> = response
      .json()
      .await
      .map_err(|e| anyhow::Error::new(e.without_url()))
      .with_context(|| format!("Failed to decode Telegram {method} response"))?;

    unwrap_envelope(method, envelope)
  }

  /// Long-poll for updates starting at `offset`.
  #[instrument(skip(self))]
  pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
    let request = GetUpdatesRequest {
      offset,
      timeout: self.long_poll_timeout.as_secs(),
      allowed_updates: vec!["message", "callback_query"],
    };
    let updates: Vec<Update> = self.call("getUpdates", &request).await?;
    debug!(count = updates.len(), "Updates received");
    Ok(updates)
  }
}

/// Turn a Bot API envelope into a result.
fn unwrap_envelope<T>(method: &str, envelope: ApiResponse<T>) -> Result<T> {
  if !envelope.ok {
    return Err(anyhow!(
      "Telegram {method} failed ({}): {}",
      envelope.error_code.unwrap_or_default(),
      envelope.description.unwrap_or_default()
    ));
  }
  envelope
    .result
    .ok_or_else(|| anyhow!("Telegram {method} returned no result"))
}

/// Convert a port message into the Bot API keyboard format.
fn to_markup(message: &OutgoingMessage) -> Option<InlineKeyboardMarkup> {
  if message.keyboard.is_empty() {
    return None;
  }

  let inline_keyboard = message
    .keyboard
    .iter()
    .map(|row| {
      row
        .iter()
        .map(|button| InlineKeyboardButton {
          text: button.label.clone(),
          callback_data: button.action.callback_data(),
        })
        .collect()
    })
    .collect();

  Some(InlineKeyboardMarkup { inline_keyboard })
}

#[async_trait]
impl Messenger for TelegramClient {
  #[instrument(skip(self, message))]
  async fn send(&self, chat: ChatId, message: &OutgoingMessage) -> Result<()> {
    self.limiter.until_ready().await;

    let request = SendMessageRequest {
      chat_id: chat,
      text: &message.text,
      reply_markup: to_markup(message),
    };
    let _: serde_json::Value = self.call("sendMessage", &request).await?;
    Ok(())
  }

  async fn acknowledge(&self, callback_id: &str) -> Result<()> {
    let request = AnswerCallbackQueryRequest {
      callback_query_id: callback_id,
    };
    let _: bool = self.call("answerCallbackQuery", &request).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::subscription::{Language, MenuAction};
  use crate::ports::messenger::Button;

  #[test]
  fn test_markup_serialization() {
    let message = OutgoingMessage::text("menu")
      .with_row(vec![
        Button::new("Русский", MenuAction::SelectLanguage(Language::Russian)),
        Button::new("English", MenuAction::SelectLanguage(Language::English)),
      ])
      .with_row(vec![Button::new("Back", MenuAction::BackToMenu)]);

    let request = SendMessageRequest {
      chat_id: 42,
      text: &message.text,
      reply_markup: to_markup(&message),
    };
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["chat_id"], 42);
    assert_eq!(json["reply_markup"]["inline_keyboard"][0][1]["callback_data"], "lang_en");
    assert_eq!(json["reply_markup"]["inline_keyboard"][1][0]["text"], "Back");
  }

  #[test]
  fn test_plain_text_has_no_markup() {
    let message = OutgoingMessage::text("hi");
    let request = SendMessageRequest {
      chat_id: 1,
      text: &message.text,
      reply_markup: to_markup(&message),
    };
    let json = serde_json::to_value(&request).unwrap();
    assert!(json.get("reply_markup").is_none());
  }

  #[test]
  fn test_error_envelope() {
    let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(
      r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#,
    )
    .unwrap();
    let err = unwrap_envelope("sendMessage", envelope).unwrap_err();
    assert!(err.to_string().contains("403"));
    assert!(err.to_string().contains("blocked"));
  }

  #[test]
  fn test_base_url_strips_trailing_slash() {
    let config = TelegramConfig {
      api_url: "https://api.telegram.org/".to_string(),
      ..TelegramConfig::default()
    };
    let client = TelegramClient::new("123:abc", &config).unwrap();
    assert_eq!(client.base_url, "https://api.telegram.org/bot123:abc");
  }
}
