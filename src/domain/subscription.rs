//! Subscription state and alert matching.
//!
//! A subscription is a chat user's stored alert configuration. The
//! serialized field names (`alertAmount`, `awaitingAmount`) are the ones
//! found in existing `user_data.json` files, so the store can be
//! migrated without conversion.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chat platform user identifier (Telegram numeric id).
pub type UserId = i64;

/// Chat identifier. For private chats it equals the user id.
pub type ChatId = i64;

/// Interface language of a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// Primary language; used until the user picks one.
    #[default]
    #[serde(rename = "ru")]
    Russian,
    /// Secondary language.
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Short code used in callback data and the persisted file.
    pub fn code(self) -> &'static str {
        match self {
            Self::Russian => "ru",
            Self::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A user's alert configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Language for every message sent to this user.
    #[serde(default)]
    pub language: Language,
    /// Capacity (in dollars) the user wants to hear about.
    #[serde(
        rename = "alertAmount",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub threshold: Option<Decimal>,
    /// Next text message from this user is a threshold.
    #[serde(rename = "awaitingAmount", default)]
    pub awaiting_input: bool,
}

impl Subscription {
    /// Create an empty subscription in the given language.
    pub fn with_language(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Whether `capacity` should trigger a notification for this user.
    ///
    /// The threshold is floored to an integer and compared with strict
    /// `>`. Subscriptions without a threshold, or with a zero threshold
    /// left over in a legacy file, never trigger.
    pub fn is_triggered_by(&self, capacity: &BigInt) -> bool {
        self.threshold
            .filter(|threshold| !threshold.is_zero())
            .and_then(floor_to_bigint)
            .is_some_and(|threshold| *capacity > threshold)
    }
}

/// Floor a decimal to an arbitrary-precision integer.
fn floor_to_bigint(value: Decimal) -> Option<BigInt> {
    value.floor().to_i128().map(BigInt::from)
}

/// Error parsing a user-entered threshold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdError {
    /// Text is not a number.
    #[error("not a number: {0:?}")]
    NotANumber(String),
    /// Number is zero or negative.
    #[error("threshold must be positive, got {0}")]
    NotPositive(Decimal),
}

/// Parse a threshold typed by a user.
///
/// Accepts plain (`1500`, `2500.75`) and scientific (`1e6`) notation,
/// surrounding whitespace and an optional leading `$`. Zero and negative
/// amounts are rejected.
pub fn parse_threshold(text: &str) -> Result<Decimal, ThresholdError> {
    let trimmed = text.trim();
    let number = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();

    let amount = Decimal::from_str(number)
        .or_else(|_| Decimal::from_scientific(number))
        .map_err(|_| ThresholdError::NotANumber(text.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(ThresholdError::NotPositive(amount));
    }

    Ok(amount.normalize())
}

/// Inline keyboard actions exchanged with the chat transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Pick interface language.
    SelectLanguage(Language),
    /// Start entering a new threshold.
    CreateAlert,
    /// Show the current threshold.
    ViewAlert,
    /// Remove the current threshold.
    DeleteAlert,
    /// Return to the main menu.
    BackToMenu,
}

impl MenuAction {
    /// Callback data string carried by the button.
    pub fn callback_data(self) -> &'static str {
        match self {
            Self::SelectLanguage(Language::Russian) => "lang_ru",
            Self::SelectLanguage(Language::English) => "lang_en",
            Self::CreateAlert => "create_alert",
            Self::ViewAlert => "view_alert",
            Self::DeleteAlert => "delete_alert",
            Self::BackToMenu => "back_to_menu",
        }
    }

    /// Parse callback data back into an action. Unknown data yields `None`.
    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data {
            "lang_ru" => Some(Self::SelectLanguage(Language::Russian)),
            "lang_en" => Some(Self::SelectLanguage(Language::English)),
            "create_alert" => Some(Self::CreateAlert),
            "view_alert" => Some(Self::ViewAlert),
            "delete_alert" => Some(Self::DeleteAlert),
            "back_to_menu" => Some(Self::BackToMenu),
            _ => None,
        }
    }
}
