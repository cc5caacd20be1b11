//! Telegram Bot API Adapter
//!
//! Implements the `Messenger` port over the Telegram Bot API and
//! drives the conversation handler from a `getUpdates` long-poll loop.
//!
//! Sub-modules:
//! - `client`: HTTP client, rate limited sends
//! - `types`: Bot API request/response definitions
//! - `updates`: long-poll loop and update conversion

pub mod client;
pub mod types;
pub mod updates;

pub use client::TelegramClient;
pub use updates::UpdatePoller;
