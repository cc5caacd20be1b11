//! Alert Store Port - Subscription Persistence Interface
//!
//! Every mutating call persists the full state before returning.
//! The in-memory change is kept even if persisting fails; the
//! error is returned so callers can log it.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::subscription::{Language, Subscription, UserId};

/// Trait for subscription storage.
#[async_trait]
pub trait AlertStore: Send + Sync + 'static {
  /// Get a user's subscription, if any.
  async fn get(&self, user: UserId) -> Option<Subscription>;

  /// Create or update the user's language.
  async fn set_language(&self, user: UserId, language: Language) -> anyhow::Result<()>;

  /// Mark the user as about to type a threshold (creating the
  /// subscription in `language` if needed).
  async fn begin_threshold_input(
    &self,
    user: UserId,
    language: Language,
  ) -> anyhow::Result<()>;

  /// Store a threshold and clear the awaiting-input flag.
  async fn set_threshold(&self, user: UserId, threshold: Decimal) -> anyhow::Result<()>;

  /// Remove the user's threshold. No-op for unknown users.
  async fn clear_threshold(&self, user: UserId) -> anyhow::Result<()>;

  /// Snapshot of all subscriptions, ordered by user id.
  async fn subscriptions(&self) -> Vec<(UserId, Subscription)>;
}
