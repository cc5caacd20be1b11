//! Notifier Use Case - Threshold Matching and Alert Dispatch
//!
//! Compares the freshly computed capacity against every armed
//! subscription and sends the localized alert to each match.
//!
//! A failed send is logged and counted; it never stops delivery to the
//! remaining subscribers. Nothing is written back after a successful
//! send, so a standing threshold fires again on the next cycle while
//! capacity stays above it.

use std::sync::Arc;

use num_bigint::BigInt;
use tracing::{error, info, instrument};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::subscription::{Language, MenuAction};
use crate::domain::texts::Texts;
use crate::ports::alert_store::AlertStore;
use crate::ports::messenger::{Button, Messenger, OutgoingMessage};

/// Outcome of one notification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationReport {
  /// Subscriptions whose threshold was exceeded.
  pub matched: usize,
  /// Messages accepted by the transport.
  pub delivered: usize,
  /// Messages the transport rejected.
  pub failed: usize,
}

/// Build the alert message for `capacity` in `language`.
pub fn alert_message(language: Language, capacity: &BigInt) -> OutgoingMessage {
  let texts = Texts::for_language(language);
  OutgoingMessage::text(format!("{}{capacity}", texts.deposit_available_prefix))
    .with_row(vec![Button::new(texts.back_to_menu, MenuAction::BackToMenu)])
}

/// Dispatches capacity alerts to subscribers.
pub struct Notifier<S: AlertStore, M: Messenger> {
  store: Arc<S>,
  messenger: Arc<M>,
  metrics: Option<MetricsRegistry>,
}

impl<S: AlertStore, M: Messenger> Notifier<S, M> {
  /// Create a new notifier.
  pub fn new(store: Arc<S>, messenger: Arc<M>) -> Self {
    Self {
      store,
      messenger,
      metrics: None,
    }
  }

  /// Record outcomes in `metrics`.
  #[must_use]
  pub fn with_metrics(mut self, metrics: MetricsRegistry) -> Self {
    self.metrics = Some(metrics);
    self
  }

  /// Notify every subscriber whose threshold `capacity` exceeds.
  #[instrument(skip(self), fields(capacity = %capacity))]
  pub async fn notify(&self, capacity: &BigInt) -> NotificationReport {
    let subscriptions = self.store.subscriptions().await;
    let mut report = NotificationReport::default();

    if let Some(metrics) = &self.metrics {
      let armed = subscriptions.iter().filter(|(_, s)| s.threshold.is_some()).count();
      metrics.armed_subscriptions.set(i64::try_from(armed).unwrap_or(i64::MAX));
    }

    for (user, subscription) in subscriptions {
      if !subscription.is_triggered_by(capacity) {
        continue;
      }
      report.matched += 1;

      let message = alert_message(subscription.language, capacity);
      match self.messenger.send(user, &message).await {
        Ok(()) => {
          report.delivered += 1;
          self.count("delivered");
        }
        Err(e) => {
          report.failed += 1;
          self.count("failed");
          error!(user, error = %format!("{e:#}"), "Failed to send notification");
        }
      }
    }

    if report.matched > 0 {
      info!(
        matched = report.matched,
        delivered = report.delivered,
        failed = report.failed,
        "Notifications dispatched"
      );
    }

    report
  }

  fn count(&self, outcome: &str) {
    if let Some(metrics) = &self.metrics {
      metrics.notifications.with_label_values(&[outcome]).inc();
    }
  }
}
