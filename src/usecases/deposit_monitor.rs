//! Deposit Monitor Use Case - Capacity Polling Loop
//!
//! Each cycle reads the vault's deposit limit and current total assets,
//! computes the remaining capacity in whole dollars, and hands it to the
//! `Notifier`. A cycle that fails (RPC exhausted its retries, or the
//! returned value is not decodable) is logged and the next cycle is
//! scheduled after `failure_delay`; the loop itself only ends on
//! shutdown.
//!
//! Shutdown interrupts both the wait between cycles and a cycle still in
//! progress (including its retry sleeps).

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument};

use super::notifier::{NotificationReport, Notifier};
use crate::adapters::metrics::{HealthState, MetricsRegistry};
use crate::config::PollingConfig;
use crate::domain::capacity::{compute_capacity, decode_hex};
use crate::ports::alert_store::AlertStore;
use crate::ports::chain_client::{ChainClient, VaultValue};
use crate::ports::messenger::Messenger;

/// Delays between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
  /// Wait after a successful cycle.
  pub interval: Duration,
  /// Wait after a failed cycle.
  pub failure_delay: Duration,
}

impl Default for PollSchedule {
  fn default() -> Self {
    Self {
      interval: Duration::from_secs(5),
      failure_delay: Duration::from_secs(5),
    }
  }
}

impl From<&PollingConfig> for PollSchedule {
  fn from(config: &PollingConfig) -> Self {
    Self {
      interval: Duration::from_secs(config.interval_seconds),
      failure_delay: Duration::from_secs(config.failure_delay_seconds),
    }
  }
}

/// Result of one successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
  /// Deposit limit in base units.
  pub limit: BigInt,
  /// Assets already deposited in base units.
  pub used: BigInt,
  /// Remaining capacity in whole dollars.
  pub capacity: BigInt,
  /// Notification outcome.
  pub notifications: NotificationReport,
}

/// Periodic capacity check.
pub struct DepositMonitor<C: ChainClient, S: AlertStore, M: Messenger> {
  chain: Arc<C>,
  notifier: Notifier<S, M>,
  schedule: PollSchedule,
  health: Option<Arc<HealthState>>,
  metrics: Option<MetricsRegistry>,
}

impl<C: ChainClient, S: AlertStore, M: Messenger> DepositMonitor<C, S, M> {
  /// Create a new monitor.
  pub fn new(chain: Arc<C>, notifier: Notifier<S, M>, schedule: PollSchedule) -> Self {
    Self {
      chain,
      notifier,
      schedule,
      health: None,
      metrics: None,
    }
  }

  /// Record successful cycles in `health`.
  #[must_use]
  pub fn with_health(mut self, health: Arc<HealthState>) -> Self {
    self.health = Some(health);
    self
  }

  /// Record cycle outcomes and capacity in `metrics`.
  #[must_use]
  pub fn with_metrics(mut self, metrics: MetricsRegistry) -> Self {
    self.metrics = Some(metrics);
    self
  }

  /// Read one vault value and decode its first word.
  async fn read(&self, value: VaultValue) -> Result<BigInt> {
    let words = self.chain.read_value(value).await?;
    let first = words
      .first()
      .with_context(|| format!("{value} returned no data"))?;
    decode_hex(first).with_context(|| format!("Failed to decode {value}"))
  }

  /// Run one cycle: read, compute, notify.
  #[instrument(skip(self))]
  pub async fn run_cycle(&self) -> Result<CycleReport> {
    let limit = self.read(VaultValue::TvlLimit).await?;
    let used = self.read(VaultValue::TotalAssets).await?;
    let capacity = compute_capacity(&limit, &used);

    debug!(%limit, %used, %capacity, "Capacity computed");

    if let Some(metrics) = &self.metrics {
      if let Some(value) = capacity.to_f64() {
        metrics.capacity_usd.set(value);
      }
    }

    let notifications = self.notifier.notify(&capacity).await;

    Ok(CycleReport {
      limit,
      used,
      capacity,
      notifications,
    })
  }

  /// Run cycles until shutdown.
  pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
    info!(
      interval_s = self.schedule.interval.as_secs(),
      failure_delay_s = self.schedule.failure_delay.as_secs(),
      "Deposit monitor started"
    );

    loop {
      let outcome = tokio::select! {
        biased;
        _ = shutdown_rx.recv() => break,
        outcome = self.run_cycle() => outcome,
      };

      let delay = match outcome {
        Ok(report) => {
          self.count("success");
          if let Some(health) = &self.health {
            health.record_success(Utc::now());
          }
          debug!(
            capacity = %report.capacity,
            notified = report.notifications.delivered,
            "Cycle complete"
          );
          self.schedule.interval
        }
        Err(e) => {
          self.count("failure");
          error!(error = %format!("{e:#}"), "Capacity check failed");
          self.schedule.failure_delay
        }
      };

      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => break,
        () = tokio::time::sleep(delay) => {}
      }
    }

    info!("Deposit monitor stopped");
  }

  fn count(&self, outcome: &str) {
    if let Some(metrics) = &self.metrics {
      metrics.cycles.with_label_values(&[outcome]).inc();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_schedule_from_config() {
    let config = PollingConfig {
      interval_seconds: 60,
      failure_delay_seconds: 10,
    };
    let schedule = PollSchedule::from(&config);
    assert_eq!(schedule.interval, Duration::from_secs(60));
    assert_eq!(schedule.failure_delay, Duration::from_secs(10));
  }

  #[test]
  fn test_default_schedule_is_five_seconds() {
    let schedule = PollSchedule::default();
    assert_eq!(schedule.interval, Duration::from_secs(5));
    assert_eq!(schedule.failure_delay, Duration::from_secs(5));
  }
}
