//! Configuration Module - TOML-based Bot Configuration
//!
//! Loads and validates configuration from an optional `config.toml`.
//! Every section has defaults matching the production deployment, so
//! the bot runs with no file at all. The Telegram token is a secret and
//! only ever comes from the environment (`BOT_TOKEN`, `.env` supported).

pub mod loader;

use serde::Deserialize;

/// Top-level bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Bot identity and logging.
  pub bot: BotConfig,
  /// Starknet RPC endpoint and vault contract.
  pub rpc: RpcConfig,
  /// Poll cadence.
  pub polling: PollingConfig,
  /// Telegram Bot API settings.
  pub telegram: TelegramConfig,
  /// Subscription file location.
  pub persistence: PersistenceConfig,
  /// Metrics and health endpoints.
  pub metrics: MetricsConfig,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
  /// Human-readable bot name (logs only).
  pub name: String,
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
  pub log_level: String,
}

impl Default for BotConfig {
  fn default() -> Self {
    Self {
      name: "gigavault_monitor_bot".to_string(),
      log_level: "info".to_string(),
    }
  }
}

/// Starknet JSON-RPC configuration.
///
/// Contract address and selectors are externalized here,
/// the chain adapter never hardcodes them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
  /// JSON-RPC endpoint.
  pub url: String,
  /// Gigavault vault contract.
  pub contract_address: String,
  /// Entry point selector of `tvl_limit`.
  pub tvl_limit_selector: String,
  /// Entry point selector of `total_assets`.
  pub total_assets_selector: String,
  /// Block tag to read at.
  pub block_id: String,
  /// Per-request timeout in seconds.
  pub timeout_seconds: u64,
  /// Attempts per call before giving up.
  pub max_attempts: u32,
  /// Fixed delay between attempts (milliseconds).
  pub retry_delay_ms: u64,
}

impl Default for RpcConfig {
  fn default() -> Self {
    Self {
      url: "https://juno.api.prod.paradex.trade/rpc/v0_7".to_string(),
      contract_address:
        "0x05f43c92dbe4e995115f351254407e7e84abf04cbe32a536345b9d6c36bc750f".to_string(),
      tvl_limit_selector:
        "0x37b7c92318a88278a7f6c6f48e2e222d93275e2ca33599f69bbd967f7ec3c".to_string(),
      total_assets_selector:
        "0x21e1f7868a42adf8781cf7d3a76817ceaaafda5d56b7e7d8f26bc4f27ecdbe2".to_string(),
      block_id: "pending".to_string(),
      timeout_seconds: 30,
      max_attempts: 50,
      retry_delay_ms: 5_000,
    }
  }
}

/// Poll cadence configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
  /// Delay after a successful cycle (seconds).
  pub interval_seconds: u64,
  /// Delay after an aborted cycle (seconds).
  pub failure_delay_seconds: u64,
}

impl Default for PollingConfig {
  fn default() -> Self {
    Self {
      interval_seconds: 5,
      failure_delay_seconds: 5,
    }
  }
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
  /// Bot API base URL (token is appended at runtime).
  pub api_url: String,
  /// `getUpdates` long-poll timeout in seconds.
  pub long_poll_timeout_seconds: u64,
  /// Pause after a failed `getUpdates` call (seconds).
  pub error_backoff_seconds: u64,
  /// Outgoing message budget (Telegram allows ~30/s per bot).
  pub max_messages_per_second: u32,
}

impl Default for TelegramConfig {
  fn default() -> Self {
    Self {
      api_url: "https://api.telegram.org".to_string(),
      long_poll_timeout_seconds: 30,
      error_backoff_seconds: 5,
      max_messages_per_second: 25,
    }
  }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
  /// Directory holding the subscription file.
  pub data_dir: String,
  /// Subscription file name inside `data_dir`.
  pub file_name: String,
}

impl Default for PersistenceConfig {
  fn default() -> Self {
    Self {
      data_dir: "data".to_string(),
      file_name: "user_data.json".to_string(),
    }
  }
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
  /// Serve `/metrics`, `/live` and `/ready`.
  pub enabled: bool,
  /// Bind address of the metrics/health server.
  pub bind_address: String,
  /// `/ready` fails when the last successful cycle is older than this.
  pub stale_after_seconds: u64,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      bind_address: "0.0.0.0:9090".to_string(),
      stale_after_seconds: 600,
    }
  }
}
