//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! reading the bot token from the environment, and providing
//! clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Environment variable holding the Telegram bot token.
pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    path = %path.display(),
    rpc_url = %config.rpc.url,
    interval_s = config.polling.interval_seconds,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
  if Path::new(path).exists() {
    return load_config(path);
  }

  info!(path, "No config file found, using defaults");
  let config = AppConfig::default();
  validate_config(&config)?;
  Ok(config)
}

/// Parse and validate TOML content.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).context("Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Read the bot token from the environment (after `.env` loading).
pub fn bot_token_from_env() -> Result<String> {
  let token = std::env::var(BOT_TOKEN_ENV)
    .with_context(|| format!("{BOT_TOKEN_ENV} is not set"))?;
  anyhow::ensure!(!token.trim().is_empty(), "{BOT_TOKEN_ENV} is empty");
  Ok(token.trim().to_string())
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  // RPC validation
  anyhow::ensure!(!config.rpc.url.is_empty(), "RPC URL must not be empty");
  anyhow::ensure!(
    config.rpc.contract_address.starts_with("0x"),
    "contract_address must be 0x-prefixed, got {}",
    config.rpc.contract_address
  );
  anyhow::ensure!(
    config.rpc.tvl_limit_selector.starts_with("0x")
      && config.rpc.total_assets_selector.starts_with("0x"),
    "Entry point selectors must be 0x-prefixed"
  );
  anyhow::ensure!(
    config.rpc.max_attempts > 0,
    "rpc.max_attempts must be positive"
  );
  anyhow::ensure!(
    config.rpc.timeout_seconds > 0,
    "rpc.timeout_seconds must be positive"
  );

  // Polling validation
  anyhow::ensure!(
    config.polling.interval_seconds > 0,
    "polling.interval_seconds must be positive"
  );
  anyhow::ensure!(
    config.polling.failure_delay_seconds > 0,
    "polling.failure_delay_seconds must be positive"
  );

  // Telegram validation
  anyhow::ensure!(
    !config.telegram.api_url.is_empty(),
    "Telegram API URL must not be empty"
  );
  anyhow::ensure!(
    config.telegram.max_messages_per_second > 0,
    "telegram.max_messages_per_second must be positive"
  );

  // Persistence validation
  anyhow::ensure!(
    !config.persistence.file_name.is_empty(),
    "persistence.file_name must not be empty"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_missing_file_uses_defaults() {
    let config = load_or_default("nonexistent.toml").unwrap();
    assert_eq!(config.rpc.max_attempts, 50);
    assert_eq!(config.rpc.retry_delay_ms, 5_000);
    assert_eq!(config.polling.interval_seconds, 5);
    assert_eq!(config.rpc.block_id, "pending");
  }

  #[test]
  fn test_partial_file_keeps_other_defaults() {
    let config = parse_config(
      r#"
        [polling]
        interval_seconds = 60

        [persistence]
        data_dir = "/var/lib/deposit-bot"
      "#,
    )
    .unwrap();
    assert_eq!(config.polling.interval_seconds, 60);
    assert_eq!(config.polling.failure_delay_seconds, 5);
    assert_eq!(config.persistence.data_dir, "/var/lib/deposit-bot");
    assert_eq!(config.persistence.file_name, "user_data.json");
    assert_eq!(config.telegram.api_url, "https://api.telegram.org");
  }

  #[test]
  fn test_rejects_zero_attempts() {
    let result = parse_config("[rpc]\nmax_attempts = 0\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_rejects_zero_failure_delay() {
    let err = parse_config("[polling]\nfailure_delay_seconds = 0\n").unwrap_err();
    assert!(format!("{err:#}").contains("failure_delay_seconds"));
  }

  #[test]
  fn test_rejects_unprefixed_contract() {
    let result = parse_config("[rpc]\ncontract_address = \"05f43c\"\n");
    assert!(result.is_err());
  }
}
