//! Starknet RPC Client - Vault View Calls over JSON-RPC
//!
//! Wraps reqwest with the fixed-delay retry policy for the two
//! `starknet_call` reads the deposit monitor needs. Transport errors,
//! non-2xx statuses, malformed bodies and JSON-RPC error objects all
//! count as a failed attempt.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::retry::{RetryPolicy, retry_fixed};
use super::types::{CallRequest, CallResponse};
use crate::adapters::metrics::MetricsRegistry;
use crate::config::RpcConfig;
use crate::ports::chain_client::{ChainClient, VaultValue};

/// Starknet JSON-RPC client bound to one vault contract.
pub struct StarknetRpcClient {
  /// Underlying HTTP client.
  http: Client,
  /// Endpoint, contract and selectors.
  config: RpcConfig,
  /// Retry policy applied to every call.
  retry: RetryPolicy,
  /// Optional failure counter.
  metrics: Option<MetricsRegistry>,
}

impl StarknetRpcClient {
  /// Create a new client from config.
  pub fn new(config: RpcConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(Duration::from_secs(config.timeout_seconds))
      .pool_max_idle_per_host(2)
      .build()
      .context("Failed to build HTTP client")?;

    let retry = RetryPolicy {
      max_attempts: config.max_attempts,
      delay: Duration::from_millis(config.retry_delay_ms),
    };

    Ok(Self {
      http,
      config,
      retry,
      metrics: None,
    })
  }

  /// Count failed attempts in `metrics`.
  #[must_use]
  pub fn with_metrics(mut self, metrics: MetricsRegistry) -> Self {
    self.metrics = Some(metrics);
    self
  }

  fn selector(&self, value: VaultValue) -> &str {
    match value {
      VaultValue::TvlLimit => &self.config.tvl_limit_selector,
      VaultValue::TotalAssets => &self.config.total_assets_selector,
    }
  }

  /// One HTTP round trip, no retries.
  async fn call_once(&self, selector: &str) -> Result<Vec<String>> {
    let request = CallRequest::new(
      &self.config.contract_address,
      selector,
      &self.config.block_id,
    );

    let response = self
      .http
      .post(&self.config.url)
      .header("accept", "application/json")
      .json(&request)
      .send()
      .await
      .context("RPC request failed")?;

    let status = response.status();
    let body = response.text().await.context("Failed to read RPC body")?;

    if !status.is_success() {
      return Err(anyhow!("RPC HTTP error {status}: {body}"));
    }

    parse_call_response(&body)
  }
}

/// Extract the result felts from a raw `starknet_call` response body.
pub fn parse_call_response(body: &str) -> Result<Vec<String>> {
  let response: CallResponse =
    serde_json::from_str(body).context("Failed to parse RPC response")?;

  if let Some(error) = response.error {
    return Err(anyhow!("RPC error {}: {}", error.code, error.message));
  }

  let result = response
    .result
    .ok_or_else(|| anyhow!("RPC response has no result"))?;

  anyhow::ensure!(!result.is_empty(), "RPC result is empty");
  Ok(result)
}

#[async_trait]
impl ChainClient for StarknetRpcClient {
  #[instrument(skip(self), fields(value = %value))]
  async fn read_value(&self, value: VaultValue) -> Result<Vec<String>> {
    let selector = self.selector(value);

    let felts = retry_fixed(self.retry, "starknet_call", move |_| async move {
      let result = self.call_once(selector).await;
      if let (Err(_), Some(metrics)) = (&result, &self.metrics) {
        metrics.rpc_failures.with_label_values(&[value.as_str()]).inc();
      }
      result
    })
    .await?;

    debug!(felt = %felts[0], "Vault value read");
    Ok(felts)
  }
}
