//! Fixed-delay retry helper.
//!
//! The node is polled twice per cycle, so a plain fixed delay is
//! enough: no exponential backoff, no jitter, no circuit breaker.

use std::future::Future;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Attempt count and the pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts, including the first one.
  pub max_attempts: u32,
  /// Pause after every failed attempt except the last.
  pub delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 50,
      delay: Duration::from_secs(5),
    }
  }
}

/// Run `op` until it succeeds or `policy.max_attempts` is exhausted.
///
/// `op` receives the 1-based attempt number. On exhaustion the error of
/// the last attempt is returned, with the attempt count as context.
pub async fn retry_fixed<T, F, Fut>(policy: RetryPolicy, operation: &str, mut op: F) -> Result<T>
where
  F: FnMut(u32) -> Fut,
  Fut: Future<Output = Result<T>>,
{
  let attempts = policy.max_attempts.max(1);
  let mut last_error = None;

  for attempt in 1..=attempts {
    match op(attempt).await {
      Ok(value) => return Ok(value),
      Err(e) => {
        warn!(operation, attempt, max_attempts = attempts, error = %e, "Attempt failed");
        last_error = Some(e);

        if attempt < attempts {
          debug!(delay_ms = policy.delay.as_millis(), "Retrying");
          sleep(policy.delay).await;
        }
      }
    }
  }

  let error = last_error.unwrap_or_else(|| anyhow!("no attempt was made"));
  Err(error.context(format!("{operation} failed after {attempts} attempts")))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;
  use std::sync::atomic::{AtomicU32, Ordering};

  use super::*;

  fn fast(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
      max_attempts,
      delay: Duration::from_millis(1),
    }
  }

  #[tokio::test]
  async fn test_first_success_returns_immediately() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    let value = retry_fixed(fast(50), "op", |_| {
      let counter = Arc::clone(&counter);
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, anyhow::Error>(7)
      }
    })
    .await
    .unwrap();

    assert_eq!(value, 7);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_recovers_after_failures() {
    let value = retry_fixed(fast(5), "op", |attempt| async move {
      if attempt < 3 {
        Err(anyhow!("transient {attempt}"))
      } else {
        Ok(attempt)
      }
    })
    .await
    .unwrap();

    assert_eq!(value, 3);
  }

  #[tokio::test]
  async fn test_exhaustion_surfaces_last_error() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    let result: Result<()> = retry_fixed(fast(50), "starknet_call", |attempt| {
      let counter = Arc::clone(&counter);
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("boom {attempt}"))
      }
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 50);
    assert_eq!(err.root_cause().to_string(), "boom 50");
    assert!(err.to_string().contains("after 50 attempts"));
  }

  #[tokio::test]
  async fn test_zero_attempts_still_tries_once() {
    let result = retry_fixed(fast(0), "op", |_| async { Ok::<_, anyhow::Error>(()) }).await;
    assert!(result.is_ok());
  }
}
