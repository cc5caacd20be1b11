//! Chain Client Port - On-chain Read Interface
//!
//! Defines the trait for calling view functions on the vault
//! contract. Only raw felts are returned here; decoding into
//! integers is domain logic.

use async_trait::async_trait;

/// Which vault value to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultValue {
  /// Maximum total value the vault accepts (`tvl_limit`).
  TvlLimit,
  /// Value currently deposited (`total_assets`).
  TotalAssets,
}

impl VaultValue {
  /// Contract function name, also used as a metrics label.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::TvlLimit => "tvl_limit",
      Self::TotalAssets => "total_assets",
    }
  }
}

impl std::fmt::Display for VaultValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Trait for read-only contract calls.
///
/// Implementations own their retry policy: an `Err` means every
/// attempt failed and the caller should abandon the current cycle.
#[async_trait]
pub trait ChainClient: Send + Sync + 'static {
  /// Call the view function for `value` and return the raw result felts.
  ///
  /// The first felt holds the value; callers must not assume more.
  async fn read_value(&self, value: VaultValue) -> anyhow::Result<Vec<String>>;
}
