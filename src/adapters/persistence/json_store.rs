//! JSON Alert Store - Atomic Subscription Persistence
//!
//! Keeps all subscriptions in memory and writes the whole map to
//! `user_data.json` after every mutation. Writes go to a temporary
//! file first and are then renamed over the real one, so the file is
//! always either the old or the new version, never a partial write.
//!
//! A missing, unreadable or malformed file on startup is logged and
//! the store starts empty. Records are decoded one by one: a record that
//! does not decode is skipped with a warning and the rest still load.
//! Legacy amounts beyond the `Decimal` range are clamped to its bounds.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::domain::subscription::{Language, Subscription, UserId};
use crate::ports::alert_store::AlertStore;

type SubscriptionMap = BTreeMap<UserId, Subscription>;

/// File-backed alert store.
pub struct JsonAlertStore {
    /// Path to the subscription file.
    path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
    /// In-memory state. Held across the write so saves never interleave.
    state: Mutex<SubscriptionMap>,
}

impl JsonAlertStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    pub async fn open(data_dir: &str, file_name: &str) -> Result<Self> {
        let dir = Path::new(data_dir);
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        let path = dir.join(file_name);
        let tmp_path = dir.join(format!("{file_name}.tmp"));
        let state = Self::load(&path).await;

        Ok(Self {
            path,
            tmp_path,
            state: Mutex::new(state),
        })
    }

    /// Load subscriptions, falling back to an empty map on any error.
    #[instrument]
    async fn load(path: &Path) -> SubscriptionMap {
        if !path.exists() {
            info!("No subscription file found, starting fresh");
            return SubscriptionMap::new();
        }

        let parsed = match fs::read_to_string(path).await {
            Ok(json) => serde_json::from_str::<BTreeMap<String, Value>>(&json)
                .context("Failed to parse subscription JSON"),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to read subscription file")),
        };

        match parsed {
            Ok(records) => {
                let total = records.len();
                let map: SubscriptionMap = records
                    .into_iter()
                    .filter_map(|(key, record)| decode_record(&key, record))
                    .collect();
                info!(
                    subscribers = map.len(),
                    skipped = total - map.len(),
                    "Subscriptions loaded"
                );
                map
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Error loading subscriptions, starting empty");
                SubscriptionMap::new()
            }
        }
    }

    /// Write the full map atomically (tmp → rename).
    async fn persist(&self, state: &SubscriptionMap) -> Result<()> {
        let json = serde_json::to_string_pretty(state)
            .context("Failed to serialize subscriptions")?;

        fs::write(&self.tmp_path, &json)
            .await
            .context("Failed to write tmp subscription file")?;

        fs::rename(&self.tmp_path, &self.path)
            .await
            .context("Failed to rename subscription file")?;

        Ok(())
    }

    /// Apply `change` under the lock and persist if it reports a change.
    async fn mutate<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut SubscriptionMap) -> bool + Send,
    {
        let mut state = self.state.lock().await;
        if !change(&mut state) {
            return Ok(());
        }

        self.persist(&state)
            .await
            .with_context(|| format!("Failed to save {}", self.path.display()))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check that the data directory is writable.
    pub async fn is_healthy(&self) -> bool {
        let Some(dir) = self.path.parent() else {
            return false;
        };
        let probe = dir.join(".health_check");
        let result = fs::write(&probe, b"ok").await;
        let _ = fs::remove_file(&probe).await;
        result.is_ok()
    }
}

/// Decode one `user id → record` entry of the subscription file.
fn decode_record(key: &str, mut record: Value) -> Option<(UserId, Subscription)> {
    let Ok(user) = key.parse::<UserId>() else {
        warn!(key, "Skipping record with non-numeric user id");
        return None;
    };

    let clamped = record
        .get("alertAmount")
        .and_then(Value::as_f64)
        .filter(|amount| Decimal::from_f64(*amount).is_none())
        .map(|amount| if amount < 0.0 { Decimal::MIN } else { Decimal::MAX });
    if clamped.is_some() {
        if let Some(fields) = record.as_object_mut() {
            fields.remove("alertAmount");
        }
    }

    match serde_json::from_value::<Subscription>(record) {
        Ok(mut subscription) => {
            if let Some(amount) = clamped {
                warn!(user, %amount, "Threshold out of range, clamped");
                subscription.threshold = Some(amount);
            }
            Some((user, subscription))
        }
        Err(e) => {
            warn!(user, error = %e, "Skipping undecodable subscription record");
            None
        }
    }
}

#[async_trait]
impl AlertStore for JsonAlertStore {
    async fn get(&self, user: UserId) -> Option<Subscription> {
        self.state.lock().await.get(&user).cloned()
    }

    #[instrument(skip(self))]
    async fn set_language(&self, user: UserId, language: Language) -> Result<()> {
        self.mutate(|state| {
            state.entry(user).or_default().language = language;
            true
        })
        .await
    }

    #[instrument(skip(self))]
    async fn begin_threshold_input(&self, user: UserId, language: Language) -> Result<()> {
        self.mutate(|state| {
            state
                .entry(user)
                .or_insert_with(|| Subscription::with_language(language))
                .awaiting_input = true;
            true
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_threshold(&self, user: UserId, threshold: Decimal) -> Result<()> {
        self.mutate(|state| {
            let subscription = state.entry(user).or_default();
            subscription.threshold = Some(threshold);
            subscription.awaiting_input = false;
            true
        })
        .await
    }

    #[instrument(skip(self))]
    async fn clear_threshold(&self, user: UserId) -> Result<()> {
        self.mutate(|state| match state.get_mut(&user) {
            Some(subscription) => {
                subscription.threshold = None;
                true
            }
            None => false,
        })
        .await
    }

    async fn subscriptions(&self) -> Vec<(UserId, Subscription)> {
        self.state
            .lock()
            .await
            .iter()
            .map(|(user, sub)| (*user, sub.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    async fn open_in(dir: &TempDir) -> JsonAlertStore {
        JsonAlertStore::open(dir.path().to_str().unwrap(), "user_data.json")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir).await;

        store.set_language(42, Language::English).await.unwrap();
        store.begin_threshold_input(42, Language::English).await.unwrap();
        store.set_threshold(42, dec!(1500.5)).await.unwrap();
        drop(store);

        let reopened = open_in(&dir).await;
        let sub = reopened.get(42).await.unwrap();
        assert_eq!(sub.language, Language::English);
        assert_eq!(sub.threshold, Some(dec!(1500.5)));
        assert!(!sub.awaiting_input);
    }

    #[tokio::test]
    async fn test_reads_legacy_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("user_data.json"),
            r#"{
              "123456789": { "language": "ru", "awaitingAmount": false, "alertAmount": 100 },
              "987654321": { "language": "en", "awaitingAmount": true }
            }"#,
        )
        .unwrap();

        let store = open_in(&dir).await;
        let subs = store.subscriptions().await;
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].0, 123_456_789);
        assert_eq!(subs[0].1.threshold, Some(dec!(100)));
        assert_eq!(subs[1].1.language, Language::English);
        assert!(subs[1].1.awaiting_input);
        assert_eq!(subs[1].1.threshold, None);
    }

    #[tokio::test]
    async fn test_bad_record_does_not_drop_others() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("user_data.json"),
            r#"{
              "1": { "language": "ru", "alertAmount": 100 },
              "2": { "language": "en", "alertAmount": 1e30 },
              "3": { "language": "de" },
              "abc": { "language": "en" }
            }"#,
        )
        .unwrap();

        let store = open_in(&dir).await;
        let subs = store.subscriptions().await;
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0], (1, Subscription {
            language: Language::Russian,
            threshold: Some(dec!(100)),
            awaiting_input: false,
        }));
        assert_eq!(subs[1].0, 2);
        assert_eq!(subs[1].1.language, Language::English);
        assert_eq!(subs[1].1.threshold, Some(Decimal::MAX));
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("user_data.json"), "{ not json").unwrap();

        let store = open_in(&dir).await;
        assert!(store.subscriptions().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_threshold_keeps_subscription() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir).await;

        store.set_threshold(7, dec!(300)).await.unwrap();
        store.clear_threshold(7).await.unwrap();
        store.clear_threshold(8).await.unwrap();

        let sub = store.get(7).await.unwrap();
        assert_eq!(sub.threshold, None);
        assert!(store.get(8).await.is_none());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("alertAmount"));
    }

    #[tokio::test]
    async fn test_atomic_write_leaves_no_tmp_file() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir).await;

        store.set_language(1, Language::Russian).await.unwrap();

        assert!(dir.path().join("user_data.json").exists());
        assert!(!dir.path().join("user_data.json.tmp").exists());
        assert!(store.is_healthy().await);
    }

    #[tokio::test]
    async fn test_begin_input_keeps_existing_language() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir).await;

        store.set_language(5, Language::English).await.unwrap();
        store.begin_threshold_input(5, Language::Russian).await.unwrap();

        let sub = store.get(5).await.unwrap();
        assert_eq!(sub.language, Language::English);
        assert!(sub.awaiting_input);
    }
}
