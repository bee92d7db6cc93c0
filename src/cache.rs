//! In-memory store for the most recent valuation payload per well.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Concurrency-safe map from well id to the last valuation payload read back
/// from the oracle contract.
///
/// Writes happen only from the poller task after a fully successful request
/// lifecycle; reads come from any number of concurrent read-path handlers.
/// Last write wins, no history is kept, and entries live for the process
/// lifetime.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl ResultCache {
    /// Returns a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last stored payload for `id`, or the empty string if the
    /// well has not been successfully polled yet.
    pub async fn get(&self, id: &str) -> String {
        self.inner.read().await.get(id).cloned().unwrap_or_default()
    }

    /// Stores `value` as the latest payload for `id`, replacing any previous
    /// entry.
    pub async fn set(&self, id: impl Into<String>, value: impl Into<String>) {
        self.inner.write().await.insert(id.into(), value.into());
    }

    /// Number of wells with a stored payload.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// True if no well has been successfully polled yet.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unpolled_wells_read_empty() {
        let cache = ResultCache::new();
        assert_eq!(cache.get("a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11").await, "");
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let cache = ResultCache::new();
        cache.set("well-1", "{\"npv_usd\":100}").await;
        cache.set("well-1", "{\"npv_usd\":200}").await;
        assert_eq!(cache.get("well-1").await, "{\"npv_usd\":200}");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_readers_never_observe_partial_writes() {
        let cache = ResultCache::new();
        let value = "x".repeat(1024);

        let writer = {
            let cache = cache.clone();
            let value = value.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    cache.set("well-1", value.clone()).await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                let value = value.clone();
                tokio::spawn(async move {
                    for _ in 0..500 {
                        let got = cache.get("well-1").await;
                        assert!(got.is_empty() || got == value, "partial write observed");
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
