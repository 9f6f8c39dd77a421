use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use tracing::debug;

use tempmod_application::{
    error::{AppError, AppResult},
    ports::outgoing::kv_store::{KeyValueStorePort, StoragePartition},
};

/// Process-local substrate for development and tests. Get/set on a single key
/// is atomic; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    blobs: DashMap<(StoragePartition, String), Vec<u8>>,
    unavailable: AtomicBool,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail as if the platform storage were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(AppError::SubstrateUnavailable {
                message: "in-memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStorePort for InMemoryKeyValueStore {
    async fn read(&self, partition: StoragePartition, key: &str) -> AppResult<Option<Vec<u8>>> {
        self.ensure_available()?;
        let blob = self
            .blobs
            .get(&(partition, key.to_string()))
            .map(|entry| entry.value().clone());
        debug!(%partition, key, found = blob.is_some(), "In-memory read");
        Ok(blob)
    }

    async fn write(&self, partition: StoragePartition, key: &str, blob: Vec<u8>) -> AppResult<()> {
        self.ensure_available()?;
        debug!(%partition, key, bytes = blob.len(), "In-memory write");
        self.blobs.insert((partition, key.to_string()), blob);
        Ok(())
    }
}
