use std::fmt;
use std::sync::Arc;

use crate::error::AppResult;

/// Logical partitions of the durable substrate. `Synced` propagates across a
/// user's devices; `Local` stays on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoragePartition {
    Synced,
    Local,
}

impl StoragePartition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Synced => "sync",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for StoragePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque get/set of named blobs. Atomic per key only; no cross-key
/// transactions and no ordering across partitions.
#[async_trait::async_trait]
pub trait KeyValueStorePort: Send + Sync {
    async fn read(&self, partition: StoragePartition, key: &str) -> AppResult<Option<Vec<u8>>>;

    async fn write(&self, partition: StoragePartition, key: &str, blob: Vec<u8>) -> AppResult<()>;
}

pub type DynKeyValueStorePort = Arc<dyn KeyValueStorePort>;
