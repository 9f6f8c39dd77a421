use deadpool_redis::{Connection as RedisConnection, Pool as RedisPool, redis::AsyncCommands};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, instrument};

use tempmod_application::{
    error::{AppError, AppResult},
    ports::outgoing::kv_store::{KeyValueStorePort, StoragePartition},
};

use super::keys::RedisKeyBuilder;

/// Redis-backed substrate. Each logical key maps to one Redis string, so a
/// write is atomic for that key and nothing more.
pub struct RedisKeyValueStoreAdapter {
    redis_pool: RedisPool,
    redis_keys: RedisKeyBuilder,
    connect_timeout: Duration,
}

impl RedisKeyValueStoreAdapter {
    pub fn new(
        redis_pool: RedisPool,
        root_namespace: &str,
        namespace_env: &str,
        connect_timeout_ms: u64,
    ) -> Self {
        Self {
            redis_pool,
            redis_keys: RedisKeyBuilder::new(root_namespace, namespace_env),
            connect_timeout: Duration::from_millis(connect_timeout_ms),
        }
    }

    pub async fn get_redis_connection(&self) -> AppResult<RedisConnection> {
        match timeout(self.connect_timeout, self.redis_pool.get()).await {
            Ok(conn) => conn.map_err(|e| AppError::SubstrateUnavailable {
                message: format!("Failed to get Redis connection: {}", e),
            }),
            Err(_) => Err(AppError::SubstrateUnavailable {
                message: "Redis connection timeout".to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStorePort for RedisKeyValueStoreAdapter {
    #[instrument(skip(self))]
    async fn read(&self, partition: StoragePartition, key: &str) -> AppResult<Option<Vec<u8>>> {
        let mut conn = self.get_redis_connection().await?;
        let redis_key = self.redis_keys.blob_key(partition, key);

        let blob: Option<Vec<u8>> =
            conn.get(&redis_key)
                .await
                .map_err(|e| AppError::SubstrateUnavailable {
                    message: format!("Failed to read {}: {}", redis_key, e),
                })?;

        debug!(
            "Read {} ({})",
            redis_key,
            blob.as_ref()
                .map_or_else(|| "absent".to_string(), |b| format!("{} bytes", b.len()))
        );
        Ok(blob)
    }

    #[instrument(skip(self, blob), fields(bytes = blob.len()))]
    async fn write(&self, partition: StoragePartition, key: &str, blob: Vec<u8>) -> AppResult<()> {
        let mut conn = self.get_redis_connection().await?;
        let redis_key = self.redis_keys.blob_key(partition, key);

        let _: () = conn
            .set(&redis_key, blob)
            .await
            .map_err(|e| AppError::SubstrateUnavailable {
                message: format!("Failed to write {}: {}", redis_key, e),
            })?;

        debug!("Wrote {}", redis_key);
        Ok(())
    }
}
