//! Whole-blob JSON persistence on top of [`KeyValueStorePort`].
//!
//! Every operation in this crate is a read-modify-write of one key. Two
//! writers racing on the same key resolve as last-writer-wins: whichever
//! snapshot is written last replaces the other wholesale. The substrate offers
//! no transactions, so no client-side lock is attempted.

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::ports::outgoing::kv_store::{KeyValueStorePort, StoragePartition};

/// Reads `key` and decodes it as `T`. Absent, empty or undecodable blobs
/// yield `None`; only substrate failures are errors.
pub async fn load_json<T>(
    store: &dyn KeyValueStorePort,
    partition: StoragePartition,
    key: &str,
) -> AppResult<Option<T>>
where
    T: DeserializeOwned,
{
    let Some(blob) = store.read(partition, key).await? else {
        debug!(%partition, key, "No stored value, using default");
        return Ok(None);
    };

    if blob.iter().all(u8::is_ascii_whitespace) {
        debug!(%partition, key, "Stored value is empty, using default");
        return Ok(None);
    }

    match serde_json::from_slice::<T>(&blob) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(
                %partition,
                key,
                error = %e,
                "Ignoring malformed stored value"
            );
            Ok(None)
        }
    }
}

pub async fn save_json<T>(
    store: &dyn KeyValueStorePort,
    partition: StoragePartition,
    key: &str,
    value: &T,
) -> AppResult<()>
where
    T: Serialize + ?Sized,
{
    let blob = serde_json::to_vec(value)?;
    store.write(partition, key, blob).await
}
