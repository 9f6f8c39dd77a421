use std::sync::Arc;

use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::ports::incoming::history::ActionHistoryUseCase;
use crate::ports::outgoing::{
    clock::ClockPort,
    kv_store::{KeyValueStorePort, StoragePartition},
};
use crate::storage::{load_json, save_json};
use domain::history::{HistoryEntry, MAX_HISTORY_ENTRIES, NewHistoryEntry};

const HISTORY_KEY: &str = "action_history";
const HISTORY_PARTITION: StoragePartition = StoragePartition::Local;
const ID_SUFFIX_LEN: usize = 9;

/// Newest-first, capped log of moderation actions. Concurrent appends follow
/// the same last-writer-wins rule as every other key.
pub struct ActionHistoryService {
    store: Arc<dyn KeyValueStorePort>,
    clock: Arc<dyn ClockPort>,
}

impl ActionHistoryService {
    pub fn new(store: Arc<dyn KeyValueStorePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    /// Timestamp plus random suffix: unique in practice, not guaranteed.
    fn generate_id(&self) -> String {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(ID_SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        format!("{}-{}", self.clock.now_ms(), suffix)
    }

    async fn load(&self) -> AppResult<Vec<HistoryEntry>> {
        let raw: Option<Vec<Value>> =
            load_json(self.store.as_ref(), HISTORY_PARTITION, HISTORY_KEY).await?;

        let mut entries: Vec<HistoryEntry> = raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<HistoryEntry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Dropping malformed history entry");
                    None
                }
            })
            .collect();

        entries.truncate(MAX_HISTORY_ENTRIES);
        Ok(entries)
    }
}

#[async_trait::async_trait]
impl ActionHistoryUseCase for ActionHistoryService {
    async fn get_all(&self) -> AppResult<Vec<HistoryEntry>> {
        let entries = self.load().await?;
        debug!(count = entries.len(), "Loaded action history");
        Ok(entries)
    }

    async fn append(&self, entry: NewHistoryEntry) -> AppResult<HistoryEntry> {
        let entry = entry.into_entry(|| self.generate_id());

        let mut entries = self.load().await?;
        entries.insert(0, entry.clone());
        entries.truncate(MAX_HISTORY_ENTRIES);

        save_json(
            self.store.as_ref(),
            HISTORY_PARTITION,
            HISTORY_KEY,
            &entries,
        )
        .await?;

        info!(
            id = %entry.id,
            action = entry.action().unwrap_or("unknown"),
            size = entries.len(),
            "History entry recorded"
        );
        Ok(entry)
    }
}
