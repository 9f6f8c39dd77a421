use crate::error::AppResult;
use domain::history::{HistoryEntry, NewHistoryEntry};

#[async_trait::async_trait]
pub trait ActionHistoryUseCase: Send + Sync {
    async fn get_all(&self) -> AppResult<Vec<HistoryEntry>>;

    async fn append(&self, entry: NewHistoryEntry) -> AppResult<HistoryEntry>;
}
