use crate::error::AppResult;
use domain::{
    actor::ActorId,
    temp_entry::{TempEntry, TempEntryMap, TempKind},
};

#[async_trait::async_trait]
pub trait TempStateUseCase: Send + Sync {
    fn kind(&self) -> TempKind;

    async fn get_all(&self) -> AppResult<TempEntryMap>;

    async fn add(
        &self,
        identifier: ActorId,
        handle: String,
        duration_ms: Option<i64>,
    ) -> AppResult<TempEntry>;

    async fn remove(&self, identifier: &ActorId) -> AppResult<()>;

    async fn remove_all_expired(&self, now_ms: i64) -> AppResult<usize>;
}
