//! The moderation store handed to presentation code and scheduler glue.
//!
//! Constructed explicitly from its ports; there is no process-wide instance.

use std::sync::Arc;

use crate::error::AppResult;
use crate::history::service::ActionHistoryService;
use crate::ports::incoming::{history::ActionHistoryUseCase, temp_state::TempStateUseCase};
use crate::ports::outgoing::{
    clock::ClockPort, kv_store::KeyValueStorePort, scheduler::SchedulerNotifierPort,
};
use crate::temp_state::service::TempStateService;
use domain::{
    actor::ActorId,
    history::{HistoryEntry, NewHistoryEntry},
    temp_entry::{TempEntry, TempEntryMap, TempKind},
};

#[derive(Clone)]
pub struct ModerationStore {
    temp_blocks: Arc<dyn TempStateUseCase>,
    temp_mutes: Arc<dyn TempStateUseCase>,
    history: Arc<dyn ActionHistoryUseCase>,
    clock: Arc<dyn ClockPort>,
}

pub struct ModerationStoreDeps {
    pub store: Arc<dyn KeyValueStorePort>,
    pub notifier: Arc<dyn SchedulerNotifierPort>,
    pub clock: Arc<dyn ClockPort>,
    pub default_duration_ms: i64,
}

impl ModerationStore {
    pub fn new(deps: ModerationStoreDeps) -> Self {
        let temp_state = |kind: TempKind| -> Arc<dyn TempStateUseCase> {
            Arc::new(TempStateService::new(
                kind,
                Arc::clone(&deps.store),
                Arc::clone(&deps.notifier),
                Arc::clone(&deps.clock),
                deps.default_duration_ms,
            ))
        };

        Self {
            temp_blocks: temp_state(TempKind::Block),
            temp_mutes: temp_state(TempKind::Mute),
            history: Arc::new(ActionHistoryService::new(
                Arc::clone(&deps.store),
                Arc::clone(&deps.clock),
            )),
            clock: Arc::clone(&deps.clock),
        }
    }

    pub fn temp_state(&self, kind: TempKind) -> &Arc<dyn TempStateUseCase> {
        match kind {
            TempKind::Block => &self.temp_blocks,
            TempKind::Mute => &self.temp_mutes,
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub async fn get_temp_blocks(&self) -> AppResult<TempEntryMap> {
        self.temp_blocks.get_all().await
    }

    pub async fn get_temp_mutes(&self) -> AppResult<TempEntryMap> {
        self.temp_mutes.get_all().await
    }

    pub async fn add_temp_block(
        &self,
        identifier: ActorId,
        handle: String,
        duration_ms: Option<i64>,
    ) -> AppResult<TempEntry> {
        self.temp_blocks.add(identifier, handle, duration_ms).await
    }

    pub async fn remove_temp_block(&self, identifier: &ActorId) -> AppResult<()> {
        self.temp_blocks.remove(identifier).await
    }

    pub async fn add_temp_mute(
        &self,
        identifier: ActorId,
        handle: String,
        duration_ms: Option<i64>,
    ) -> AppResult<TempEntry> {
        self.temp_mutes.add(identifier, handle, duration_ms).await
    }

    pub async fn remove_temp_mute(&self, identifier: &ActorId) -> AppResult<()> {
        self.temp_mutes.remove(identifier).await
    }

    pub async fn get_action_history(&self) -> AppResult<Vec<HistoryEntry>> {
        self.history.get_all().await
    }

    pub async fn add_history_entry(&self, entry: NewHistoryEntry) -> AppResult<HistoryEntry> {
        self.history.append(entry).await
    }

    pub async fn remove_all_expired_blocks(&self) -> AppResult<usize> {
        self.temp_blocks.remove_all_expired(self.now_ms()).await
    }

    pub async fn remove_all_expired_mutes(&self) -> AppResult<usize> {
        self.temp_mutes.remove_all_expired(self.now_ms()).await
    }
}
