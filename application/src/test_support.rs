#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use domain::events::SchedulerNotification;

use crate::error::{AppError, AppResult};
use crate::ports::outgoing::{
    clock::ClockPort,
    kv_store::{KeyValueStorePort, StoragePartition},
    scheduler::SchedulerNotifierPort,
};

#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<(StoragePartition, String), Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn put_raw(&self, partition: StoragePartition, key: &str, blob: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert((partition, key.to_string()), blob.to_vec());
    }

    pub fn raw(&self, partition: StoragePartition, key: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(&(partition, key.to_string()))
            .cloned()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl KeyValueStorePort for MemoryStore {
    async fn read(&self, partition: StoragePartition, key: &str) -> AppResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::SubstrateUnavailable {
                message: "read failed".to_string(),
            });
        }
        Ok(self.raw(partition, key))
    }

    async fn write(&self, partition: StoragePartition, key: &str, blob: Vec<u8>) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::SubstrateUnavailable {
                message: "quota exceeded".to_string(),
            });
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.blobs
            .lock()
            .unwrap()
            .insert((partition, key.to_string()), blob);
        Ok(())
    }
}

pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(now_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SchedulerNotification>>,
    unreachable: AtomicBool,
}

impl RecordingNotifier {
    pub fn unreachable() -> Self {
        let notifier = Self::default();
        notifier.unreachable.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn sent(&self) -> Vec<SchedulerNotification> {
        self.sent.lock().unwrap().clone()
    }
}

impl SchedulerNotifierPort for RecordingNotifier {
    fn notify(&self, notification: SchedulerNotification) -> AppResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AppError::NotificationUndeliverable {
                message: "scheduler not listening".to_string(),
            });
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}
