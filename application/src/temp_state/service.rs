use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::ports::incoming::temp_state::TempStateUseCase;
use crate::ports::outgoing::{
    clock::ClockPort,
    kv_store::{KeyValueStorePort, StoragePartition},
    scheduler::SchedulerNotifierPort,
};
use crate::storage::{load_json, save_json};
use domain::{
    actor::ActorId,
    events::SchedulerNotification,
    temp_entry::{TempEntry, TempEntryMap, TempKind, retain_unexpired},
};

/// Temp maps live in the synced partition so they follow the user across
/// devices.
const TEMP_STATE_PARTITION: StoragePartition = StoragePartition::Synced;

/// What a read of one temp map found on the substrate.
enum StoredMap {
    Absent,
    Malformed,
    Decoded { entries: TempEntryMap, dropped: usize },
}

pub struct TempStateService {
    kind: TempKind,
    store: Arc<dyn KeyValueStorePort>,
    notifier: Arc<dyn SchedulerNotifierPort>,
    clock: Arc<dyn ClockPort>,
    default_duration_ms: i64,
}

impl TempStateService {
    pub fn new(
        kind: TempKind,
        store: Arc<dyn KeyValueStorePort>,
        notifier: Arc<dyn SchedulerNotifierPort>,
        clock: Arc<dyn ClockPort>,
        default_duration_ms: i64,
    ) -> Self {
        Self {
            kind,
            store,
            notifier,
            clock,
            default_duration_ms,
        }
    }

    fn key(&self) -> &'static str {
        self.kind.storage_key()
    }

    /// Decodes the map entry by entry so one bad record cannot hide the rest.
    async fn load(&self) -> AppResult<StoredMap> {
        let raw: Option<Value> =
            load_json(self.store.as_ref(), TEMP_STATE_PARTITION, self.key()).await?;

        let records: BTreeMap<String, Value> = match raw {
            None => return Ok(StoredMap::Absent),
            Some(value) => match serde_json::from_value(value) {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        kind = self.kind.label(),
                        error = %e,
                        "Stored temp map is not an object, ignoring it"
                    );
                    return Ok(StoredMap::Malformed);
                }
            },
        };

        let mut entries = TempEntryMap::new();
        let mut dropped = 0;
        for (identifier, value) in records {
            let decoded = ActorId::parse(&identifier)
                .map_err(|e| e.to_string())
                .and_then(|actor| {
                    serde_json::from_value::<TempEntry>(value)
                        .map(|entry| (actor, entry))
                        .map_err(|e| e.to_string())
                });
            match decoded {
                Ok((actor, entry)) => {
                    entries.insert(actor, entry);
                }
                Err(error) => {
                    dropped += 1;
                    warn!(
                        kind = self.kind.label(),
                        identifier = %identifier,
                        error = %error,
                        "Dropping malformed temp entry"
                    );
                }
            }
        }

        Ok(StoredMap::Decoded { entries, dropped })
    }

    async fn persist(&self, entries: &TempEntryMap) -> AppResult<()> {
        save_json(self.store.as_ref(), TEMP_STATE_PARTITION, self.key(), entries).await
    }

    fn announce(&self, identifier: &ActorId, expires_at: i64) {
        let notification = SchedulerNotification {
            kind: self.kind.notification_kind(),
            identifier: identifier.clone(),
            expires_at,
        };

        if let Err(e) = self.notifier.notify(notification) {
            warn!(
                kind = self.kind.label(),
                identifier = %identifier,
                expires_at,
                error = %e,
                "Scheduler notification not delivered, relying on sweep"
            );
        }
    }
}

#[async_trait::async_trait]
impl TempStateUseCase for TempStateService {
    fn kind(&self) -> TempKind {
        self.kind
    }

    async fn get_all(&self) -> AppResult<TempEntryMap> {
        let entries = match self.load().await? {
            StoredMap::Decoded { entries, .. } => entries,
            StoredMap::Absent | StoredMap::Malformed => TempEntryMap::new(),
        };
        debug!(
            kind = self.kind.label(),
            count = entries.len(),
            "Loaded temp entries"
        );
        Ok(entries)
    }

    async fn add(
        &self,
        identifier: ActorId,
        handle: String,
        duration_ms: Option<i64>,
    ) -> AppResult<TempEntry> {
        let duration_ms = duration_ms.unwrap_or(self.default_duration_ms);
        let entry = TempEntry::new(handle, self.clock.now_ms(), duration_ms)?;

        let mut entries = self.get_all().await?;
        entries.insert(identifier.clone(), entry.clone());
        self.persist(&entries).await?;

        info!(
            kind = self.kind.label(),
            identifier = %identifier,
            handle = %entry.handle,
            expires_at = entry.expires_at,
            "Temp entry stored"
        );

        // Only announce once the write is durable.
        self.announce(&identifier, entry.expires_at);

        Ok(entry)
    }

    async fn remove(&self, identifier: &ActorId) -> AppResult<()> {
        let mut entries = self.get_all().await?;
        let removed = entries.remove(identifier).is_some();
        self.persist(&entries).await?;

        if removed {
            info!(
                kind = self.kind.label(),
                identifier = %identifier,
                "Temp entry removed"
            );
        } else {
            debug!(
                kind = self.kind.label(),
                identifier = %identifier,
                "Temp entry already absent"
            );
        }
        Ok(())
    }

    async fn remove_all_expired(&self, now_ms: i64) -> AppResult<usize> {
        let (mut entries, dropped) = match self.load().await? {
            StoredMap::Absent => {
                debug!(kind = self.kind.label(), "Sweep found no stored map");
                return Ok(0);
            }
            // A blob that is not a map at all is normalised to `{}`.
            StoredMap::Malformed => (TempEntryMap::new(), 1),
            StoredMap::Decoded { entries, dropped } => (entries, dropped),
        };

        let evicted = retain_unexpired(&mut entries, now_ms);
        if evicted == 0 && dropped == 0 {
            debug!(kind = self.kind.label(), "Sweep found nothing expired");
            return Ok(0);
        }

        self.persist(&entries).await?;
        info!(
            kind = self.kind.label(),
            evicted,
            remaining = entries.len(),
            "Expired temp entries swept"
        );
        Ok(evicted)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use domain::events::NotificationKind;
    use domain::temp_entry::DEFAULT_TEMP_DURATION_MS;

    use super::*;
    use crate::error::AppError;
    use crate::test_support::{ManualClock, MemoryStore, RecordingNotifier};

    const T: i64 = 1_700_000_000_000;

    struct Fixture {
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
        clock: Arc<ManualClock>,
        service: TempStateService,
    }

    fn fixture(kind: TempKind) -> Fixture {
        fixture_with_notifier(kind, RecordingNotifier::default())
    }

    fn fixture_with_notifier(kind: TempKind, notifier: RecordingNotifier) -> Fixture {
        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(notifier);
        let clock = Arc::new(ManualClock::at(T));
        let service = TempStateService::new(
            kind,
            Arc::clone(&store) as Arc<dyn KeyValueStorePort>,
            Arc::clone(&notifier) as Arc<dyn SchedulerNotifierPort>,
            Arc::clone(&clock) as Arc<dyn ClockPort>,
            DEFAULT_TEMP_DURATION_MS,
        );
        Fixture {
            store,
            notifier,
            clock,
            service,
        }
    }

    fn actor(raw: &str) -> ActorId {
        ActorId::parse(raw).unwrap()
    }

    fn seed(store: &MemoryStore, kind: TempKind, expiries: &[(&str, i64)]) {
        let mut entries = TempEntryMap::new();
        for (id, expires_at) in expiries {
            entries.insert(
                actor(id),
                TempEntry {
                    handle: format!("{id}.test"),
                    created_at: 0,
                    expires_at: *expires_at,
                },
            );
        }
        store.put_raw(
            TEMP_STATE_PARTITION,
            kind.storage_key(),
            &serde_json::to_vec(&entries).unwrap(),
        );
    }

    #[tokio::test]
    async fn get_all_defaults_to_empty() {
        let f = fixture(TempKind::Block);
        assert!(f.service.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_stores_entry_and_notifies_scheduler() {
        let f = fixture(TempKind::Block);

        let entry = f
            .service
            .add(actor("did:abc"), "alice.test".to_string(), Some(3_600_000))
            .await
            .unwrap();

        assert_eq!(
            entry,
            TempEntry {
                handle: "alice.test".to_string(),
                created_at: T,
                expires_at: T + 3_600_000,
            }
        );
        let stored = f.service.get_all().await.unwrap();
        assert_eq!(stored.get(&actor("did:abc")), Some(&entry));

        assert_eq!(
            f.notifier.sent(),
            vec![SchedulerNotification {
                kind: NotificationKind::TempBlockAdded,
                identifier: actor("did:abc"),
                expires_at: T + 3_600_000,
            }]
        );
    }

    #[tokio::test]
    async fn mute_map_uses_its_own_key_and_kind() {
        let f = fixture(TempKind::Mute);
        f.service
            .add(actor("did:abc"), "alice.test".to_string(), Some(10))
            .await
            .unwrap();

        assert!(f.store.raw(TEMP_STATE_PARTITION, "temp_mutes").is_some());
        assert!(f.store.raw(TEMP_STATE_PARTITION, "temp_blocks").is_none());
        assert_eq!(f.notifier.sent()[0].kind, NotificationKind::TempMuteAdded);
    }

    #[tokio::test]
    async fn add_defaults_to_configured_duration() {
        let f = fixture(TempKind::Block);
        let entry = f
            .service
            .add(actor("did:abc"), "alice.test".to_string(), None)
            .await
            .unwrap();
        assert_eq!(entry.expires_at - entry.created_at, DEFAULT_TEMP_DURATION_MS);
    }

    #[tokio::test]
    async fn add_rejects_non_positive_duration_without_writing() {
        let f = fixture(TempKind::Block);
        let result = f
            .service
            .add(actor("did:abc"), "alice.test".to_string(), Some(0))
            .await;

        assert!(matches!(result, Err(AppError::Domain(_))));
        assert_eq!(f.store.write_count(), 0);
        assert!(f.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn second_add_overwrites_first() {
        let f = fixture(TempKind::Block);
        f.service
            .add(actor("did:abc"), "old.test".to_string(), Some(1_000))
            .await
            .unwrap();

        f.clock.set(T + 500);
        f.service
            .add(actor("did:abc"), "new.test".to_string(), Some(5_000))
            .await
            .unwrap();

        let stored = f.service.get_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        let entry = &stored[&actor("did:abc")];
        assert_eq!(entry.handle, "new.test");
        assert_eq!(entry.created_at, T + 500);
        assert_eq!(entry.expires_at, T + 5_500);
        assert_eq!(f.notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn notification_is_sent_after_write_is_durable() {
        struct DurabilityCheckingNotifier {
            store: Arc<MemoryStore>,
            seen: Mutex<Vec<bool>>,
        }

        impl SchedulerNotifierPort for DurabilityCheckingNotifier {
            fn notify(&self, notification: SchedulerNotification) -> AppResult<()> {
                let blob = self.store.raw(TEMP_STATE_PARTITION, "temp_blocks");
                let durable = blob
                    .and_then(|b| serde_json::from_slice::<TempEntryMap>(&b).ok())
                    .is_some_and(|m| m.contains_key(&notification.identifier));
                self.seen.lock().unwrap().push(durable);
                Ok(())
            }
        }

        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(DurabilityCheckingNotifier {
            store: Arc::clone(&store),
            seen: Mutex::new(Vec::new()),
        });
        let service = TempStateService::new(
            TempKind::Block,
            Arc::clone(&store) as Arc<dyn KeyValueStorePort>,
            Arc::clone(&notifier) as Arc<dyn SchedulerNotifierPort>,
            Arc::new(ManualClock::at(T)),
            DEFAULT_TEMP_DURATION_MS,
        );

        service
            .add(actor("did:abc"), "alice.test".to_string(), None)
            .await
            .unwrap();

        assert_eq!(*notifier.seen.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn failed_write_does_not_notify() {
        let f = fixture(TempKind::Block);
        f.store.fail_writes(true);

        let result = f
            .service
            .add(actor("did:abc"), "alice.test".to_string(), None)
            .await;

        assert!(matches!(result, Err(AppError::SubstrateUnavailable { .. })));
        assert!(f.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn unreachable_scheduler_does_not_fail_add() {
        let f = fixture_with_notifier(TempKind::Block, RecordingNotifier::unreachable());

        let entry = f
            .service
            .add(actor("did:abc"), "alice.test".to_string(), None)
            .await
            .unwrap();

        assert_eq!(
            f.service.get_all().await.unwrap().get(&actor("did:abc")),
            Some(&entry)
        );
    }

    #[tokio::test]
    async fn remove_deletes_entry_without_notifying() {
        let f = fixture(TempKind::Block);
        f.service
            .add(actor("did:abc"), "alice.test".to_string(), None)
            .await
            .unwrap();

        f.service.remove(&actor("did:abc")).await.unwrap();

        assert!(f.service.get_all().await.unwrap().is_empty());
        assert_eq!(f.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn remove_of_absent_identifier_is_a_no_op() {
        let f = fixture(TempKind::Block);
        seed(&f.store, TempKind::Block, &[("a", 100)]);
        let before = f.service.get_all().await.unwrap();

        f.service.remove(&actor("missing")).await.unwrap();

        assert_eq!(f.service.get_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn sweep_drops_expired_entries() {
        let f = fixture(TempKind::Block);
        seed(&f.store, TempKind::Block, &[("a", 100), ("b", 200)]);

        let evicted = f.service.remove_all_expired(150).await.unwrap();

        assert_eq!(evicted, 1);
        let remaining = f.service.get_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[&actor("b")].expires_at, 200);
    }

    #[tokio::test]
    async fn sweep_is_idempotent() {
        let f = fixture(TempKind::Mute);
        seed(&f.store, TempKind::Mute, &[("a", 100), ("b", 200), ("c", 300)]);

        f.service.remove_all_expired(250).await.unwrap();
        let once = f.service.get_all().await.unwrap();
        let writes_after_first = f.store.write_count();

        assert_eq!(f.service.remove_all_expired(250).await.unwrap(), 0);
        assert_eq!(f.service.get_all().await.unwrap(), once);
        assert_eq!(f.store.write_count(), writes_after_first);
    }

    #[tokio::test]
    async fn sweep_on_empty_map_does_not_fail() {
        let f = fixture(TempKind::Block);
        assert_eq!(f.service.remove_all_expired(T).await.unwrap(), 0);
        assert!(f.service.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_blob_reads_as_empty_and_is_reset_by_sweep() {
        let f = fixture(TempKind::Block);
        f.store
            .put_raw(TEMP_STATE_PARTITION, "temp_blocks", b"{\"a\": 42}");

        assert!(f.service.get_all().await.unwrap().is_empty());
        assert_eq!(f.service.remove_all_expired(T).await.unwrap(), 0);
        assert_eq!(
            f.store.raw(TEMP_STATE_PARTITION, "temp_blocks").unwrap(),
            b"{}".to_vec()
        );
    }

    #[tokio::test]
    async fn sweep_of_never_written_map_does_not_write() {
        let f = fixture(TempKind::Mute);

        assert_eq!(f.service.remove_all_expired(T).await.unwrap(), 0);

        assert_eq!(f.store.write_count(), 0);
        assert!(f.store.raw(TEMP_STATE_PARTITION, "temp_mutes").is_none());
    }

    fn seed_with_bad_record(store: &MemoryStore) {
        store.put_raw(
            TEMP_STATE_PARTITION,
            "temp_blocks",
            br#"{
                "did:good": {"handle": "g", "createdAt": 0, "expiresAt": 9999999999999},
                "did:bad": {"handle": "b", "createdAt": 0},
                "": {"handle": "e", "createdAt": 0, "expiresAt": 9999999999999}
            }"#,
        );
    }

    #[tokio::test]
    async fn bad_record_does_not_hide_valid_entries() {
        let f = fixture(TempKind::Block);
        seed_with_bad_record(&f.store);

        let entries = f.service.get_all().await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[&actor("did:good")].handle, "g");
    }

    #[tokio::test]
    async fn add_next_to_bad_record_keeps_valid_entries() {
        let f = fixture(TempKind::Block);
        seed_with_bad_record(&f.store);
        f.clock.set(1_000);

        f.service
            .add(actor("did:new"), "n".to_string(), Some(1_000))
            .await
            .unwrap();

        let stored: TempEntryMap =
            serde_json::from_slice(&f.store.raw(TEMP_STATE_PARTITION, "temp_blocks").unwrap())
                .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[&actor("did:good")].expires_at, 9_999_999_999_999);
        assert_eq!(stored[&actor("did:new")].expires_at, 2_000);
    }

    #[tokio::test]
    async fn sweep_drops_bad_records_and_keeps_active_entries() {
        let f = fixture(TempKind::Block);
        seed_with_bad_record(&f.store);

        assert_eq!(f.service.remove_all_expired(T).await.unwrap(), 0);

        let stored: TempEntryMap =
            serde_json::from_slice(&f.store.raw(TEMP_STATE_PARTITION, "temp_blocks").unwrap())
                .unwrap();
        assert_eq!(stored.keys().collect::<Vec<_>>(), vec![&actor("did:good")]);
    }

    #[tokio::test]
    async fn read_failure_propagates() {
        let f = fixture(TempKind::Block);
        f.store.fail_reads(true);

        assert!(matches!(
            f.service.get_all().await,
            Err(AppError::SubstrateUnavailable { .. })
        ));
        assert!(matches!(
            f.service.remove(&actor("a")).await,
            Err(AppError::SubstrateUnavailable { .. })
        ));
        assert!(matches!(
            f.service.remove_all_expired(T).await,
            Err(AppError::SubstrateUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn expiry_is_creation_plus_duration_for_many_durations() {
        let f = fixture(TempKind::Block);
        for (i, duration) in [1_i64, 60_000, 3_600_000, 7 * 86_400_000].iter().enumerate() {
            f.clock.set(T + i as i64);
            let entry = f
                .service
                .add(actor(&format!("did:{i}")), "h".to_string(), Some(*duration))
                .await
                .unwrap();
            assert_eq!(entry.expires_at, entry.created_at + duration);
            assert!(entry.expires_at > entry.created_at);
        }
    }
}
