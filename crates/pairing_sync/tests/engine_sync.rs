use std::future::Future;
use std::pin::Pin;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use anyhow::Result;
use pairing_core::{Room, RoomsInfo, SEED_PARTICIPANTS};
use pairing_sync::{RoomsStore, StoreService, SyncEngine, SyncError};

#[derive(Default)]
struct MemoryStore {
    remote: Mutex<Option<RoomsInfo>>,
    writes: Mutex<Vec<RoomsInfo>>,
    fail_store: AtomicBool,
}

impl MemoryStore {
    fn with_remote(info: RoomsInfo) -> Self {
        Self {
            remote: Mutex::new(Some(info)),
            ..Self::default()
        }
    }

    fn set_remote(&self, info: RoomsInfo) {
        *self.remote.lock().unwrap() = Some(info);
    }

    fn set_fail_store(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    fn last_write(&self) -> Option<RoomsInfo> {
        self.writes.lock().unwrap().last().cloned()
    }
}

impl RoomsStore for MemoryStore {
    fn fetch<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RoomsInfo>> + Send + 'a>> {
        Box::pin(async move {
            self.remote
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no record stored under key {key}"))
        })
    }

    fn store<'a>(
        &'a self,
        _key: &'a str,
        info: &'a RoomsInfo,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail_store.load(Ordering::SeqCst) {
                return Err(anyhow::anyhow!("storage rejected the write"));
            }
            self.writes.lock().unwrap().push(info.clone());
            *self.remote.lock().unwrap() = Some(info.clone());
            Ok(())
        })
    }
}

fn engine_with(store: Arc<MemoryStore>) -> SyncEngine {
    SyncEngine::new(StoreService::new(store), Duration::from_secs(3))
}

fn populated_remote() -> RoomsInfo {
    RoomsInfo {
        names: vec!["Ada".to_string(), "Grace".to_string()],
        rooms: vec![Room {
            id: 1,
            name: "Mob room".to_string(),
            link: None,
        }],
        assignations: Vec::new(),
        description: None,
        until_date: None,
        rotation_frequency: None,
    }
}

#[tokio::test(start_paused = true)]
async fn a_burst_of_edits_collapses_into_one_write_of_the_final_snapshot() {
    let store = Arc::new(MemoryStore::with_remote(RoomsInfo::seed()));
    let engine = engine_with(store.clone());
    engine.activate("k-1").await.unwrap();

    engine.add_participant("Marta").await;
    let room_id = engine.create_room("Room 1").await;
    engine.start_drag("Paco").await;
    engine.drop_on_room(room_id).await;
    engine.rename_room(room_id, "Focus").await;
    engine
        .set_room_link(room_id, "https://example.test/focus")
        .await;

    tokio::time::sleep(Duration::from_secs(4)).await;

    assert_eq!(store.write_count(), 1);
    let written = store.last_write().unwrap();
    assert_eq!(written, engine.snapshot().await);
    assert!(written.names.contains(&"Marta".to_string()));
    assert_eq!(written.room(room_id).unwrap().name, "Focus");
    assert_eq!(
        engine.participants_of_room(room_id).await,
        vec!["Paco".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn every_edit_rearms_the_quiescence_window() {
    let store = Arc::new(MemoryStore::with_remote(RoomsInfo::seed()));
    let engine = engine_with(store.clone());
    engine.activate("k-1").await.unwrap();

    engine.add_participant("Marta").await;
    tokio::time::sleep(Duration::from_secs(2)).await;
    engine.add_participant("Iris").await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    // 4s in, but only 2s since the last edit: nothing may have fired yet.
    assert_eq!(store.write_count(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(store.write_count(), 1);
    let written = store.last_write().unwrap();
    assert!(written.names.contains(&"Iris".to_string()));
}

#[tokio::test(start_paused = true)]
async fn a_failed_fetch_keeps_the_seed_and_suppresses_writes() {
    let store = Arc::new(MemoryStore::default());
    let engine = engine_with(store.clone());

    let error = engine.activate("k-1").await.unwrap_err();
    assert!(matches!(error, SyncError::FetchFailed(_)));

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.names, SEED_PARTICIPANTS);
    assert!(snapshot.rooms.is_empty());
    assert!(snapshot.assignations.is_empty());

    engine.add_participant("Marta").await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(store.write_count(), 0);

    // A later successful activation lifts the write suppression.
    store.set_remote(populated_remote());
    engine.activate("k-1").await.unwrap();
    engine.add_participant("Marta").await;
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(store.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn activation_replaces_the_local_snapshot_wholesale() {
    let store = Arc::new(MemoryStore::with_remote(populated_remote()));
    let engine = engine_with(store.clone());

    // Edits made before reconciliation are discarded: the fetch result wins.
    engine.add_participant("Marta").await;
    engine.activate("k-1").await.unwrap();

    assert_eq!(engine.snapshot().await, populated_remote());
    assert_eq!(
        engine.unassigned_participants().await,
        vec!["Ada".to_string(), "Grace".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn deactivate_cancels_the_pending_write() {
    let store = Arc::new(MemoryStore::with_remote(RoomsInfo::seed()));
    let engine = engine_with(store.clone());
    engine.activate("k-1").await.unwrap();

    engine.add_participant("Marta").await;
    engine.deactivate().await;

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(store.write_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn a_failed_store_is_swallowed_and_later_edits_reschedule() {
    let store = Arc::new(MemoryStore::with_remote(RoomsInfo::seed()));
    store.set_fail_store(true);
    let engine = engine_with(store.clone());
    engine.activate("k-1").await.unwrap();

    engine.add_participant("Marta").await;
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(store.write_count(), 0);

    // The failed snapshot is not retried, but the engine keeps working.
    assert!(engine.snapshot().await.names.contains(&"Marta".to_string()));

    store.set_fail_store(false);
    engine.add_participant("Iris").await;
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(store.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn drag_tracking_alone_schedules_no_write() {
    let store = Arc::new(MemoryStore::with_remote(RoomsInfo::seed()));
    let engine = engine_with(store.clone());
    engine.activate("k-1").await.unwrap();

    engine.start_drag("Paco").await;
    engine.cancel_drag().await;
    engine.drop_on_room(1).await;

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(store.write_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn edits_targeting_missing_rooms_are_ignored() {
    let store = Arc::new(MemoryStore::with_remote(RoomsInfo::seed()));
    let engine = engine_with(store.clone());
    engine.activate("k-1").await.unwrap();
    let before = engine.snapshot().await;

    engine.rename_room(42, "Ghost").await;
    engine.set_room_link(42, "https://example.test/ghost").await;

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(store.write_count(), 0);
    assert_eq!(engine.snapshot().await, before);
}
