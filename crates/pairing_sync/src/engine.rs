use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use log::{debug, info, warn};
use pairing_core::{RoomId, RoomsInfo, RoomsSession};
use thiserror::Error;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::config::SyncConfig;
use crate::store::StoreService;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch the remote snapshot: {0:#}")]
    FetchFailed(anyhow::Error),
    #[error("failed to store the snapshot remotely: {0:#}")]
    StoreFailed(anyhow::Error),
}

struct EngineState {
    session: RoomsSession,
    key: Option<String>,
}

struct EngineInner {
    state: Mutex<EngineState>,
    pending: Mutex<Option<JoinHandle<()>>>,
    // Set once the initial fetch completed; scheduled writes are gated on it
    // so stale local defaults can never clobber a populated remote record.
    synced: AtomicBool,
}

/// Keeps the local session reconciled with the remote store: fetches the
/// remote snapshot on activation and pushes the latest local snapshot after
/// every burst of edits, once the quiescence window elapses.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
    store: StoreService,
    quiescence: Duration,
}

impl SyncEngine {
    pub fn new(store: StoreService, quiescence: Duration) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                state: Mutex::new(EngineState {
                    session: RoomsSession::new(),
                    key: None,
                }),
                pending: Mutex::new(None),
                synced: AtomicBool::new(false),
            }),
            store,
            quiescence,
        }
    }

    pub fn with_config(store: StoreService, config: &SyncConfig) -> Self {
        Self::new(store, config.quiescence())
    }

    /// Fetches the remote snapshot for `key` and replaces the local one
    /// wholesale. On failure the local snapshot stays active and remote
    /// writes remain suppressed until a later activation succeeds; there is
    /// no automatic retry.
    pub async fn activate(&self, key: impl Into<String>) -> Result<(), SyncError> {
        let key = key.into();
        self.cancel_pending().await;
        {
            let mut state = self.inner.state.lock().await;
            state.key = Some(key.clone());
        }

        match self.store.fetch(&key).await {
            Ok(info) => {
                let mut state = self.inner.state.lock().await;
                state.session.adopt(info);
                self.inner.synced.store(true, Ordering::SeqCst);
                info!("adopted the remote rooms snapshot for key {key}");
                Ok(())
            }
            Err(error) => {
                self.inner.synced.store(false, Ordering::SeqCst);
                let error = SyncError::FetchFailed(error);
                warn!("{error}; keeping the local snapshot");
                Err(error)
            }
        }
    }

    /// Drops the synchronization key and cancels any pending write so a
    /// stale timer cannot fire later with an outdated key or snapshot.
    pub async fn deactivate(&self) {
        self.cancel_pending().await;
        let mut state = self.inner.state.lock().await;
        state.key = None;
        self.inner.synced.store(false, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> RoomsInfo {
        self.inner.state.lock().await.session.snapshot().clone()
    }

    pub async fn unassigned_participants(&self) -> Vec<String> {
        let state = self.inner.state.lock().await;
        state
            .session
            .snapshot()
            .unassigned_participants()
            .map(str::to_string)
            .collect()
    }

    pub async fn participants_of_room(&self, room_id: RoomId) -> Vec<String> {
        let state = self.inner.state.lock().await;
        state
            .session
            .snapshot()
            .participants_of_room(room_id)
            .map(str::to_string)
            .collect()
    }

    pub async fn start_drag(&self, name: impl Into<String>) {
        let mut state = self.inner.state.lock().await;
        state.session.start_drag(name);
    }

    pub async fn cancel_drag(&self) {
        let mut state = self.inner.state.lock().await;
        state.session.cancel_drag();
    }

    pub async fn drop_on_room(&self, room_id: RoomId) {
        let changed = {
            let mut state = self.inner.state.lock().await;
            state.session.drop_on_room(room_id)
        };
        if changed {
            self.schedule_write().await;
        }
    }

    pub async fn drop_on_unassigned(&self) {
        let changed = {
            let mut state = self.inner.state.lock().await;
            state.session.drop_on_unassigned()
        };
        if changed {
            self.schedule_write().await;
        }
    }

    pub async fn drop_on_new_room(&self) -> Option<RoomId> {
        let created = {
            let mut state = self.inner.state.lock().await;
            state.session.drop_on_new_room()
        };
        if created.is_some() {
            self.schedule_write().await;
        }
        created
    }

    pub async fn add_participant(&self, name: impl Into<String>) {
        let changed = {
            let mut state = self.inner.state.lock().await;
            state.session.add_participant(name)
        };
        if changed {
            self.schedule_write().await;
        }
    }

    pub async fn create_room(&self, name: impl Into<String>) -> RoomId {
        let room_id = {
            let mut state = self.inner.state.lock().await;
            state.session.create_room(name)
        };
        self.schedule_write().await;
        room_id
    }

    /// Renaming a room that no longer exists is ignored and reported; the
    /// snapshot is left untouched.
    pub async fn rename_room(&self, room_id: RoomId, name: impl Into<String>) {
        let result = {
            let mut state = self.inner.state.lock().await;
            state.session.rename_room(room_id, name)
        };
        match result {
            Ok(()) => self.schedule_write().await,
            Err(error) => warn!("ignoring rename: {error}"),
        }
    }

    pub async fn set_room_link(&self, room_id: RoomId, link: impl Into<String>) {
        let result = {
            let mut state = self.inner.state.lock().await;
            state.session.set_room_link(room_id, link)
        };
        match result {
            Ok(()) => self.schedule_write().await,
            Err(error) => warn!("ignoring link change: {error}"),
        }
    }

    async fn cancel_pending(&self) {
        let mut pending = self.inner.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }

    // Cancel-and-replace: at most one timer is outstanding per key. The task
    // re-reads the session at fire time, so superseded intermediate
    // snapshots are never sent.
    async fn schedule_write(&self) {
        if !self.inner.synced.load(Ordering::SeqCst) {
            debug!("skipping the remote write: initial fetch has not completed");
            return;
        }

        let engine = self.clone();
        let mut pending = self.inner.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(engine.quiescence).await;

            let (key, snapshot) = {
                let state = engine.inner.state.lock().await;
                let Some(key) = state.key.clone() else {
                    return;
                };
                (key, state.session.snapshot().clone())
            };

            if let Err(error) = engine.store.store(&key, &snapshot).await {
                // Accepted data-loss risk: the write is not retried and the
                // failed snapshot is not queued.
                warn!("{}", SyncError::StoreFailed(error));
            }
        }));
    }
}
