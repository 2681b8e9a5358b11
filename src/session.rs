//! Session: the ignore list for one run of the program
//!
//! Owns the [`IgnoreStore`] and the optional remote. Reads and local writes
//! are synchronous; everything that touches the remote is spawned on the
//! Tokio runtime and handed back as a handle the caller may await or drop.
//! Dropping a handle detaches the task, it is never cancelled.

use anyhow::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::SyncError;
use crate::filter::{self, Decision, PostRecord};
use crate::remote::{sync_remote, RemoteDocument, SkipReason, SyncOutcome};
use crate::store::{Clock, IgnoreList, IgnoreStore, KeyValueStore, Snapshot};

/// Result of the background reconciliation started by [`Session::load`]
#[derive(Debug)]
pub enum LoadOutcome {
    /// The remote was newer; the session now holds this list
    Replaced(IgnoreList),
    KeptLocal,
    /// No remote configured
    Skipped,
    Failed(SyncError),
}

/// Background reconciliation handle
#[derive(Debug)]
pub enum PendingLoad {
    Skipped,
    Running(JoinHandle<LoadOutcome>),
}

impl PendingLoad {
    pub async fn outcome(self) -> LoadOutcome {
        match self {
            Self::Skipped => LoadOutcome::Skipped,
            Self::Running(handle) => handle
                .await
                .unwrap_or_else(|err| LoadOutcome::Failed(SyncError::Task(err.to_string()))),
        }
    }
}

/// Fire-and-forget remote write handle
#[derive(Debug)]
pub enum PendingSync {
    Skipped(SkipReason),
    Running(JoinHandle<SyncOutcome>),
}

impl PendingSync {
    /// Whether the mutation that produced this handle changed the list
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Skipped(SkipReason::Unchanged))
    }

    pub async fn outcome(self) -> SyncOutcome {
        match self {
            Self::Skipped(reason) => SyncOutcome::Skipped(reason),
            Self::Running(handle) => handle
                .await
                .unwrap_or_else(|err| SyncOutcome::Failed(SyncError::Task(err.to_string()))),
        }
    }
}

pub struct Session {
    store: Arc<Mutex<IgnoreStore>>,
    remote: Option<Arc<dyn RemoteDocument>>,
    clock: Clock,
    changes: Arc<watch::Sender<IgnoreList>>,
}

impl Session {
    pub fn new(store: IgnoreStore, remote: Option<Arc<dyn RemoteDocument>>) -> Self {
        let clock = store.clock();
        let (changes, _) = watch::channel(store.entries().clone());
        Self {
            store: Arc::new(Mutex::new(store)),
            remote,
            clock,
            changes: Arc::new(changes),
        }
    }

    /// Session without a remote, reading the cache from `kv`
    pub fn local(kv: Box<dyn KeyValueStore + Send>, clock: Clock) -> Result<Self> {
        Ok(Self::new(IgnoreStore::open(kv, clock)?, None))
    }

    pub fn is_local_only(&self) -> bool {
        self.remote.is_none()
    }

    /// Current list, plus a handle to the remote reconciliation.
    ///
    /// The list is returned without waiting on the network. If the remote
    /// turns out to be newer, the session adopts it and subscribers see the
    /// new list.
    pub fn load(&self) -> (IgnoreList, PendingLoad) {
        let local = self.entries();
        let Some(remote) = self.remote.clone() else {
            return (local, PendingLoad::Skipped);
        };

        let store = Arc::clone(&self.store);
        let changes = Arc::clone(&self.changes);
        let handle = tokio::spawn(async move {
            match remote.fetch().await {
                Ok(fetched) => adopt(&store, &changes, fetched),
                Err(err) => {
                    tracing::warn!(error = %err, "remote fetch failed, using local list");
                    LoadOutcome::Failed(err)
                }
            }
        });

        (local, PendingLoad::Running(handle))
    }

    /// [`load`](Self::load) and wait for the reconciliation to finish.
    ///
    /// Mutations that push to the remote must follow this, otherwise a stale
    /// cache overwrites a newer remote list.
    pub async fn reconcile(&self) -> LoadOutcome {
        let (_, pending) = self.load();
        pending.outcome().await
    }

    /// Ignore `id`. Persists locally before returning, then pushes to the remote.
    pub fn add(&self, id: &str) -> Result<PendingSync> {
        self.mutate(|store| store.add(id))
    }

    /// Stop ignoring `id`. Persists locally before returning, then pushes to the remote.
    pub fn remove(&self, id: &str) -> Result<PendingSync> {
        self.mutate(|store| store.remove(id))
    }

    /// Push the current list to the remote even though nothing changed
    pub fn push(&self) -> PendingSync {
        self.spawn_sync(self.entries())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    pub fn entries(&self) -> IgnoreList {
        self.lock().entries().clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot().clone()
    }

    /// Notified with the full list whenever it changes
    pub fn subscribe(&self) -> watch::Receiver<IgnoreList> {
        self.changes.subscribe()
    }

    pub fn should_hide(&self, author: Option<&str>, is_exempt: bool) -> bool {
        filter::should_hide(self.lock().entries(), author, is_exempt)
    }

    pub fn evaluate(&self, batch: &[PostRecord]) -> Vec<Decision> {
        filter::evaluate(self.lock().entries(), batch)
    }

    fn mutate(&self, op: impl FnOnce(&mut IgnoreStore) -> Result<bool>) -> Result<PendingSync> {
        let entries = {
            let mut store = self.lock();
            if !op(&mut *store)? {
                return Ok(PendingSync::Skipped(SkipReason::Unchanged));
            }
            store.entries().clone()
        };

        self.changes.send_replace(entries.clone());
        Ok(self.spawn_sync(entries))
    }

    fn spawn_sync(&self, entries: IgnoreList) -> PendingSync {
        let Some(remote) = self.remote.clone() else {
            return PendingSync::Skipped(SkipReason::LocalOnly);
        };
        let clock = self.clock;
        PendingSync::Running(tokio::spawn(async move {
            sync_remote(remote.as_ref(), &entries, clock).await
        }))
    }

    fn lock(&self) -> MutexGuard<'_, IgnoreStore> {
        lock(&self.store)
    }
}

fn lock(store: &Mutex<IgnoreStore>) -> MutexGuard<'_, IgnoreStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

fn adopt(
    store: &Mutex<IgnoreStore>,
    changes: &watch::Sender<IgnoreList>,
    fetched: Snapshot,
) -> LoadOutcome {
    let mut store = lock(store);
    match store.merge_remote(fetched) {
        Ok(true) => {
            let entries = store.entries().clone();
            changes.send_replace(entries.clone());
            LoadOutcome::Replaced(entries)
        }
        Ok(false) => LoadOutcome::KeptLocal,
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "could not cache remote snapshot");
            LoadOutcome::Failed(SyncError::LocalCache(format!("{err:#}")))
        }
    }
}
