//! In-memory ignore list mirrored to the local cache
//!
//! Every mutation is written to the local store before the call returns.
//! The remote side never touches this type directly; it only hands in
//! snapshots through [`IgnoreStore::merge_remote`].

use anyhow::Result;

use super::cache;
use super::kv::KeyValueStore;
use super::snapshot::{Clock, IgnoreList, Snapshot};

pub struct IgnoreStore {
    kv: Box<dyn KeyValueStore + Send>,
    snapshot: Snapshot,
    clock: Clock,
}

impl IgnoreStore {
    /// Read the cached snapshot synchronously
    pub fn open(kv: Box<dyn KeyValueStore + Send>, clock: Clock) -> Result<Self> {
        let snapshot = cache::read_snapshot(&*kv)?;
        tracing::debug!(count = snapshot.entries.len(), "loaded local snapshot");
        Ok(Self {
            kv,
            snapshot,
            clock,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn entries(&self) -> &IgnoreList {
        &self.snapshot.entries
    }

    pub fn contains(&self, id: &str) -> bool {
        self.snapshot.entries.contains(id)
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Ignore `id`. Returns whether the list changed.
    pub fn add(&mut self, id: &str) -> Result<bool> {
        if self.contains(id) {
            return Ok(false);
        }
        let mut entries = self.snapshot.entries.clone();
        entries.insert(id);
        self.commit(entries)?;
        Ok(true)
    }

    /// Stop ignoring `id`. Returns whether the list changed.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        if !self.contains(id) {
            return Ok(false);
        }
        let mut entries = self.snapshot.entries.clone();
        entries.remove(id);
        self.commit(entries)?;
        Ok(true)
    }

    /// Adopt `remote` if it is strictly newer than the local snapshot.
    ///
    /// Returns whether the local list was replaced. The remote stamp is kept
    /// as-is so that the next comparison against the same document is a tie.
    pub fn merge_remote(&mut self, remote: Snapshot) -> Result<bool> {
        if !remote.is_newer_than(&self.snapshot) {
            tracing::debug!(
                local = %self.snapshot.updated_at,
                remote = %remote.updated_at,
                "kept local snapshot"
            );
            return Ok(false);
        }

        cache::write_snapshot(&mut *self.kv, &remote)?;
        tracing::info!(
            count = remote.entries.len(),
            updated_at = %remote.updated_at,
            "adopted newer remote snapshot"
        );
        self.snapshot = remote;
        Ok(true)
    }

    // The in-memory snapshot only changes once the cache write succeeded.
    fn commit(&mut self, entries: IgnoreList) -> Result<()> {
        let next = Snapshot::new(entries, self.snapshot.next_stamp((self.clock)()));
        cache::write_snapshot(&mut *self.kv, &next)?;
        self.snapshot = next;
        Ok(())
    }
}
