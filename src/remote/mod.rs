//! Remote half of the ignore store
//!
//! The remote is a single shared document with no locking and no revision
//! token. Writes are read-modify-write over the whole document, so two
//! clients racing each other end with whichever write lands last.

pub mod gist;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SyncError;
use crate::store::{Clock, IgnoreList, Snapshot};

pub use gist::GistClient;

/// A remote JSON document holding one `Snapshot`
#[async_trait]
pub trait RemoteDocument: Send + Sync {
    /// Fetch and parse the current snapshot
    async fn fetch(&self) -> Result<Snapshot, SyncError>;

    /// Replace the document content with `snapshot`
    async fn write(&self, snapshot: &Snapshot) -> Result<(), SyncError>;
}

/// Why a remote write was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No remote configured or no credential
    LocalOnly,
    /// The mutation did not change the list
    Unchanged,
}

/// Result of pushing the local list to the remote
#[derive(Debug)]
pub enum SyncOutcome {
    Written { updated_at: DateTime<Utc> },
    Skipped(SkipReason),
    Failed(SyncError),
}

impl SyncOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Push `entries` to `remote`, replacing whatever it holds.
///
/// 1. fetch the current document
/// 2. a missing file or unparsable content counts as an empty document
/// 3. the whole list replaces the remote entries, stamped `now` or just
///    after the fetched stamp, whichever is later
/// 4. the document is written back in full
pub async fn sync_remote(
    remote: &dyn RemoteDocument,
    entries: &IgnoreList,
    clock: Clock,
) -> SyncOutcome {
    let current = match remote.fetch().await {
        Ok(snapshot) => snapshot,
        Err(err) if err.is_malformed() => {
            tracing::warn!(error = %err, "remote document unreadable, overwriting");
            Snapshot::empty()
        }
        Err(err) => {
            tracing::warn!(error = %err, "remote fetch failed, skipping write");
            return SyncOutcome::Failed(err);
        }
    };

    let next = Snapshot::new(entries.clone(), current.stamp_after(clock()));
    tracing::debug!(
        previous = current.entries.len(),
        next = next.entries.len(),
        "replacing remote entries"
    );

    match remote.write(&next).await {
        Ok(()) => {
            tracing::info!(updated_at = %next.updated_at, "remote snapshot written");
            SyncOutcome::Written {
                updated_at: next.updated_at,
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "remote write failed");
            SyncOutcome::Failed(err)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeRemote;
    use super::*;
    use chrono::TimeZone;

    fn clock() -> DateTime<Utc> {
        Utc.timestamp_opt(2_000, 0).unwrap()
    }

    fn list(names: &[&str]) -> IgnoreList {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_write_replaces_entries_and_stamps_now() {
        let remote = FakeRemote::with_snapshot(&Snapshot::new(
            list(&["old"]),
            Utc.timestamp_opt(1, 0).unwrap(),
        ));

        let outcome = sync_remote(&remote, &list(&["alice", "bob"]), clock).await;

        assert!(outcome.is_written());
        let stored = remote.stored();
        assert_eq!(stored.entries.as_slice(), ["alice", "bob"]);
        assert_eq!(stored.updated_at, clock());
    }

    #[tokio::test]
    async fn test_write_stamps_after_remote_from_faster_clock() {
        let ahead = Utc.timestamp_opt(5_000, 0).unwrap();
        let remote = FakeRemote::with_snapshot(&Snapshot::new(list(&["old"]), ahead));

        let outcome = sync_remote(&remote, &list(&["alice"]), clock).await;

        let stored = remote.stored();
        assert!(matches!(outcome, SyncOutcome::Written { updated_at } if updated_at == stored.updated_at));
        assert!(stored.updated_at > ahead);
    }

    #[tokio::test]
    async fn test_sequential_writes_last_one_wins() {
        let remote = FakeRemote::with_snapshot(&Snapshot::empty());

        sync_remote(&remote, &list(&["x1", "x2"]), clock).await;
        sync_remote(&remote, &list(&["y1"]), clock).await;

        assert_eq!(remote.stored().entries.as_slice(), ["y1"]);
        assert_eq!(remote.write_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_document_is_overwritten() {
        let remote = FakeRemote::with_raw("{ this is not json");

        let outcome = sync_remote(&remote, &list(&["alice"]), clock).await;

        assert!(outcome.is_written());
        assert_eq!(remote.stored().entries.as_slice(), ["alice"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_created() {
        let remote = FakeRemote::default();

        let outcome = sync_remote(&remote, &list(&["alice"]), clock).await;

        assert!(outcome.is_written());
        assert_eq!(remote.stored().entries.as_slice(), ["alice"]);
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_not_written() {
        let remote = FakeRemote {
            fail_fetch: true,
            ..FakeRemote::with_snapshot(&Snapshot::empty())
        };

        let outcome = sync_remote(&remote, &list(&["alice"]), clock).await;

        assert!(matches!(outcome, SyncOutcome::Failed(SyncError::Status { .. })));
        assert_eq!(remote.write_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_is_reported() {
        let remote = FakeRemote {
            fail_write: true,
            ..FakeRemote::with_snapshot(&Snapshot::empty())
        };

        let outcome = sync_remote(&remote, &list(&["alice"]), clock).await;
        assert!(matches!(outcome, SyncOutcome::Failed(_)));
    }
}
