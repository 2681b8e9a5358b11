//! Snapshot persistence in the local key/value store

use anyhow::{Context, Result};

use super::kv::KeyValueStore;
use super::snapshot::{IgnoreList, Snapshot};

/// Key holding the current `Snapshot` as JSON
pub const SNAPSHOT_KEY: &str = "ignoredUsersSnapshot";

/// Key older revisions used for a bare JSON array of names (no timestamp)
pub const LEGACY_LIST_KEY: &str = "ignoredUsers";

/// Read the cached snapshot.
///
/// Falls back to the legacy bare list, stamped at the Unix epoch so that any
/// remote snapshot wins the first merge, and then to an empty snapshot.
pub fn read_snapshot(kv: &dyn KeyValueStore) -> Result<Snapshot> {
    if let Some(raw) = kv.get(SNAPSHOT_KEY)? {
        return serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse cached snapshot under {}", SNAPSHOT_KEY));
    }

    let legacy = kv.get_or(LEGACY_LIST_KEY, "[]")?;
    let entries: IgnoreList = serde_json::from_str(&legacy)
        .with_context(|| format!("Failed to parse legacy list under {}", LEGACY_LIST_KEY))?;

    if !entries.is_empty() {
        tracing::info!(count = entries.len(), "migrating legacy ignore list");
    }

    Ok(Snapshot {
        entries,
        ..Snapshot::empty()
    })
}

/// Overwrite the cached snapshot
pub fn write_snapshot(kv: &mut dyn KeyValueStore, snapshot: &Snapshot) -> Result<()> {
    let raw = serde_json::to_string(snapshot).context("Failed to serialize snapshot")?;
    kv.set(SNAPSHOT_KEY, &raw)?;
    tracing::debug!(
        count = snapshot.entries.len(),
        updated_at = %snapshot.updated_at,
        "wrote local snapshot"
    );
    Ok(())
}
