//! Ignore list and the timestamped snapshot exchanged with the remote
//!
//! JSON shape (both in the local cache and in the remote file):
//!
//! ```json
//! { "entries": ["alice", "bob"], "updatedAt": "2024-05-01T10:00:00Z" }
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Source of "now" for stamping snapshots
pub type Clock = fn() -> DateTime<Utc>;

/// Wall clock used outside of tests
pub fn system_clock() -> DateTime<Utc> {
    Utc::now()
}

/// Ordered set of ignored identifiers, in the order they were ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IgnoreList(Vec<String>);

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|entry| entry == id)
    }

    /// Append `id` unless it is already present. Returns whether the list changed.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Drop `id` if present. Returns whether the list changed.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.0.iter().position(|entry| entry == id) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl FromIterator<String> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut list = Self::new();
        for id in iter {
            list.insert(id);
        }
        list
    }
}

impl<'a> IntoIterator for &'a IgnoreList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Data written by other clients may carry duplicates; keep the first occurrence.
impl<'de> Deserialize<'de> for IgnoreList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

/// The persisted unit: the list plus the time it was last written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entries: IgnoreList,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(entries: IgnoreList, updated_at: DateTime<Utc>) -> Self {
        Self {
            entries,
            updated_at,
        }
    }

    /// Empty list stamped at the Unix epoch, so any real stamp supersedes it
    pub fn empty() -> Self {
        Self::new(IgnoreList::new(), DateTime::<Utc>::default())
    }

    /// Strictly newer; equal stamps keep the existing snapshot
    pub fn is_newer_than(&self, other: &Snapshot) -> bool {
        self.updated_at > other.updated_at
    }

    /// Timestamp for the next local write: `now`, but never earlier than the current stamp
    pub fn next_stamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.max(self.updated_at)
    }

    /// Timestamp for a snapshot replacing this one on the remote: `now`, but
    /// strictly after the current stamp so every reader sees it as newer
    pub fn stamp_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        if now > self.updated_at {
            now
        } else {
            self.updated_at + TimeDelta::milliseconds(1)
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut list = IgnoreList::new();
        assert!(list.insert("alice"));
        assert!(!list.insert("alice"));
        assert_eq!(list.as_slice(), ["alice"]);
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut list = IgnoreList::new();
        list.insert("carol");
        list.insert("alice");
        list.insert("bob");
        assert_eq!(list.as_slice(), ["carol", "alice", "bob"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut list: IgnoreList = vec!["alice".to_string()].into_iter().collect();
        assert!(!list.remove("bob"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_present() {
        let mut list: IgnoreList = ["alice", "bob", "carol"]
            .into_iter()
            .map(String::from)
            .collect();
        assert!(list.remove("bob"));
        assert_eq!(list.as_slice(), ["alice", "carol"]);
        assert!(!list.contains("bob"));
    }

    #[test]
    fn test_any_string_is_accepted() {
        let mut list = IgnoreList::new();
        assert!(list.insert(""));
        assert!(list.insert("名前 with spaces"));
        assert!(list.contains("名前 with spaces"));
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let list: IgnoreList = serde_json::from_str(r#"["a", "b", "a", "c", "b"]"#).unwrap();
        assert_eq!(list.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = Snapshot::new(
            ["alice".to_string()].into_iter().collect(),
            at(1_714_557_600),
        );
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["entries"], serde_json::json!(["alice"]));
        assert_eq!(json["updatedAt"], "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_snapshot_accepts_millisecond_stamps() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"entries":["x"],"updatedAt":"2024-05-01T10:00:00.123Z"}"#)
                .unwrap();
        assert!(snapshot.updated_at > at(1_714_557_600));
    }

    #[test]
    fn test_is_newer_than_is_strict() {
        let older = Snapshot::new(IgnoreList::new(), at(10));
        let newer = Snapshot::new(IgnoreList::new(), at(20));
        let same = Snapshot::new(IgnoreList::new(), at(20));

        assert!(newer.is_newer_than(&older));
        assert!(!older.is_newer_than(&newer));
        assert!(!same.is_newer_than(&newer));
    }

    #[test]
    fn test_empty_loses_to_any_stamp() {
        let remote = Snapshot::new(IgnoreList::new(), at(1));
        assert!(remote.is_newer_than(&Snapshot::empty()));
    }

    #[test]
    fn test_next_stamp_never_goes_back() {
        let snapshot = Snapshot::new(IgnoreList::new(), at(100));
        assert_eq!(snapshot.next_stamp(at(50)), at(100));
        assert_eq!(snapshot.next_stamp(at(150)), at(150));
    }

    #[test]
    fn test_stamp_after_is_strictly_newer() {
        let snapshot = Snapshot::new(IgnoreList::new(), at(100));
        assert_eq!(
            snapshot.stamp_after(at(50)),
            at(100) + TimeDelta::milliseconds(1)
        );
        assert_eq!(
            snapshot.stamp_after(at(100)),
            at(100) + TimeDelta::milliseconds(1)
        );
        assert_eq!(snapshot.stamp_after(at(150)), at(150));
    }
}
