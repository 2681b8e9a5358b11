//! Shared output helpers for commands

use owo_colors::OwoColorize;

use post_ignorer::{LoadOutcome, SkipReason, SyncOutcome};

/// One-line description of a remote write outcome
pub fn describe_sync(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Written { updated_at } => format!(
            "{} remote updated at {}",
            "Synced:".green(),
            updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        SyncOutcome::Skipped(SkipReason::LocalOnly) => {
            format!("{} local-only mode", "Not synced:".dimmed())
        }
        SyncOutcome::Skipped(SkipReason::Unchanged) => {
            format!("{} nothing changed", "Not synced:".dimmed())
        }
        SyncOutcome::Failed(err) => format!("{} {} (local list kept)", "Sync failed:".yellow(), err),
    }
}

/// One-line description of a load reconciliation outcome
pub fn describe_load(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Replaced(entries) => format!(
            "{} adopted newer remote list ({} user(s))",
            "Synced:".green(),
            entries.len()
        ),
        LoadOutcome::KeptLocal => format!("{} local list is up to date", "Synced:".green()),
        LoadOutcome::Skipped => format!("{} local-only mode", "Not synced:".dimmed()),
        LoadOutcome::Failed(err) => {
            format!("{} {} (local list kept)", "Sync failed:".yellow(), err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use post_ignorer::{IgnoreList, SyncError};

    #[test]
    fn test_describe_written() {
        let outcome = SyncOutcome::Written {
            updated_at: Utc.timestamp_opt(1_714_557_600, 0).unwrap(),
        };
        assert!(describe_sync(&outcome).contains("2024-05-01 10:00:00 UTC"));
    }

    #[test]
    fn test_describe_failure_mentions_local() {
        let outcome = SyncOutcome::Failed(SyncError::MissingFile("list.json".into()));
        let text = describe_sync(&outcome);
        assert!(text.contains("list.json"));
        assert!(text.contains("local list kept"));
    }

    #[test]
    fn test_describe_replaced_counts_users() {
        let entries: IgnoreList = ["a", "b"].into_iter().map(String::from).collect();
        assert!(describe_load(&LoadOutcome::Replaced(entries)).contains("2 user(s)"));
    }
}
