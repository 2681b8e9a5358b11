//! post-ignorer library
//!
//! Keeps a list of forum users whose posts and quotes should be hidden.
//! The list lives in a local SQLite cache and is optionally mirrored to a
//! shared Gist document, with the newer timestamp winning on load.

pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod remote;
pub mod session;
pub mod store;

pub use error::SyncError;
pub use filter::{should_hide, Decision, PostRecord};
pub use remote::{sync_remote, GistClient, RemoteDocument, SkipReason, SyncOutcome};
pub use session::{LoadOutcome, PendingLoad, PendingSync, Session};
pub use store::{IgnoreList, Snapshot};
