//! Local side of the ignore store

pub mod cache;
pub mod credential;
pub mod ignore_store;
pub mod kv;
pub mod snapshot;

pub use credential::{CredentialPrompt, CredentialStore, TerminalPrompt};
pub use ignore_store::IgnoreStore;
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use snapshot::{system_clock, Clock, IgnoreList, Snapshot};
