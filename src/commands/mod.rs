//! CLI commands

pub mod check;
pub mod filter;
pub mod ignore;
pub mod list;
pub mod sync;
pub mod token;
pub mod utils;

use anyhow::{Context, Result};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use post_ignorer::config::{self, RemoteSettings};
use post_ignorer::store::{
    system_clock, CredentialPrompt, CredentialStore, IgnoreStore, KeyValueStore, SqliteStore,
    TerminalPrompt,
};
use post_ignorer::{GistClient, RemoteDocument, Session};

/// Global options shared by every command
#[derive(Debug, Clone)]
pub struct Options {
    pub db: Option<PathBuf>,
    pub gist_id: Option<String>,
    pub file_name: String,
    pub api_base: String,
    pub offline: bool,
}

impl Options {
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.db {
            Some(path) => Ok(path.clone()),
            None => config::default_db_path(),
        }
    }

    /// Remote settings, or `None` when running local-only
    pub fn remote_settings(&self) -> Result<Option<RemoteSettings>> {
        if self.offline {
            return Ok(None);
        }
        let Some(gist_id) = self.gist_id.as_deref().filter(|id| !id.trim().is_empty()) else {
            return Ok(None);
        };
        let settings = RemoteSettings::new(&self.api_base, gist_id, &self.file_name)
            .with_context(|| format!("Invalid API base URL: {}", self.api_base))?;
        Ok(Some(settings))
    }
}

/// Open the local store without touching the remote
pub fn open_store(options: &Options) -> Result<SqliteStore> {
    let db = options.db_path()?;
    SqliteStore::open(&db)
}

/// Open a session, prompting for the credential if a remote is configured
/// and none is cached yet.
///
/// The prompt only runs when stdin is a terminal. Piped input belongs to
/// the command and is never read as a credential.
pub fn open_session(options: &Options) -> Result<Session> {
    let mut kv = open_store(options)?;
    let remote = if io::stdin().is_terminal() {
        let mut prompt = TerminalPrompt::stdin();
        connect_remote(options, &mut kv, Some(&mut prompt))?
    } else {
        connect_remote(options, &mut kv, None)?
    };
    let store = IgnoreStore::open(Box::new(kv), system_clock)?;
    Ok(Session::new(store, remote))
}

/// Open a session and wait until it has caught up with the remote.
///
/// Commands that push the list use this so they never write over a remote
/// list newer than the local cache.
pub async fn open_reconciled_session(options: &Options) -> Result<Session> {
    let session = open_session(options)?;
    let outcome = session.reconcile().await;
    tracing::info!(?outcome, "reconciled with remote before writing");
    Ok(session)
}

/// Open a session that never talks to the remote
pub fn open_local_session(options: &Options) -> Result<Session> {
    Session::local(Box::new(open_store(options)?), system_clock)
}

/// Build the remote client. Without a `prompt` only a cached credential is used.
fn connect_remote(
    options: &Options,
    kv: &mut dyn KeyValueStore,
    prompt: Option<&mut dyn CredentialPrompt>,
) -> Result<Option<Arc<dyn RemoteDocument>>> {
    let Some(settings) = options.remote_settings()? else {
        tracing::info!("no remote configured, running local-only");
        return Ok(None);
    };

    let token = match prompt {
        Some(prompt) => CredentialStore::new().acquire(kv, prompt)?,
        None => {
            let cached = CredentialStore::cached(kv)?;
            if cached.is_none() {
                tracing::warn!(
                    "no cached credential and stdin is not a terminal, running local-only"
                );
            }
            cached
        }
    };
    let Some(token) = token else {
        return Ok(None);
    };

    match GistClient::new(&settings, token) {
        Ok(client) => Ok(Some(Arc::new(client))),
        Err(err) => {
            tracing::warn!(error = %err, "could not build remote client, running local-only");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use post_ignorer::store::MemoryStore;

    fn options() -> Options {
        Options {
            db: None,
            gist_id: Some("abc".into()),
            file_name: config::DEFAULT_FILE_NAME.into(),
            api_base: config::DEFAULT_API_BASE.into(),
            offline: false,
        }
    }

    #[test]
    fn test_remote_settings_when_configured() {
        let settings = options().remote_settings().unwrap().unwrap();
        assert_eq!(settings.gist_id, "abc");
    }

    #[test]
    fn test_offline_disables_remote() {
        let options = Options {
            offline: true,
            ..options()
        };
        assert!(options.remote_settings().unwrap().is_none());
    }

    #[test]
    fn test_blank_gist_id_disables_remote() {
        let options = Options {
            gist_id: Some("  ".into()),
            ..options()
        };
        assert!(options.remote_settings().unwrap().is_none());
    }

    #[test]
    fn test_bad_api_base_is_an_error() {
        let options = Options {
            api_base: "nope".into(),
            ..options()
        };
        assert!(options.remote_settings().is_err());
    }

    #[test]
    fn test_explicit_db_path_wins() {
        let options = Options {
            db: Some(PathBuf::from("/tmp/x.db")),
            ..options()
        };
        assert_eq!(options.db_path().unwrap(), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn test_piped_input_is_never_cached_as_credential() {
        let mut kv = MemoryStore::new();

        let remote = connect_remote(&options(), &mut kv, None).unwrap();

        assert!(remote.is_none());
        assert_eq!(CredentialStore::cached(&kv).unwrap(), None);
    }

    #[test]
    fn test_cached_credential_used_without_prompt() {
        let mut kv = MemoryStore::new();
        CredentialStore::save(&mut kv, "tok").unwrap();

        let remote = connect_remote(&options(), &mut kv, None).unwrap();
        assert!(remote.is_some());
    }

    #[test]
    fn test_terminal_prompt_answer_enables_remote() {
        let mut kv = MemoryStore::new();
        let mut prompt = TerminalPrompt::new(&b"tok\n"[..]);

        let remote = connect_remote(&options(), &mut kv, Some(&mut prompt)).unwrap();

        assert!(remote.is_some());
        assert_eq!(CredentialStore::cached(&kv).unwrap().as_deref(), Some("tok"));
    }
}
