//! Remote access credential
//!
//! The credential is requested at most once per session and, once given,
//! cached in the local store until something clears it.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use super::kv::KeyValueStore;

/// Key holding the cached credential
pub const CREDENTIAL_KEY: &str = "gistToken";

/// Interactive source of a credential
pub trait CredentialPrompt {
    /// Ask the user. `None` (or blank input) means they declined.
    fn request(&mut self) -> Result<Option<String>>;
}

/// Prompts on the terminal, reading one line from stdin
pub struct TerminalPrompt<R> {
    input: R,
}

impl TerminalPrompt<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            input: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> TerminalPrompt<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> CredentialPrompt for TerminalPrompt<R> {
    fn request(&mut self) -> Result<Option<String>> {
        eprint!("Enter a GitHub token with gist scope (leave empty to stay offline): ");
        io::stderr().flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read credential")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Per-session credential state
#[derive(Debug, Default)]
pub struct CredentialStore {
    asked: bool,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached credential, if any
    pub fn cached(kv: &dyn KeyValueStore) -> Result<Option<String>> {
        Ok(kv.get(CREDENTIAL_KEY)?.filter(|token| !token.is_empty()))
    }

    /// Store a credential without prompting
    pub fn save(kv: &mut dyn KeyValueStore, token: &str) -> Result<()> {
        kv.set(CREDENTIAL_KEY, token.trim())
    }

    /// Forget the cached credential. Returns whether one was cached.
    pub fn clear(kv: &mut dyn KeyValueStore) -> Result<bool> {
        kv.remove(CREDENTIAL_KEY)
    }

    /// Return the cached credential, or ask `prompt` once and cache the answer.
    ///
    /// `Ok(None)` means local-only mode. A declined prompt is not asked again
    /// for the lifetime of this `CredentialStore`.
    pub fn acquire(
        &mut self,
        kv: &mut dyn KeyValueStore,
        prompt: &mut dyn CredentialPrompt,
    ) -> Result<Option<String>> {
        if let Some(token) = Self::cached(kv)? {
            return Ok(Some(token));
        }

        if self.asked {
            return Ok(None);
        }
        self.asked = true;

        let token = prompt
            .request()?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        match token {
            Some(token) => {
                Self::save(kv, &token)?;
                tracing::info!("cached remote credential");
                Ok(Some(token))
            }
            None => {
                tracing::warn!("no credential provided, staying local-only");
                Ok(None)
            }
        }
    }
}
