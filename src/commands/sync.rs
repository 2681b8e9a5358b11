//! Sync/push commands - Explicit reconciliation with the remote

use anyhow::{bail, Result};

use super::utils;
use super::Options;

/// Fetch the remote list and adopt it if newer than the local one
pub async fn sync(options: &Options) -> Result<()> {
    let session = super::open_session(options)?;
    if session.is_local_only() {
        bail!("No remote configured. Set --gist-id (or POST_IGNORER_GIST_ID) and a credential.");
    }

    let (before, pending) = session.load();
    let outcome = pending.outcome().await;
    println!("{}", utils::describe_load(&outcome));

    let after = session.entries();
    if before != after {
        println!("{} -> {} user(s)", before.len(), after.len());
    }
    Ok(())
}

/// Overwrite the remote document with the local list, after adopting a
/// newer remote one if it exists
pub async fn push(options: &Options) -> Result<()> {
    let session = super::open_reconciled_session(options).await?;
    if session.is_local_only() {
        bail!("No remote configured. Set --gist-id (or POST_IGNORER_GIST_ID) and a credential.");
    }

    let outcome = session.push().outcome().await;
    println!("{}", utils::describe_sync(&outcome));
    Ok(())
}
