//! Add/remove commands - the ignore button and the panel's remove button

use anyhow::Result;
use owo_colors::OwoColorize;

use super::utils;
use super::Options;

/// Ignore a user, then wait for the remote write to finish
pub async fn add(options: &Options, user: &str) -> Result<()> {
    let session = super::open_reconciled_session(options).await?;
    let pending = session.add(user)?;

    if pending.changed() {
        println!("{} {}", "Ignored".green(), user);
    } else {
        println!("{} is already ignored", user);
    }

    println!("{}", utils::describe_sync(&pending.outcome().await));
    Ok(())
}

/// Stop ignoring a user, then wait for the remote write to finish
pub async fn remove(options: &Options, user: &str) -> Result<()> {
    let session = super::open_reconciled_session(options).await?;
    let pending = session.remove(user)?;

    if pending.changed() {
        println!("{} {}", "Removed".green(), user);
    } else {
        println!("{} was not ignored", user);
    }

    println!("{}", utils::describe_sync(&pending.outcome().await));
    Ok(())
}
