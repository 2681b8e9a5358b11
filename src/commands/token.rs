//! Token commands - Manage the cached remote credential

use anyhow::Result;
use owo_colors::OwoColorize;

use super::Options;
use post_ignorer::store::CredentialStore;

pub fn set(options: &Options, token: &str) -> Result<()> {
    let mut kv = super::open_store(options)?;
    CredentialStore::save(&mut kv, token)?;
    println!("{}", "Credential cached.".green());
    Ok(())
}

pub fn clear(options: &Options) -> Result<()> {
    let mut kv = super::open_store(options)?;
    if CredentialStore::clear(&mut kv)? {
        println!("{}", "Credential cleared.".green());
    } else {
        println!("No credential was cached.");
    }
    Ok(())
}

pub fn status(options: &Options) -> Result<()> {
    let kv = super::open_store(options)?;
    match CredentialStore::cached(&kv)? {
        Some(_) => println!("Credential: {}", "cached".green()),
        None => println!("Credential: {}", "not set".dimmed()),
    }
    Ok(())
}
