//! Check command - Visibility decision for a single post

use anyhow::Result;

use super::Options;

/// Whether a post by `author` would be hidden, using the local list only
pub fn execute(options: &Options, author: Option<&str>, exempt: bool) -> Result<bool> {
    let session = super::open_local_session(options)?;
    Ok(session.should_hide(author, exempt))
}
