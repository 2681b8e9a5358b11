//! Visibility filter
//!
//! Decides which posts and quotes to hide. The page side (whatever renders
//! the posts) hands in records and receives one decision per record; the
//! pass is a flat re-evaluation, so running it again on the same batch is
//! harmless.

use serde::{Deserialize, Serialize};

use crate::store::IgnoreList;

/// One post or quote as seen on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Element handle on the page side
    pub id: String,

    #[serde(default)]
    pub author: Option<String>,

    /// Stays visible regardless of author (first post of a thread).
    /// Quotes never set this.
    #[serde(default)]
    pub exempt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub hidden: bool,
}

/// Receives hide/show instructions
pub trait VisibilitySink {
    fn apply(&mut self, id: &str, hidden: bool);
}

/// True iff the author is known, ignored, and the post is not exempt.
/// An empty author string counts as unknown.
pub fn should_hide(list: &IgnoreList, author: Option<&str>, is_exempt: bool) -> bool {
    match author {
        Some(author) if !author.is_empty() => !is_exempt && list.contains(author),
        _ => false,
    }
}

pub fn evaluate(list: &IgnoreList, batch: &[PostRecord]) -> Vec<Decision> {
    batch
        .iter()
        .map(|record| Decision {
            id: record.id.clone(),
            hidden: should_hide(list, record.author.as_deref(), record.exempt),
        })
        .collect()
}

/// Evaluate `batch` and push every decision into `sink`. Returns the hidden count.
pub fn apply_batch(list: &IgnoreList, batch: &[PostRecord], sink: &mut dyn VisibilitySink) -> usize {
    let mut hidden = 0;
    for decision in evaluate(list, batch) {
        if decision.hidden {
            hidden += 1;
        }
        sink.apply(&decision.id, decision.hidden);
    }
    hidden
}
