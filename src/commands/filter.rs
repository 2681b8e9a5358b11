//! Filter command - Visibility decisions for a batch of posts
//!
//! Reads `[{"id": "...", "author": "...", "exempt": false}, ...]` and writes
//! one `{"id": "...", "hidden": bool}` line per record.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use super::utils;
use super::Options;
use post_ignorer::filter::{apply_batch, Decision, VisibilitySink};
use post_ignorer::PostRecord;

/// Writes each decision as a JSON line
pub struct JsonLinesSink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flush, surfacing the first write error if any
    pub fn finish(&mut self) -> Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err).context("Failed to write decisions");
        }
        self.out.flush().context("Failed to write decisions")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> VisibilitySink for JsonLinesSink<W> {
    fn apply(&mut self, id: &str, hidden: bool) {
        if self.error.is_some() {
            return;
        }
        let decision = Decision {
            id: id.to_string(),
            hidden,
        };
        let result = serde_json::to_string(&decision)
            .map_err(io::Error::from)
            .and_then(|line| writeln!(self.out, "{}", line));
        if let Err(err) = result {
            self.error = Some(err);
        }
    }
}

pub fn read_records(input: Option<&Path>) -> Result<Vec<PostRecord>> {
    match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse: {}", path.display()))
        }
        None => serde_json::from_reader(io::stdin().lock()).context("Failed to parse stdin"),
    }
}

/// Execute the filter command
pub async fn execute(options: &Options, input: Option<&Path>, follow: bool) -> Result<()> {
    // Records come first: stdin may carry the batch
    let records = read_records(input)?;
    let session = if follow {
        super::open_session(options)?
    } else {
        super::open_local_session(options)?
    };

    let mut changes = session.subscribe();
    let (entries, pending) = session.load();

    let mut sink = JsonLinesSink::new(io::stdout().lock());
    let hidden = apply_batch(&entries, &records, &mut sink);
    sink.finish()?;
    tracing::info!(total = records.len(), hidden, "applied visibility");

    if !follow {
        return Ok(());
    }

    let outcome = pending.outcome().await;
    eprintln!("{}", utils::describe_load(&outcome));

    if changes.has_changed().unwrap_or(false) {
        let entries = changes.borrow_and_update().clone();
        let mut sink = JsonLinesSink::new(io::stdout().lock());
        let hidden = apply_batch(&entries, &records, &mut sink);
        sink.finish()?;
        tracing::info!(total = records.len(), hidden, "re-applied visibility after sync");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use post_ignorer::IgnoreList;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sink_writes_json_lines() {
        let list: IgnoreList = ["alice".to_string()].into_iter().collect();
        let records = vec![
            PostRecord {
                id: "p1".into(),
                author: Some("alice".into()),
                exempt: false,
            },
            PostRecord {
                id: "p2".into(),
                author: Some("bob".into()),
                exempt: false,
            },
        ];

        let mut sink = JsonLinesSink::new(Vec::new());
        assert_eq!(apply_batch(&list, &records, &mut sink), 1);
        sink.finish().unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();

        assert_eq!(
            out,
            "{\"id\":\"p1\",\"hidden\":true}\n{\"id\":\"p2\",\"hidden\":false}\n"
        );
    }

    #[test]
    fn test_read_records_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id":"p1","author":"alice"}},{{"id":"q1"}}]"#).unwrap();

        let records = read_records(Some(file.path())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author.as_deref(), Some("alice"));
        assert!(!records[0].exempt);
        assert_eq!(records[1].author, None);
    }

    #[test]
    fn test_read_records_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(read_records(Some(file.path())).is_err());
    }
}
