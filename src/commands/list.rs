//! List command - Show the ignored users

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use super::utils;
use super::Options;
use post_ignorer::Snapshot;

/// Execute the list command and return formatted output
pub async fn execute(options: &Options, sync: bool) -> Result<String> {
    if !sync {
        let session = super::open_local_session(options)?;
        return Ok(format_panel(&session.snapshot()));
    }

    let session = super::open_session(options)?;
    let (_, pending) = session.load();
    let outcome = pending.outcome().await;

    Ok(format!(
        "{}\n\n{}",
        format_panel(&session.snapshot()),
        utils::describe_load(&outcome)
    ))
}

/// Render the snapshot the way the manage panel shows it
pub fn format_panel(snapshot: &Snapshot) -> String {
    let mut lines = vec![format!(
        "{}",
        format!("Ignored Users ({})", snapshot.entries.len()).bold()
    )];

    if snapshot.entries.is_empty() {
        lines.push(format!("{}", "No users ignored yet".dimmed()));
        return lines.join("\n");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("#"), Cell::new("User")]);

    for (index, user) in snapshot.entries.iter().enumerate() {
        table.add_row(vec![Cell::new(index + 1), Cell::new(user)]);
    }

    lines.push(table.to_string());
    lines.push(format!(
        "Last updated: {}",
        snapshot.updated_at.format("%Y-%m-%d %H:%M")
    ));

    lines.join("\n")
}
