use anyhow::{Context, Result};
use ccextract_providers::{find_sessions, summarize_session};
use std::path::Path;
use tracing::warn;

use crate::views::SessionListView;

pub fn handle(claude_dir: &Path, limit: Option<usize>) -> Result<()> {
    let sessions = find_sessions(claude_dir, None)
        .with_context(|| format!("Failed to scan {}", claude_dir.display()))?;
    let total = sessions.len();
    let shown = limit.map_or(total, |n| n.min(total));

    // Numbers stay aligned with `export --session` even when a summary fails
    let summaries: Vec<_> = sessions[..shown]
        .iter()
        .enumerate()
        .filter_map(|(i, path)| match summarize_session(path) {
            Ok(summary) => Some((i + 1, summary)),
            Err(err) => {
                warn!(session = %path.display(), error = %err, "could not summarize session");
                None
            }
        })
        .collect();

    print!(
        "{}",
        SessionListView::new(&summaries, total, super::use_color())
    );
    Ok(())
}
