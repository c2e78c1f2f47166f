use anyhow::{Context, Result};
use ccextract_providers::find_projects;
use std::path::Path;

use crate::views::ProjectListView;

pub fn handle(claude_dir: &Path) -> Result<()> {
    let projects = find_projects(claude_dir)
        .with_context(|| format!("Failed to scan {}", claude_dir.display()))?;
    print!("{}", ProjectListView::new(&projects, super::use_color()));
    Ok(())
}
