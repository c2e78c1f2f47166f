use ccextract_types::{ResultDetail, ToolCategory, ToolOperation, ToolOperations};
use std::fmt;

use crate::formatters::format_kb;
use crate::header::DocumentHeader;

const WEB_PREVIEW_SHOWN: usize = 200;

/// Tool operations grouped by category then tool, with a summary on top
pub fn render_tool_operations(header: &DocumentHeader, ops: &ToolOperations) -> String {
    ToolLog { header, ops }.to_string()
}

struct ToolLog<'a> {
    header: &'a DocumentHeader,
    ops: &'a ToolOperations,
}

impl<'a> ToolLog<'a> {
    fn render_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Summary\n")?;
        writeln!(f, "Total operations: {}\n", self.ops.total())?;

        for category in ToolCategory::ALL {
            let count = self.ops.count_in(category);
            if count == 0 {
                continue;
            }
            if category == ToolCategory::Git {
                writeln!(f, "- {}: {}", category.label(), count)?;
                continue;
            }
            let per_tool = self
                .ops
                .tool_counts(category)
                .iter()
                .map(|(tool, n)| format!("{}: {}", tool, n))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "- {}: {} ({})", category.label(), count, per_tool)?;
        }
        writeln!(f, "\n---\n")
    }

    fn render_category(&self, f: &mut fmt::Formatter<'_>, category: ToolCategory) -> fmt::Result {
        if self.ops.count_in(category) == 0 {
            return Ok(());
        }
        writeln!(f, "## {}\n", category.label())?;

        if category == ToolCategory::Git {
            for (i, op) in self.ops.in_category(category).enumerate() {
                render_git(f, i + 1, op)?;
            }
            return Ok(());
        }

        for tool in category.tools() {
            let ops: Vec<&ToolOperation> = self.ops.for_tool(category, tool).collect();
            if ops.is_empty() {
                continue;
            }
            writeln!(f, "### {}\n", tool)?;
            for (i, op) in ops.into_iter().enumerate() {
                match category {
                    ToolCategory::File => render_file(f, i + 1, op)?,
                    ToolCategory::Search => render_search(f, i + 1, op)?,
                    ToolCategory::Web => render_web(f, i + 1, op)?,
                    ToolCategory::Git => render_git(f, i + 1, op)?,
                }
            }
        }
        Ok(())
    }
}

impl<'a> fmt::Display for ToolLog<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Tool Operations Log\n")?;
        writeln!(f, "Session ID: {}", self.header.session_id)?;
        writeln!(f, "Date: {} {}", self.header.date, self.header.time)?;
        if let Some(project) = &self.header.project {
            writeln!(f, "Project: {}", project)?;
        }
        writeln!(f)?;

        self.render_summary(f)?;
        for category in ToolCategory::ALL {
            self.render_category(f, category)?;
        }
        Ok(())
    }
}

fn render_context(f: &mut fmt::Formatter<'_>, op: &ToolOperation) -> fmt::Result {
    if !op.context.is_empty() {
        writeln!(f, "{}\n", op.context)?;
    }
    Ok(())
}

fn render_error(f: &mut fmt::Formatter<'_>, op: &ToolOperation) -> fmt::Result {
    if let Some(error) = &op.result.error {
        writeln!(f, "- **Error:** {}", error)?;
    }
    Ok(())
}

fn render_full_output(f: &mut fmt::Formatter<'_>, op: &ToolOperation) -> fmt::Result {
    if let ResultDetail::Output { output } = &op.result.detail
        && !output.is_empty()
    {
        writeln!(f, "\n```\n{}\n```", output)?;
    }
    Ok(())
}

fn render_file(f: &mut fmt::Formatter<'_>, index: usize, op: &ToolOperation) -> fmt::Result {
    let path = op.input_str("file_path").unwrap_or("Unknown");
    writeln!(f, "#### {}. `{}`\n", index, path)?;
    render_context(f, op)?;

    let status = op.result.status_label();
    match &op.result.detail {
        ResultDetail::FileRead { lines, size_bytes } => {
            writeln!(f, "- **Lines:** {}", lines)?;
            writeln!(
                f,
                "- **Status:** {} ({})",
                status,
                format_kb(*size_bytes as u64)
            )?;
        }
        ResultDetail::Output { output } if op.tool_name == "Read" => {
            writeln!(
                f,
                "- **Status:** {} ({})",
                status,
                format_kb(output.len() as u64)
            )?;
        }
        _ => writeln!(f, "- **Status:** {}", status)?,
    }
    render_error(f, op)?;
    render_full_output(f, op)?;
    writeln!(f, "\n---\n")
}

fn render_search(f: &mut fmt::Formatter<'_>, index: usize, op: &ToolOperation) -> fmt::Result {
    let pattern = op.input_str("pattern").unwrap_or("");
    writeln!(f, "#### {}. Pattern: `{}`\n", index, pattern)?;
    render_context(f, op)?;
    writeln!(f, "- **Path:** `{}`", op.input_str("path").unwrap_or("."))?;

    if let ResultDetail::Matches {
        matched_count,
        matches_preview,
    } = &op.result.detail
    {
        writeln!(f, "- **Matched:** {} files", matched_count)?;
        if !matches_preview.is_empty() {
            writeln!(f, "- **Preview:**")?;
            for line in matches_preview {
                writeln!(f, "  - `{}`", line)?;
            }
        }
    }
    render_error(f, op)?;
    render_full_output(f, op)?;
    writeln!(f, "\n---\n")
}

fn render_web(f: &mut fmt::Formatter<'_>, index: usize, op: &ToolOperation) -> fmt::Result {
    if op.tool_name == "WebFetch" {
        let url = op.input_str("url").unwrap_or("Unknown URL");
        writeln!(f, "#### {}. URL: `{}`\n", index, url)?;
    } else {
        let query = op.input_str("query").unwrap_or("Unknown query");
        writeln!(f, "#### {}. Query: \"{}\"\n", index, query)?;
    }
    render_context(f, op)?;
    writeln!(f, "- **Status:** {}", op.result.status_label())?;

    if let ResultDetail::Preview { preview } = &op.result.detail
        && !preview.is_empty()
    {
        let shown: String = preview.chars().take(WEB_PREVIEW_SHOWN).collect();
        writeln!(f, "- **Preview:** {}...", shown)?;
    }
    render_error(f, op)?;
    render_full_output(f, op)?;
    writeln!(f, "\n---\n")
}

fn render_git(f: &mut fmt::Formatter<'_>, index: usize, op: &ToolOperation) -> fmt::Result {
    writeln!(
        f,
        "#### {}. `{}`\n",
        index,
        op.input_str("command").unwrap_or("")
    )?;
    render_context(f, op)?;

    let output = match &op.result.detail {
        ResultDetail::OutputPreview { output_preview } => output_preview.as_str(),
        ResultDetail::Output { output } => output.as_str(),
        _ => "",
    };
    if !output.is_empty() {
        writeln!(f, "```\n{}\n```\n", output)?;
    }
    if let Some(error) = &op.result.error {
        writeln!(f, "**Error:** {}\n", error)?;
    }
    writeln!(f, "---\n")
}
