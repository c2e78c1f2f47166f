use ccextract_render::formatters::format_kb;
use ccextract_runtime::BatchReport;
use ccextract_types::{ProjectSummary, SessionSummary};
use owo_colors::OwoColorize;
use std::fmt;
use std::path::Path;

const RULE_WIDTH: usize = 80;

/// Apply `style` only when writing to a terminal
fn paint(text: &str, color: bool, style: fn(&str) -> String) -> String {
    if color { style(text) } else { text.to_string() }
}

fn bold(s: &str) -> String {
    s.bold().to_string()
}

fn cyan(s: &str) -> String {
    s.cyan().to_string()
}

fn dimmed(s: &str) -> String {
    s.dimmed().to_string()
}

fn green(s: &str) -> String {
    s.green().to_string()
}

fn yellow(s: &str) -> String {
    s.yellow().to_string()
}

fn red(s: &str) -> String {
    s.red().to_string()
}

// --------------------------------------------------------
// Session List View
// --------------------------------------------------------

pub struct SessionListView<'a> {
    /// 1-based list number paired with the summary
    sessions: &'a [(usize, SessionSummary)],
    total: usize,
    color: bool,
}

impl<'a> SessionListView<'a> {
    /// `total` is the number found before any `--limit`
    pub fn new(sessions: &'a [(usize, SessionSummary)], total: usize, color: bool) -> Self {
        Self {
            sessions,
            total,
            color,
        }
    }
}

impl<'a> fmt::Display for SessionListView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.total == 0 {
            writeln!(f, "No Claude sessions found.")?;
            return writeln!(
                f,
                "Make sure Claude Code has saved conversations, or pass --claude-dir."
            );
        }

        writeln!(f, "\nFound {} Claude sessions:\n", self.total)?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        for (number, session) in self.sessions {
            let number = format!("{}.", number);
            writeln!(
                f,
                "\n{} {}",
                paint(&number, self.color, bold),
                paint(&session.project, self.color, cyan)
            )?;
            writeln!(f, "   Session:  {}...", session.short_id())?;
            writeln!(
                f,
                "   Modified: {}",
                session.modified.format("%Y-%m-%d %H:%M")
            )?;
            writeln!(f, "   Messages: {}", session.line_count)?;
            writeln!(f, "   Size:     {}", format_kb(session.size_bytes))?;
            let preview = format!("\"{}...\"", session.preview);
            writeln!(f, "   Preview:  {}", paint(&preview, self.color, dimmed))?;
        }

        writeln!(f, "\n{}", "=".repeat(RULE_WIDTH))
    }
}

// --------------------------------------------------------
// Project List View
// --------------------------------------------------------

pub struct ProjectListView<'a> {
    projects: &'a [ProjectSummary],
    color: bool,
}

impl<'a> ProjectListView<'a> {
    pub fn new(projects: &'a [ProjectSummary], color: bool) -> Self {
        Self { projects, color }
    }
}

impl<'a> fmt::Display for ProjectListView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.projects.is_empty() {
            writeln!(f, "No Claude projects found.")?;
            return writeln!(
                f,
                "Make sure Claude Code has saved conversations, or pass --claude-dir."
            );
        }

        writeln!(f, "\nFound {} Claude projects:\n", self.projects.len())?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        for (i, project) in self.projects.iter().enumerate() {
            let number = format!("{}.", i + 1);
            writeln!(
                f,
                "\n{} {}",
                paint(&number, self.color, bold),
                paint(&project.display_name, self.color, cyan)
            )?;
            writeln!(f, "   Sessions:    {}", project.session_count)?;
            let last_active = project
                .last_active
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            writeln!(f, "   Last active: {}", last_active)?;
            writeln!(f, "   Total size:  {}", format_kb(project.total_size_bytes))?;
            writeln!(
                f,
                "   Path:        {}",
                paint(&project.dir_name, self.color, dimmed)
            )?;
        }

        writeln!(f, "\n{}", "=".repeat(RULE_WIDTH))
    }
}

// --------------------------------------------------------
// Export Report View
// --------------------------------------------------------

/// Per-session lines and a closing tally for one export run
pub struct ExportReportView<'a> {
    report: &'a BatchReport,
    root: &'a Path,
    /// "messages", "commands" or "operations"
    unit: &'a str,
    color: bool,
}

impl<'a> ExportReportView<'a> {
    pub fn new(report: &'a BatchReport, root: &'a Path, unit: &'a str, color: bool) -> Self {
        Self {
            report,
            root,
            unit,
            color,
        }
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

impl<'a> fmt::Display for ExportReportView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (path, count) in &self.report.written {
            writeln!(
                f,
                "{} {} ({} {})",
                paint("Saved:", self.color, green),
                self.relative(path),
                count,
                self.unit
            )?;
        }
        for path in &self.report.skipped {
            writeln!(
                f,
                "{} {} (already exists)",
                paint("Skipped:", self.color, yellow),
                self.relative(path)
            )?;
        }
        for path in &self.report.empty {
            writeln!(
                f,
                "{} {} (no {})",
                paint("Empty:", self.color, yellow),
                path.display(),
                self.unit
            )?;
        }
        for (path, error) in &self.report.failed {
            writeln!(
                f,
                "{} {}: {}",
                paint("Failed:", self.color, red),
                path.display(),
                error
            )?;
        }

        let attempted = self.report.written.len()
            + self.report.skipped.len()
            + self.report.empty.len()
            + self.report.failed.len();
        writeln!(
            f,
            "\nExported {}/{} sessions ({} {}) to {}",
            self.report.written.len(),
            attempted,
            self.report.total_items(),
            self.unit,
            self.root.display()
        )
    }
}
