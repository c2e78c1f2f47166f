use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{FormatArg, LogLevel};

#[derive(Parser)]
#[command(name = "ccextract")]
#[command(about = "Export Claude Code conversations to Markdown, HTML or JSON", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: $CCEXTRACT_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log verbosity on stderr; RUST_LOG takes precedence
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Claude Code projects directory (default: ~/.claude/projects)
    #[arg(long, global = true)]
    pub claude_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List recent sessions, newest first")]
    List {
        #[arg(long, help = "Show at most N sessions")]
        limit: Option<usize>,
    },

    #[command(about = "List projects that have sessions")]
    Projects,

    #[command(about = "Export sessions to files")]
    Export(ExportArgs),
}

#[derive(Debug, Clone, Args)]
#[command(group(
    ArgGroup::new("selection")
        .required(true)
        .args(["session", "id", "recent", "all"])
))]
pub struct ExportArgs {
    #[arg(long, help = "Session numbers from `list` (comma-separated, 1-based)")]
    pub session: Option<String>,

    #[arg(long, help = "Session id, full or a unique prefix")]
    pub id: Option<String>,

    #[arg(long, value_name = "N", help = "The N most recent sessions")]
    pub recent: Option<usize>,

    #[arg(long, help = "Every session")]
    pub all: bool,

    #[arg(
        long,
        help = "Restrict --recent/--all to project numbers from `projects` (comma-separated)",
        conflicts_with_all = ["session", "id"]
    )]
    pub project: Option<String>,

    #[arg(long, help = "Output format (default from config, else markdown)")]
    pub format: Option<FormatArg>,

    #[arg(long, help = "Output directory")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Include tool use, system messages, metadata and statistics")]
    pub detailed: bool,

    #[arg(long, help = "Include thinking blocks")]
    pub thinking: bool,

    #[arg(long, help = "Group output into YYYY-MM-DD folders")]
    pub by_day: bool,

    #[arg(long, help = "Group output into project folders")]
    pub by_project: bool,

    #[arg(long, help = "Overwrite existing exports instead of skipping them")]
    pub overwrite: bool,

    #[arg(long, value_name = "YYYY-MM-DD", help = "Only sessions on or after this date")]
    pub from: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD", help = "Only sessions on or before this date")]
    pub to: Option<String>,

    #[arg(long, help = "Export successful shell commands with context", conflicts_with = "tool_ops")]
    pub bash_commands: bool,

    #[arg(long, help = "Export Read/Write/Edit/Grep/Glob/WebFetch/WebSearch and git operations")]
    pub tool_ops: bool,

    #[arg(
        long,
        requires = "tool_ops",
        value_name = "ITEMS",
        help = "Categories (file, search, web, git) or tool names, comma-separated"
    )]
    pub tool_filter: Option<String>,
}
