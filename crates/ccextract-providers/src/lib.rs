// Error types
pub mod error;

// Subagent transcript lookup
pub mod traits;

// Claude Code transcripts
pub mod claude;

// Tool result heuristics shared by the extractors
pub mod tool_analyzer;

pub use traits::{NoSubagents, SubagentResolver};

pub use claude::{
    NormalizeOptions, SubagentFiles, extract_bash_commands, extract_bash_commands_from_file,
    extract_tool_operations, extract_tool_operations_from_file, find_projects, find_session_by_id,
    find_sessions, normalize, normalize_file, project_folder_name, session_date,
    summarize_session,
};

pub use tool_analyzer::{is_failed_result, is_git_command, truncate};

pub use error::{Error, Result};
