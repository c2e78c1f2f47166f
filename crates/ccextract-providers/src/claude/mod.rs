pub mod discovery;
pub mod io;
pub mod normalize;
pub mod plan;
pub(crate) mod schema;
pub mod subagent;
pub mod tool_mapping;
pub mod tools;

pub use self::discovery::{
    find_projects, find_session_by_id, find_sessions, find_subagent_transcripts,
    parse_timestamp, project_display_name, project_folder_name, session_date, session_preview,
    summarize_session,
};
pub use self::io::{TranscriptLines, open_transcript, read_transcript};
pub use self::normalize::{NormalizeOptions, normalize, normalize_file};
pub use self::plan::{ParsedPlan, contains_plan_approval, parse_plan_approval};
pub use self::subagent::{SubagentFiles, SubagentResult, extract_agent_id, resolve_subagent};
pub use self::tool_mapping::{ToolRole, is_shell_tool, tool_role};
pub use self::tools::{
    extract_bash_commands, extract_bash_commands_from_file, extract_tool_operations,
    extract_tool_operations_from_file,
};
