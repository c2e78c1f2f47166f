use ccextract_types::ToolCategory;

/// How the normalizer reacts to a Claude Code tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRole {
    /// Opens a question dialog; answered by a later tool result
    AskUser,
    /// Spawns a subagent whose transcript is stored beside the session
    SpawnSubagent,
    /// Carries the finished plan in `input.plan`
    ExitPlan,
    /// Shell command; git commands are tracked as their own category
    Shell,
    /// A tool the tool-operations report tracks
    Tracked(ToolCategory),
    Other,
}

const ASK_USER_TOOL: &str = "AskUserQuestion";
const SUBAGENT_TOOL: &str = "Task";
const EXIT_PLAN_TOOL: &str = "ExitPlanMode";
const SHELL_TOOL: &str = "Bash";

/// Classify a tool by its exact name
pub fn tool_role(name: &str) -> ToolRole {
    match name {
        ASK_USER_TOOL => ToolRole::AskUser,
        SUBAGENT_TOOL => ToolRole::SpawnSubagent,
        EXIT_PLAN_TOOL => ToolRole::ExitPlan,
        SHELL_TOOL => ToolRole::Shell,
        other => ToolCategory::of_tool(other)
            .map(ToolRole::Tracked)
            .unwrap_or(ToolRole::Other),
    }
}

/// Shell detection for the bash-commands report, which ignores case
pub fn is_shell_tool(name: &str) -> bool {
    name.eq_ignore_ascii_case(SHELL_TOOL)
}
