use serde_json::Value;

/// Markers that flag a tool result as failed when found on its first line
const FAILURE_MARKERS: &[&str] = &[
    "command not found",
    "no such file or directory",
    "permission denied",
    "fatal:",
];

/// Whether a tool result reads as a failure.
///
/// Only the first line is checked, case-insensitively.
pub fn is_failed_result(text: &str) -> bool {
    let first_line = text.split('\n').next().unwrap_or("").to_lowercase();
    FAILURE_MARKERS
        .iter()
        .any(|marker| first_line.contains(marker))
}

/// `git <subcommand>` as opposed to `gitk` or a command that merely mentions git
pub fn is_git_command(command: &str) -> bool {
    let cmd = command.trim();
    cmd.starts_with("git ") || cmd.starts_with("git\t")
}

/// Keep the first `max_chars` characters, marking the cut with `...`
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Keep the first `max_chars` characters without a marker
pub fn take_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// String field of a tool input, empty when absent
pub fn input_str(input: &Value, key: &str) -> String {
    input
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Inline description of a tool call used in detailed assistant text
pub fn describe_tool_use(name: &str, input: &Value) -> [String; 2] {
    let name = if name.is_empty() { "unknown" } else { name };
    let input = match input {
        Value::Null => "{}".to_string(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    [
        format!("\n🔧 Using tool: {}", name),
        format!("Input: {}\n", input),
    ]
}
