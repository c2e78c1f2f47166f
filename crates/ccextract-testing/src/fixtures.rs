//! Builders for Claude Code transcript lines.
//!
//! Each function returns one JSONL line. Timestamps are passed through
//! verbatim so tests control dates and file names.

use serde_json::{Value, json};

pub const MODEL: &str = "claude-sonnet-4-5";

/// A plain user prompt
pub fn user(timestamp: &str, text: &str) -> String {
    json!({
        "type": "user",
        "timestamp": timestamp,
        "message": {"role": "user", "content": text},
    })
    .to_string()
}

/// An assistant reply with a single text block
pub fn assistant(timestamp: &str, text: &str) -> String {
    json!({
        "type": "assistant",
        "timestamp": timestamp,
        "message": {
            "role": "assistant",
            "model": MODEL,
            "content": [{"type": "text", "text": text}],
            "usage": {"input_tokens": 100, "output_tokens": 20},
        },
    })
    .to_string()
}

/// An assistant turn that says `text` and then calls `tool`
pub fn tool_use(timestamp: &str, text: &str, id: &str, tool: &str, input: Value) -> String {
    json!({
        "type": "assistant",
        "timestamp": timestamp,
        "message": {
            "role": "assistant",
            "model": MODEL,
            "content": [
                {"type": "text", "text": text},
                {"type": "tool_use", "id": id, "name": tool, "input": input},
            ],
        },
    })
    .to_string()
}

/// Shorthand for a `Bash` tool call
pub fn bash(timestamp: &str, text: &str, id: &str, command: &str) -> String {
    tool_use(timestamp, text, id, "Bash", json!({"command": command}))
}

/// The user-side result of tool call `id`
pub fn tool_result(timestamp: &str, id: &str, content: &str) -> String {
    json!({
        "type": "user",
        "timestamp": timestamp,
        "message": {
            "role": "user",
            "content": [{"type": "tool_result", "tool_use_id": id, "content": content}],
        },
    })
    .to_string()
}

/// A `Task` call that spawns subagent `agent_id`, and its result line
pub fn subagent_task(
    timestamp: &str,
    id: &str,
    description: &str,
    agent_id: &str,
) -> [String; 2] {
    [
        tool_use(
            timestamp,
            "Delegating.",
            id,
            "Task",
            json!({"description": description, "subagent_type": "Explore", "prompt": description}),
        ),
        tool_result(
            timestamp,
            id,
            &format!("Done.\nagentId: {} (for resuming)", agent_id),
        ),
    ]
}

/// A short prompt/reply session starting at `timestamp`
pub fn simple_session(timestamp: &str, prompt: &str, reply: &str) -> Vec<String> {
    vec![user(timestamp, prompt), assistant(timestamp, reply)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_single_line_json() {
        let lines = [
            user("2026-01-15T10:00:00Z", "multi\nline"),
            bash("2026-01-15T10:00:01Z", "Running.", "b1", "ls"),
            tool_result("2026-01-15T10:00:02Z", "b1", "a\nb"),
        ];
        for line in lines {
            assert!(!line.contains('\n'));
            let value: Value = serde_json::from_str(&line).unwrap();
            assert!(value["timestamp"].is_string());
        }
    }

    #[test]
    fn test_subagent_task_result_names_agent() {
        let [call, result] = subagent_task("2026-01-15T10:00:00Z", "t1", "Explore", "abc123");
        assert!(call.contains("\"name\":\"Task\""));
        assert!(result.contains("agentId: abc123"));
    }
}
