use ccextract_providers::{
    NormalizeOptions, extract_bash_commands_from_file, extract_tool_operations_from_file,
    normalize_file,
};
use ccextract_types::{Answer, Message, ResultDetail, Role, ToolCategory, ToolFilter};
use std::path::Path;

const SAMPLE: &str = "tests/samples/claude_session.jsonl";

fn sample() -> Option<&'static Path> {
    let path = Path::new(SAMPLE);
    if !path.exists() {
        eprintln!("Warning: Test file not found, skipping: {}", path.display());
        return None;
    }
    Some(path)
}

fn roles(messages: &[Message]) -> Vec<Role> {
    messages.iter().map(Message::role).collect()
}

#[test]
fn test_sample_normalizes_with_spliced_subagent() {
    let Some(path) = sample() else { return };

    let messages = normalize_file(path, &NormalizeOptions::default()).unwrap();
    assert_eq!(
        roles(&messages),
        vec![
            Role::User,
            Role::Assistant,
            Role::Subagent,
            Role::Assistant,
            Role::Qa,
            Role::Assistant,
        ]
    );

    let Message::Subagent(sub) = &messages[2] else {
        panic!("expected subagent message");
    };
    assert_eq!(sub.agent_id, "a1b2c3");
    assert_eq!(sub.description, "Explore config code");
    assert_eq!(sub.subagent_type, "Explore");
    assert_eq!(sub.model, "claude-haiku-4-5");
    assert_eq!(roles(&sub.messages), vec![Role::User, Role::Assistant]);

    let Message::Qa(qa) = &messages[4] else {
        panic!("expected qa message");
    };
    assert_eq!(qa.questions.len(), 1);
    assert_eq!(
        qa.answer_for(&qa.questions[0]),
        Some(&Answer::Single("TOML".into()))
    );

    assert_eq!(messages[5].text(), Some("Done, config loader added."));
}

#[test]
fn test_sample_detailed_stats() {
    let Some(path) = sample() else { return };

    let options = NormalizeOptions {
        detailed: true,
        include_thinking: false,
    };
    let messages = normalize_file(path, &options).unwrap();

    let Some(Message::Stats(stats)) = messages.last() else {
        panic!("expected trailing stats");
    };
    let stats = &stats.content;
    assert_eq!(stats.session_version, "2.1.0");
    assert_eq!(stats.git_branch, "main");
    assert_eq!(stats.turn_count, 1);
    assert_eq!(stats.tool_use_count, 5);
    assert_eq!(stats.tools_used.get("Bash"), Some(&2));
    assert_eq!(stats.subagent_count, 1);
    assert_eq!(stats.total_input_tokens, 620);
    assert_eq!(stats.total_output_tokens, 130);
    assert_eq!(stats.total_cache_read_tokens, 1000);
    assert_eq!(stats.total_duration_ms, 5400);
    assert!(stats.models_used.contains("claude-sonnet-4-5"));

    assert!(
        messages
            .iter()
            .any(|m| m.text() == Some("ℹ️ System: Turn completed in 5.4s"))
    );
}

#[test]
fn test_sample_bash_commands() {
    let Some(path) = sample() else { return };

    let commands = extract_bash_commands_from_file(path).unwrap();
    let names: Vec<&str> = commands.iter().map(|c| c.command.as_str()).collect();
    assert_eq!(names, vec!["cargo test", "git status"]);
    assert_eq!(commands[0].context, "Running the tests.");
    assert_eq!(commands[1].context, "");
}

#[test]
fn test_sample_tool_operations() {
    let Some(path) = sample() else { return };

    let ops = extract_tool_operations_from_file(path, &ToolFilter::all(), false).unwrap();
    assert_eq!(ops.total(), 2);
    assert_eq!(ops.count_in(ToolCategory::Git), 1);
    assert_eq!(ops.count_in(ToolCategory::File), 1);

    let read = ops.for_tool(ToolCategory::File, "Read").next().unwrap();
    assert_eq!(
        read.result.detail,
        ResultDetail::FileRead {
            lines: 2,
            size_bytes: 19
        }
    );
    assert_eq!(
        read.input_str("file_path"),
        Some("/Users/alice/src/app/src/config.rs")
    );
}
