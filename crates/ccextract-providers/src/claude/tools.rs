use ccextract_types::{
    BashCommand, ResultDetail, ToolCategory, ToolFilter, ToolOperation, ToolOperations,
    ToolResultSummary,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::path::Path;

use super::io::{decode_entries, read_transcript};
use super::schema::{ContentBlock, ConversationEntry, RawEntry, tool_result_text};
use super::tool_mapping::{ToolRole, is_shell_tool, tool_role};
use crate::Result;
use crate::tool_analyzer::{input_str, is_failed_result, is_git_command, truncate};

const MATCHES_PREVIEW_LEN: usize = 5;
const WEB_PREVIEW_CHARS: usize = 500;
const GIT_PREVIEW_CHARS: usize = 300;

/// Assistant prose collected since the last tool call or user turn
#[derive(Debug, Default)]
struct Context {
    parts: Vec<String>,
}

impl Context {
    fn absorb(&mut self, entry: &ConversationEntry) {
        let Some(msg) = entry.message_with_role("assistant") else {
            return;
        };
        for block in &msg.content {
            if let ContentBlock::Text { text } = block {
                self.push(text);
            }
        }
    }

    fn push(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.parts.push(text.to_string());
        }
    }

    /// Hand over the collected prose and start afresh
    fn take(&mut self) -> String {
        let joined = self.parts.join("\n\n");
        self.parts.clear();
        joined
    }

    fn clear(&mut self) {
        self.parts.clear();
    }
}

#[derive(Debug)]
struct PendingCommand {
    tool_use_id: String,
    command: BashCommand,
}

/// Shell commands that ran successfully, each with the prose that preceded it
pub fn extract_bash_commands<I>(lines: I) -> Vec<BashCommand>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut context = Context::default();
    let mut pending: VecDeque<PendingCommand> = VecDeque::new();
    let mut commands = Vec::new();

    for entry in decode_entries(lines) {
        match entry {
            RawEntry::Assistant(e) => {
                let Some(msg) = e.message_with_role("assistant") else {
                    continue;
                };
                for block in &msg.content {
                    match block {
                        ContentBlock::Text { text } => context.push(text),
                        ContentBlock::ToolUse { id, name, input } if is_shell_tool(name) => {
                            let command = input_str(input, "command");
                            if command.is_empty() {
                                continue;
                            }
                            pending.push_back(PendingCommand {
                                tool_use_id: id.clone(),
                                command: BashCommand {
                                    command,
                                    context: context.take(),
                                    timestamp: e.timestamp.clone(),
                                },
                            });
                        }
                        _ => {}
                    }
                }
            }
            RawEntry::User(e) => {
                for (tool_use_id, content) in tool_results(&e) {
                    let output = tool_result_text(content);
                    let by_id = (!tool_use_id.is_empty())
                        .then(|| pending.iter().position(|p| p.tool_use_id == tool_use_id))
                        .flatten();
                    let matched = match by_id {
                        Some(pos) => pending.remove(pos),
                        None => pending.pop_front(),
                    };
                    if let Some(cmd) = matched
                        && !is_failed_result(&output)
                    {
                        commands.push(cmd.command);
                    }
                }
                context.clear();
            }
            _ => {}
        }
    }

    commands
}

/// Read a transcript and extract its shell commands
pub fn extract_bash_commands_from_file(path: &Path) -> Result<Vec<BashCommand>> {
    Ok(extract_bash_commands(read_transcript(path)?))
}

#[derive(Debug)]
struct PendingOperation {
    tool_name: String,
    category: ToolCategory,
    context: String,
    timestamp: String,
    tool_use_id: String,
    input: Value,
}

impl PendingOperation {
    fn complete(self, result: ToolResultSummary) -> ToolOperation {
        ToolOperation {
            tool_name: self.tool_name,
            category: self.category,
            context: self.context,
            timestamp: self.timestamp,
            tool_use_id: self.tool_use_id,
            input: self.input,
            result,
        }
    }
}

/// File, search, web and git operations with summarized results.
///
/// Operations appear in the order their results arrived; calls that never
/// got a result follow with a `no_result` status.
pub fn extract_tool_operations<I>(lines: I, filter: &ToolFilter, detailed: bool) -> ToolOperations
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut context = Context::default();
    let mut pending: Vec<PendingOperation> = Vec::new();
    let mut ops = ToolOperations::default();

    for entry in decode_entries(lines) {
        match entry {
            RawEntry::Assistant(e) => {
                let Some(msg) = e.message_with_role("assistant") else {
                    continue;
                };
                for block in &msg.content {
                    match block {
                        ContentBlock::Text { text } => context.push(text),
                        ContentBlock::ToolUse { id, name, input } => {
                            let Some(category) = tracked_category(name, input, filter) else {
                                continue;
                            };
                            pending.push(PendingOperation {
                                tool_name: name.clone(),
                                category,
                                context: context.take(),
                                timestamp: e.timestamp.clone(),
                                tool_use_id: id.clone(),
                                input: input.clone(),
                            });
                        }
                        _ => {}
                    }
                }
            }
            RawEntry::User(e) => {
                for (tool_use_id, content) in tool_results(&e) {
                    let Some(pos) = pending.iter().position(|p| p.tool_use_id == tool_use_id)
                    else {
                        continue;
                    };
                    let op = pending.remove(pos);
                    let output = tool_result_text(content);
                    let summary = summarize_result(op.category, &op.tool_name, &output, detailed);
                    ops.push(op.complete(summary));
                }
                context.clear();
            }
            _ => {}
        }
    }

    for op in pending {
        ops.push(op.complete(ToolResultSummary::no_result()));
    }
    ops
}

/// Read a transcript and extract its tool operations
pub fn extract_tool_operations_from_file(
    path: &Path,
    filter: &ToolFilter,
    detailed: bool,
) -> Result<ToolOperations> {
    Ok(extract_tool_operations(
        read_transcript(path)?,
        filter,
        detailed,
    ))
}

fn tracked_category(name: &str, input: &Value, filter: &ToolFilter) -> Option<ToolCategory> {
    match tool_role(name) {
        ToolRole::Tracked(category) if filter.tracks(name) => Some(category),
        ToolRole::Shell
            if filter.tracks_git() && is_git_command(&input_str(input, "command")) =>
        {
            Some(ToolCategory::Git)
        }
        _ => None,
    }
}

/// `(tool_use_id, body)` of every tool result in a user entry, whatever its role
fn tool_results(entry: &ConversationEntry) -> impl Iterator<Item = (&str, &Value)> {
    entry
        .message
        .iter()
        .flat_map(|m| m.content.iter())
        .filter_map(|block| match block {
            ContentBlock::ToolResult {
                tool_use_id,
                content,
            } => Some((tool_use_id.as_str(), content)),
            _ => None,
        })
}

fn summarize_result(
    category: ToolCategory,
    tool_name: &str,
    output: &str,
    detailed: bool,
) -> ToolResultSummary {
    let failed = is_failed_result(output);
    let error = failed.then(|| output.split('\n').next().unwrap_or("").to_string());

    let detail = if detailed {
        ResultDetail::Output {
            output: output.to_string(),
        }
    } else {
        match category {
            ToolCategory::File if tool_name == "Read" => ResultDetail::FileRead {
                lines: if output.is_empty() {
                    0
                } else {
                    output.matches('\n').count() + 1
                },
                size_bytes: output.len(),
            },
            ToolCategory::File => ResultDetail::Status,
            ToolCategory::Search => {
                let lines: Vec<String> = output
                    .split('\n')
                    .filter(|l| !l.trim().is_empty())
                    .map(str::to_string)
                    .collect();
                ResultDetail::Matches {
                    matched_count: lines.len(),
                    matches_preview: lines.into_iter().take(MATCHES_PREVIEW_LEN).collect(),
                }
            }
            ToolCategory::Web => ResultDetail::Preview {
                preview: truncate(output, WEB_PREVIEW_CHARS),
            },
            ToolCategory::Git => ResultDetail::OutputPreview {
                output_preview: truncate(output, GIT_PREVIEW_CHARS),
            },
        }
    };

    ToolResultSummary {
        success: !failed,
        error,
        detail,
    }
}
