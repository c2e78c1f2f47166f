use ccextract_types::{
    Answer, AssistantMessage, Message, MessageMetadata, PlanMessage, QaMessage, Question,
    Statistics, StatsMessage, SubagentMessage, TokenUsage,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

use super::io::{decode_entries, read_transcript};
use super::plan::{ParsedPlan, contains_plan_approval, parse_plan_approval, plan_from_exit_tool};
use super::schema::{
    ApiMessage, ConversationEntry, ContentBlock, ProgressEntry, RawEntry, SystemEntry,
    tool_result_text,
};
use super::subagent::{SubagentFiles, extract_agent_id, resolve_subagent};
use super::tool_mapping::{ToolRole, tool_role};
use crate::Result;
use crate::tool_analyzer::{describe_tool_use, input_str};
use crate::traits::SubagentResolver;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Emit system/hook messages, per-message metadata, tool-use summaries and trailing stats
    pub detailed: bool,
    /// Emit thinking blocks as their own messages
    pub include_thinking: bool,
}

/// Normalize transcript lines into messages.
///
/// Undecodable lines are skipped; this never fails.
pub fn normalize<I>(
    lines: I,
    options: &NormalizeOptions,
    subagents: &dyn SubagentResolver,
) -> Vec<Message>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut normalizer = Normalizer::new(*options, subagents);
    normalizer.feed_lines(lines);
    normalizer.finish()
}

/// Read and normalize a transcript, splicing subagents stored beside it
pub fn normalize_file(path: &Path, options: &NormalizeOptions) -> Result<Vec<Message>> {
    let lines = read_transcript(path)?;
    let subagents = SubagentFiles::for_transcript(path);
    Ok(normalize(lines, options, &subagents))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Main,
    /// Nested pass: no further splicing, no stats message
    Subagent,
}

#[derive(Debug)]
struct PendingTask {
    description: String,
    subagent_type: String,
}

/// State of one normalization pass
pub(crate) struct Normalizer<'a> {
    options: NormalizeOptions,
    subagents: &'a dyn SubagentResolver,
    mode: Mode,
    pending_questions: HashMap<String, Vec<Question>>,
    pending_tasks: HashMap<String, PendingTask>,
    stats: Statistics,
    first_model: Option<String>,
    messages: Vec<Message>,
}

impl<'a> Normalizer<'a> {
    pub fn new(options: NormalizeOptions, subagents: &'a dyn SubagentResolver) -> Self {
        Self::with_mode(options, subagents, Mode::Main)
    }

    pub fn for_subagent(options: NormalizeOptions, subagents: &'a dyn SubagentResolver) -> Self {
        Self::with_mode(options, subagents, Mode::Subagent)
    }

    fn with_mode(
        options: NormalizeOptions,
        subagents: &'a dyn SubagentResolver,
        mode: Mode,
    ) -> Self {
        Self {
            options,
            subagents,
            mode,
            pending_questions: HashMap::new(),
            pending_tasks: HashMap::new(),
            stats: Statistics::default(),
            first_model: None,
            messages: Vec::new(),
        }
    }

    pub fn feed_lines<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for entry in decode_entries(lines) {
            self.feed(&entry);
        }
    }

    pub fn first_model(&self) -> &str {
        self.first_model.as_deref().unwrap_or("")
    }

    /// Close the pass. Unanswered questions and unmatched tasks are dropped.
    pub fn finish(mut self) -> Vec<Message> {
        if !self.pending_questions.is_empty() {
            debug!(
                count = self.pending_questions.len(),
                "dropping unanswered questions"
            );
        }
        if self.mode == Mode::Main && self.options.detailed && !self.messages.is_empty() {
            self.messages.push(Message::Stats(StatsMessage {
                content: self.stats,
                timestamp: String::new(),
            }));
        }
        self.messages
    }

    fn feed(&mut self, entry: &RawEntry) {
        if let Some((version, git_branch)) = entry.session_info() {
            self.stats.seed_session(version, git_branch);
        }

        match entry {
            RawEntry::User(e) => self.on_user(e),
            RawEntry::Assistant(e) => self.on_assistant(e),
            RawEntry::System(e) => self.on_system(e),
            RawEntry::Progress(e) => self.on_progress(e),
            RawEntry::FileHistorySnapshot(_) | RawEntry::Unknown => {}
        }
    }

    fn on_user(&mut self, entry: &ConversationEntry) {
        let Some(msg) = entry.message_with_role("user") else {
            return;
        };

        if self.take_answers(entry, msg) || self.take_subagent_results(entry, msg) {
            return;
        }

        let text = flatten_text(&msg.content, false);
        if text.trim().is_empty() {
            return;
        }

        let message = if contains_plan_approval(&text) {
            let plan = parse_plan_approval(&text);
            plan_message(text, plan, &entry.timestamp)
        } else {
            Message::user(text, entry.timestamp.clone())
        };
        self.messages.push(message);
        self.stats.turn_count += 1;
    }

    fn on_assistant(&mut self, entry: &ConversationEntry) {
        let Some(msg) = entry.message_with_role("assistant") else {
            return;
        };

        if self.first_model.is_none() && !msg.model.is_empty() {
            self.first_model = Some(msg.model.clone());
        }
        let usage = msg.usage.unwrap_or_default();
        self.stats.record_usage(
            &msg.model,
            TokenUsage {
                input_tokens: usage.input_tokens,
                output_tokens: usage.output_tokens,
                cache_read_tokens: usage.cache_read_input_tokens,
                cache_creation_tokens: usage.cache_creation_input_tokens,
            },
        );

        let mut exit_plan: Option<&str> = None;
        for block in &msg.content {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };
            self.stats.record_tool_use(name);

            match tool_role(name) {
                ToolRole::AskUser => {
                    self.pending_questions
                        .insert(id.clone(), questions_from_input(input));
                }
                ToolRole::SpawnSubagent => {
                    self.pending_tasks.insert(
                        id.clone(),
                        PendingTask {
                            description: input_str(input, "description"),
                            subagent_type: input_str(input, "subagent_type"),
                        },
                    );
                }
                ToolRole::ExitPlan => {
                    if exit_plan.is_none()
                        && let Some(plan) = input.get("plan").and_then(Value::as_str)
                        && !plan.is_empty()
                    {
                        exit_plan = Some(plan);
                    }
                }
                ToolRole::Shell | ToolRole::Tracked(_) | ToolRole::Other => {}
            }
        }

        if let Some(plan) = exit_plan {
            let parsed = plan_from_exit_tool(plan, &entry.slug);
            self.messages
                .push(plan_message(plan.to_string(), parsed, &entry.timestamp));
            return;
        }

        if self.options.include_thinking {
            for block in &msg.content {
                if let ContentBlock::Thinking { thinking } = block
                    && !thinking.is_empty()
                {
                    self.messages
                        .push(Message::thinking(thinking.clone(), entry.timestamp.clone()));
                }
            }
        }

        let text = flatten_text(&msg.content, self.options.detailed);
        if text.trim().is_empty() {
            return;
        }

        if contains_plan_approval(&text) {
            let plan = parse_plan_approval(&text);
            self.messages
                .push(plan_message(text, plan, &entry.timestamp));
            return;
        }

        let metadata = self.options.detailed.then(|| MessageMetadata {
            model: msg.model.clone(),
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            cache_read_tokens: usage.cache_read_input_tokens,
            cwd: entry.cwd.clone(),
            git_branch: entry.git_branch.clone(),
        });
        self.messages.push(Message::Assistant(AssistantMessage {
            content: text,
            timestamp: entry.timestamp.clone(),
            metadata,
        }));
    }

    fn on_system(&mut self, entry: &SystemEntry) {
        let duration_ms = entry.duration_ms.unwrap_or(0.0).max(0.0);
        if entry.subtype == "turn_duration" {
            self.stats.total_duration_ms = self
                .stats
                .total_duration_ms
                .saturating_add(duration_ms.round() as u64);
        }

        if !self.options.detailed {
            return;
        }

        let text = match entry.subtype.as_str() {
            "turn_duration" => format!("Turn completed in {:.1}s", duration_ms / 1000.0),
            "local_command" => format!("Command: {}", entry.content),
            _ if !entry.content.is_empty() => entry.content.clone(),
            "" => "system".to_string(),
            other => other.to_string(),
        };
        self.messages.push(Message::system(
            format!("ℹ️ System: {}", text),
            entry.timestamp.clone(),
        ));
    }

    fn on_progress(&mut self, entry: &ProgressEntry) {
        if !self.options.detailed {
            return;
        }
        let Some(data) = &entry.data else {
            return;
        };
        if data.hook_event.is_empty() {
            return;
        }
        self.messages.push(Message::system(
            format!("⚙️ Hook: {} ({})", data.hook_event, data.hook_name),
            entry.timestamp.clone(),
        ));
    }

    /// Emit a Q&A message for every tool result that answers a pending question
    fn take_answers(&mut self, entry: &ConversationEntry, msg: &ApiMessage) -> bool {
        let Some(answers) = entry
            .tool_use_result
            .as_ref()
            .map(|r| &r.answers)
            .filter(|a| !a.is_empty())
        else {
            return false;
        };

        let mut emitted = false;
        for id in tool_result_ids(msg) {
            let Some(questions) = self.pending_questions.remove(id) else {
                continue;
            };
            let answers: BTreeMap<String, Answer> = answers
                .iter()
                .map(|(q, a)| (q.clone(), Answer::from_value(a)))
                .collect();
            self.messages.push(Message::Qa(QaMessage {
                questions,
                answers,
                timestamp: entry.timestamp.clone(),
            }));
            emitted = true;
        }
        emitted
    }

    /// Splice subagents for tool results of pending task invocations.
    ///
    /// Returns whether any result carried an agent id, in which case the
    /// entry has been fully consumed.
    fn take_subagent_results(&mut self, entry: &ConversationEntry, msg: &ApiMessage) -> bool {
        let mut consumed = false;
        for block in &msg.content {
            let ContentBlock::ToolResult {
                tool_use_id,
                content,
                ..
            } = block
            else {
                continue;
            };
            let Some(task) = self.pending_tasks.remove(tool_use_id) else {
                continue;
            };

            let body = tool_result_text(content);
            let agent_id = extract_agent_id(&body).map(str::to_string).or_else(|| {
                entry
                    .tool_use_result
                    .as_ref()
                    .and_then(|r| r.agent_id.clone())
            });
            let Some(agent_id) = agent_id else {
                debug!(tool_use_id, "task result without agent id");
                continue;
            };
            consumed = true;

            if self.mode == Mode::Subagent {
                debug!(%agent_id, "not splicing nested subagent");
                continue;
            }

            if let Some(result) = resolve_subagent(self.subagents, &agent_id, &self.options) {
                self.stats.subagent_count += 1;
                self.messages.push(Message::Subagent(SubagentMessage {
                    description: task.description,
                    subagent_type: task.subagent_type,
                    agent_id: result.agent_id,
                    model: result.model,
                    messages: result.messages,
                    timestamp: entry.timestamp.clone(),
                }));
            }
        }
        consumed
    }
}

/// Join the prose of a block list.
///
/// Tool results are never included. Tool calls are described inline only in
/// detailed mode.
pub(crate) fn flatten_text(blocks: &[ContentBlock], detailed: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    for block in blocks {
        match block {
            ContentBlock::Text { text } => parts.push(text.clone()),
            ContentBlock::ToolUse { name, input, .. } if detailed => {
                parts.extend(describe_tool_use(name, input));
            }
            _ => {}
        }
    }
    parts.join("\n")
}

fn tool_result_ids(msg: &ApiMessage) -> impl Iterator<Item = &str> {
    msg.content.iter().filter_map(|block| match block {
        ContentBlock::ToolResult { tool_use_id, .. } if !tool_use_id.is_empty() => {
            Some(tool_use_id.as_str())
        }
        _ => None,
    })
}

fn questions_from_input(input: &Value) -> Vec<Question> {
    input
        .get("questions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|q| serde_json::from_value(q.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn plan_message(content: String, plan: ParsedPlan, timestamp: &str) -> Message {
    Message::Plan(PlanMessage {
        content,
        plan_title: plan.title,
        plan_path: plan.path,
        plan_content: plan.content,
        timestamp: timestamp.to_string(),
    })
}
