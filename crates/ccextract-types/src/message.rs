use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::question::{Answer, Question};
use crate::stats::Statistics;

/// One normalized unit of a conversation, ready for rendering.
///
/// Serialized with a `role` discriminant so that JSON output reads
/// `{"role": "user", "content": "...", "timestamp": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// Text typed by the human
    User(TextMessage),

    /// Model reply text (with per-message metadata in detailed mode)
    Assistant(AssistantMessage),

    /// Turn durations, local commands and hook notifications (detailed mode only)
    System(TextMessage),

    /// Approved implementation plan
    Plan(PlanMessage),

    /// Questions the model asked and the answers the user picked
    Qa(QaMessage),

    /// Model reasoning, only present when thinking output was requested
    Thinking(TextMessage),

    /// A nested subagent conversation spliced in place of its tool result
    Subagent(SubagentMessage),

    /// Session totals, always the final message (detailed mode only)
    Stats(StatsMessage),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

/// Per-message details attached to assistant replies in detailed mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cwd: String,
    pub git_branch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanMessage {
    /// Raw text the plan was recovered from
    pub content: String,
    pub plan_title: String,
    /// `~/.claude/plans/<slug>.md`, empty when it could not be recovered
    pub plan_path: String,
    pub plan_content: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaMessage {
    pub questions: Vec<Question>,
    /// Keyed by the question text
    pub answers: BTreeMap<String, Answer>,
    #[serde(default)]
    pub timestamp: String,
}

impl QaMessage {
    pub fn answer_for(&self, question: &Question) -> Option<&Answer> {
        self.answers.get(&question.question)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubagentMessage {
    pub description: String,
    pub subagent_type: String,
    pub agent_id: String,
    /// First model seen in the subagent transcript
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsMessage {
    pub content: Statistics,
    #[serde(default)]
    pub timestamp: String,
}

/// Discriminant of [`Message`], handy for counting and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    User,
    Assistant,
    System,
    Plan,
    Qa,
    Thinking,
    Subagent,
    Stats,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Plan => "plan",
            Role::Qa => "qa",
            Role::Thinking => "thinking",
            Role::Subagent => "subagent",
            Role::Stats => "stats",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Message::User(TextMessage {
            content: content.into(),
            timestamp: timestamp.into(),
        })
    }

    pub fn assistant(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Message::Assistant(AssistantMessage {
            content: content.into(),
            timestamp: timestamp.into(),
            metadata: None,
        })
    }

    pub fn system(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Message::System(TextMessage {
            content: content.into(),
            timestamp: timestamp.into(),
        })
    }

    pub fn thinking(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Message::Thinking(TextMessage {
            content: content.into(),
            timestamp: timestamp.into(),
        })
    }

    pub fn role(&self) -> Role {
        match self {
            Message::User(_) => Role::User,
            Message::Assistant(_) => Role::Assistant,
            Message::System(_) => Role::System,
            Message::Plan(_) => Role::Plan,
            Message::Qa(_) => Role::Qa,
            Message::Thinking(_) => Role::Thinking,
            Message::Subagent(_) => Role::Subagent,
            Message::Stats(_) => Role::Stats,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Message::User(m) | Message::System(m) | Message::Thinking(m) => &m.timestamp,
            Message::Assistant(m) => &m.timestamp,
            Message::Plan(m) => &m.timestamp,
            Message::Qa(m) => &m.timestamp,
            Message::Subagent(m) => &m.timestamp,
            Message::Stats(m) => &m.timestamp,
        }
    }

    /// Prose content, for the variants that carry any
    pub fn text(&self) -> Option<&str> {
        match self {
            Message::User(m) | Message::System(m) | Message::Thinking(m) => Some(&m.content),
            Message::Assistant(m) => Some(&m.content),
            Message::Plan(m) => Some(&m.content),
            Message::Qa(_) | Message::Subagent(_) | Message::Stats(_) => None,
        }
    }
}
