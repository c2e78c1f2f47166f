use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// One transcript line.
///
/// Decoding is tolerant: a line only fails when it is not JSON or has no
/// `type`. Sub-objects that do not have the expected shape decode to their
/// empty value instead of failing the whole line.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "kebab-case")]
pub(crate) enum RawEntry {
    User(ConversationEntry),
    Assistant(ConversationEntry),
    System(SystemEntry),
    Progress(ProgressEntry),
    FileHistorySnapshot(IgnoredEntry),
    #[serde(other)]
    Unknown,
}

impl RawEntry {
    /// `(version, gitBranch)` carried by the entry, if it is a kind that has them
    pub fn session_info(&self) -> Option<(&str, &str)> {
        match self {
            RawEntry::User(e) | RawEntry::Assistant(e) => Some((&e.version, &e.git_branch)),
            RawEntry::System(e) => Some((&e.version, &e.git_branch)),
            RawEntry::Progress(e) => Some((&e.version, &e.git_branch)),
            RawEntry::FileHistorySnapshot(_) | RawEntry::Unknown => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub(crate) struct IgnoredEntry {}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConversationEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient")]
    pub git_branch: String,
    #[serde(default, deserialize_with = "lenient")]
    pub cwd: String,
    /// Plan file name used by the exit-plan tool
    #[serde(default, deserialize_with = "lenient")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<ApiMessage>,
    #[serde(default, deserialize_with = "lenient")]
    pub tool_use_result: Option<ToolUseResult>,
}

impl ConversationEntry {
    /// The message, if its role matches the entry kind
    pub fn message_with_role(&self, role: &str) -> Option<&ApiMessage> {
        self.message.as_ref().filter(|m| m.role == role)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub(crate) struct ApiMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient")]
    pub model: String,
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: Vec<ContentBlock>,
    #[serde(default, deserialize_with = "lenient")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub(crate) struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
}

/// Structured side-channel data the client attaches to some tool results
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToolUseResult {
    /// Answers picked in an ask-user dialog, keyed by question text
    #[serde(default, deserialize_with = "lenient")]
    pub answers: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub agent_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum ContentBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    ToolUse {
        #[serde(default)]
        id: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: Value,
    },
    ToolResult {
        #[serde(default)]
        tool_use_id: String,
        #[serde(default)]
        content: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SystemEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient")]
    pub subtype: String,
    #[serde(default, deserialize_with = "lenient")]
    pub duration_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient")]
    pub git_branch: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient")]
    pub git_branch: String,
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<ProgressData>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressData {
    #[serde(default, deserialize_with = "lenient")]
    pub hook_event: String,
    #[serde(default, deserialize_with = "lenient")]
    pub hook_name: String,
}

/// Any entry, read only for its timestamp
#[derive(Debug, Deserialize, Clone, Default)]
pub(crate) struct TimestampProbe {
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: String,
}

/// Flatten a tool result body: a string as-is, a list of `{text}` blocks joined by newlines
pub(crate) fn tool_result_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object())
            .map(|obj| obj.get("text").and_then(Value::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decode into `T`, falling back to `T::default()` when the value has the wrong shape
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn deserialize_content<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => vec![ContentBlock::Text { text }],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
