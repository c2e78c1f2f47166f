use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};

/// A shell command the assistant ran, with the prose that led up to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BashCommand {
    pub command: String,
    pub context: String,
    pub timestamp: String,
}

/// Grouping used by the tool-operations report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    File,
    Search,
    Web,
    /// `Bash` invocations whose command starts with `git`
    Git,
}

impl ToolCategory {
    /// Display order of the report sections
    pub const ALL: [ToolCategory; 4] = [
        ToolCategory::File,
        ToolCategory::Search,
        ToolCategory::Web,
        ToolCategory::Git,
    ];

    pub fn tools(&self) -> &'static [&'static str] {
        match self {
            ToolCategory::File => &["Read", "Write", "Edit"],
            ToolCategory::Search => &["Grep", "Glob"],
            ToolCategory::Web => &["WebFetch", "WebSearch"],
            ToolCategory::Git => &["Bash"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolCategory::File => "File Operations",
            ToolCategory::Search => "Search Operations",
            ToolCategory::Web => "Web Operations",
            ToolCategory::Git => "Git Operations",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::File => "file",
            ToolCategory::Search => "search",
            ToolCategory::Web => "web",
            ToolCategory::Git => "git",
        }
    }

    /// Category of a dedicated tool. `Bash` is only categorized by command content.
    pub fn of_tool(name: &str) -> Option<ToolCategory> {
        [ToolCategory::File, ToolCategory::Search, ToolCategory::Web]
            .into_iter()
            .find(|cat| cat.tools().contains(&name))
    }

    fn parse(s: &str) -> Option<ToolCategory> {
        ToolCategory::ALL
            .into_iter()
            .find(|cat| cat.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tools an extraction pass should keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFilter {
    tools: BTreeSet<&'static str>,
    git: bool,
}

impl Default for ToolFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl ToolFilter {
    pub fn all() -> Self {
        let tools = [ToolCategory::File, ToolCategory::Search, ToolCategory::Web]
            .iter()
            .flat_map(|cat| cat.tools().iter().copied())
            .collect();
        Self { tools, git: true }
    }

    /// Parse items such as `["file", "Grep", "git"]`.
    ///
    /// Categories match case-insensitively, as do tool names. An empty list
    /// selects everything.
    pub fn from_items<S: AsRef<str>>(items: &[S]) -> Result<Self> {
        let items: Vec<&str> = items
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .collect();
        if items.is_empty() {
            return Ok(Self::all());
        }

        let mut filter = Self {
            tools: BTreeSet::new(),
            git: false,
        };
        for item in items {
            if let Some(category) = ToolCategory::parse(item) {
                match category {
                    ToolCategory::Git => filter.git = true,
                    other => filter.tools.extend(other.tools().iter().copied()),
                }
                continue;
            }

            let tool = [ToolCategory::File, ToolCategory::Search, ToolCategory::Web]
                .iter()
                .flat_map(|cat| cat.tools().iter().copied())
                .find(|t| t.eq_ignore_ascii_case(item));
            match tool {
                Some(t) => {
                    filter.tools.insert(t);
                }
                None => return Err(Error::UnknownToolFilter(item.to_string())),
            }
        }
        Ok(filter)
    }

    /// Comma-separated form used on the command line
    pub fn parse(spec: &str) -> Result<Self> {
        let items: Vec<&str> = spec.split(',').collect();
        Self::from_items(&items)
    }

    pub fn tracks(&self, tool_name: &str) -> bool {
        self.tools.contains(tool_name)
    }

    pub fn tracks_git(&self) -> bool {
        self.git
    }
}

/// What a tool result boiled down to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultDetail {
    /// The call never got a result
    NoResult,
    /// Full output, kept in detailed mode
    Output { output: String },
    FileRead { lines: usize, size_bytes: usize },
    /// Write and Edit only report whether they worked
    Status,
    Matches {
        matched_count: usize,
        matches_preview: Vec<String>,
    },
    /// Web fetch/search text, cut to 500 chars
    Preview { preview: String },
    /// Git output, cut to 300 chars
    OutputPreview { output_preview: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResultSummary {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub detail: ResultDetail,
}

impl ToolResultSummary {
    pub fn no_result() -> Self {
        Self {
            success: false,
            error: None,
            detail: ResultDetail::NoResult,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match (&self.detail, self.success) {
            (ResultDetail::NoResult, _) => "no_result",
            (_, true) => "Success",
            (_, false) => "Failed",
        }
    }
}

/// One tracked tool invocation and its summarized result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOperation {
    pub tool_name: String,
    pub category: ToolCategory,
    pub context: String,
    pub timestamp: String,
    pub tool_use_id: String,
    pub input: Value,
    pub result: ToolResultSummary,
}

impl ToolOperation {
    /// String field from the tool input, if present
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.input.get(key).and_then(Value::as_str)
    }
}

/// Tracked operations of one session, in the order their results arrived.
/// Calls that never got a result come last.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolOperations {
    pub operations: Vec<ToolOperation>,
}

impl ToolOperations {
    pub fn push(&mut self, op: ToolOperation) {
        self.operations.push(op);
    }

    pub fn total(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn in_category(&self, category: ToolCategory) -> impl Iterator<Item = &ToolOperation> {
        self.operations
            .iter()
            .filter(move |op| op.category == category)
    }

    pub fn for_tool<'a>(
        &'a self,
        category: ToolCategory,
        tool_name: &'a str,
    ) -> impl Iterator<Item = &'a ToolOperation> {
        self.in_category(category)
            .filter(move |op| op.tool_name == tool_name)
    }

    pub fn count_in(&self, category: ToolCategory) -> usize {
        self.in_category(category).count()
    }

    /// Per-tool counts within a category, in display order, zero counts omitted
    pub fn tool_counts(&self, category: ToolCategory) -> Vec<(&'static str, usize)> {
        category
            .tools()
            .iter()
            .map(|tool| (*tool, self.for_tool(category, tool).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn op(tool: &str, category: ToolCategory) -> ToolOperation {
        ToolOperation {
            tool_name: tool.to_string(),
            category,
            context: String::new(),
            timestamp: String::new(),
            tool_use_id: format!("id-{tool}"),
            input: json!({"file_path": "/tmp/a.rs"}),
            result: ToolResultSummary::no_result(),
        }
    }

    #[test]
    fn test_filter_empty_selects_everything() {
        let filter = ToolFilter::parse("").unwrap();
        assert!(filter.tracks("Read"));
        assert!(filter.tracks("WebSearch"));
        assert!(filter.tracks_git());
    }

    #[test]
    fn test_filter_mixes_categories_and_tools() {
        let filter = ToolFilter::parse("search, Read ,GIT").unwrap();
        assert!(filter.tracks("Grep"));
        assert!(filter.tracks("Glob"));
        assert!(filter.tracks("Read"));
        assert!(!filter.tracks("Write"));
        assert!(!filter.tracks("WebFetch"));
        assert!(filter.tracks_git());
    }

    #[test]
    fn test_filter_rejects_unknown_items() {
        let err = ToolFilter::parse("file,Teleport").unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool filter: Teleport");
    }

    #[test]
    fn test_category_of_tool() {
        assert_eq!(ToolCategory::of_tool("Edit"), Some(ToolCategory::File));
        assert_eq!(ToolCategory::of_tool("Glob"), Some(ToolCategory::Search));
        assert_eq!(ToolCategory::of_tool("Bash"), None);
    }

    #[test]
    fn test_tool_counts_follow_display_order() {
        let mut ops = ToolOperations::default();
        ops.push(op("Edit", ToolCategory::File));
        ops.push(op("Read", ToolCategory::File));
        ops.push(op("Edit", ToolCategory::File));
        ops.push(op("Grep", ToolCategory::Search));

        assert_eq!(ops.tool_counts(ToolCategory::File), vec![("Read", 1), ("Edit", 2)]);
        assert_eq!(ops.count_in(ToolCategory::Search), 1);
        assert_eq!(ops.count_in(ToolCategory::Git), 0);
        assert_eq!(ops.operations[0].input_str("file_path"), Some("/tmp/a.rs"));
    }

    #[test]
    fn test_result_summary_serializes_flat() {
        let summary = ToolResultSummary {
            success: true,
            error: None,
            detail: ResultDetail::FileRead {
                lines: 3,
                size_bytes: 42,
            },
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["kind"], "file_read");
        assert_eq!(json["lines"], 3);
        assert_eq!(json["success"], true);
    }
}
