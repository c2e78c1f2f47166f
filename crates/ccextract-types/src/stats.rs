use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Running totals for one top-level normalization pass.
///
/// Ordered collections keep serialized output stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub models_used: BTreeSet<String>,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_cache_read_tokens: u64,
    pub total_cache_creation_tokens: u64,
    pub turn_count: u64,
    pub tool_use_count: u64,
    pub tools_used: BTreeMap<String, u64>,
    pub subagent_count: u64,
    pub total_duration_ms: u64,
    pub session_version: String,
    pub git_branch: String,
}

/// Token counts reported on a single assistant reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_creation_tokens: u64,
}

impl Statistics {
    pub fn record_tool_use(&mut self, name: &str) {
        let name = if name.is_empty() { "unknown" } else { name };
        self.tool_use_count += 1;
        *self.tools_used.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn record_usage(&mut self, model: &str, usage: TokenUsage) {
        if !model.is_empty() {
            self.models_used.insert(model.to_string());
        }
        self.total_input_tokens = self.total_input_tokens.saturating_add(usage.input_tokens);
        self.total_output_tokens = self.total_output_tokens.saturating_add(usage.output_tokens);
        self.total_cache_read_tokens = self
            .total_cache_read_tokens
            .saturating_add(usage.cache_read_tokens);
        self.total_cache_creation_tokens = self
            .total_cache_creation_tokens
            .saturating_add(usage.cache_creation_tokens);
    }

    /// Capture version and branch from the first entry that has a version
    pub fn seed_session(&mut self, version: &str, git_branch: &str) {
        if self.session_version.is_empty() && !version.is_empty() {
            self.session_version = version.to_string();
            self.git_branch = git_branch.to_string();
        }
    }

    pub fn tool_use_total(&self) -> u64 {
        self.tools_used.values().sum()
    }

    /// Tools ordered by invocation count, most used first; ties by name
    pub fn tools_by_count(&self) -> Vec<(&str, u64)> {
        let mut tools: Vec<(&str, u64)> = self
            .tools_used
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        tools.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_usage_saturates() {
        let mut stats = Statistics::default();
        let huge = TokenUsage {
            input_tokens: u64::MAX,
            output_tokens: u64::MAX - 1,
            cache_read_tokens: 7,
            cache_creation_tokens: 0,
        };
        stats.record_usage("m", huge);
        stats.record_usage("m", huge);

        assert_eq!(stats.total_input_tokens, u64::MAX);
        assert_eq!(stats.total_output_tokens, u64::MAX);
        assert_eq!(stats.total_cache_read_tokens, 14);
    }

    #[test]
    fn test_tool_use_total_matches_count() {
        let mut stats = Statistics::default();
        stats.record_tool_use("Bash");
        stats.record_tool_use("Read");
        stats.record_tool_use("Bash");
        stats.record_tool_use("");

        assert_eq!(stats.tool_use_count, 4);
        assert_eq!(stats.tool_use_total(), stats.tool_use_count);
        assert_eq!(stats.tools_used.get("unknown"), Some(&1));
    }

    #[test]
    fn test_tools_by_count_orders_descending() {
        let mut stats = Statistics::default();
        for name in ["Read", "Bash", "Bash", "Edit", "Bash", "Read"] {
            stats.record_tool_use(name);
        }

        assert_eq!(
            stats.tools_by_count(),
            vec![("Bash", 3), ("Read", 2), ("Edit", 1)]
        );
    }

    #[test]
    fn test_seed_session_only_once() {
        let mut stats = Statistics::default();
        stats.seed_session("", "ignored");
        assert_eq!(stats.git_branch, "");

        stats.seed_session("2.1.42", "main");
        stats.seed_session("2.1.43", "feature");
        assert_eq!(stats.session_version, "2.1.42");
        assert_eq!(stats.git_branch, "main");
    }

    #[test]
    fn test_record_usage_sums_tokens() {
        let mut stats = Statistics::default();
        let usage = TokenUsage {
            input_tokens: 1000,
            output_tokens: 200,
            cache_read_tokens: 5000,
            cache_creation_tokens: 10,
        };
        stats.record_usage("claude-opus-4-6", usage);
        stats.record_usage("claude-opus-4-6", usage);
        stats.record_usage("", usage);

        assert_eq!(stats.total_input_tokens, 3000);
        assert_eq!(stats.total_cache_creation_tokens, 30);
        assert_eq!(stats.models_used.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let mut stats = Statistics::default();
        stats.record_usage("b-model", TokenUsage::default());
        stats.record_usage("a-model", TokenUsage::default());

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["models_used"], serde_json::json!(["a-model", "b-model"]));
        assert!(json["tools_used"].is_object());
    }
}
