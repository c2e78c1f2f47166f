use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A question posed through the ask-user tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default, rename = "multiSelect")]
    pub multi_select: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// The user's pick for one question. Multi-select questions may come back as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    /// Build an answer from whatever JSON the tool result carried.
    /// Non-string scalars are kept in their JSON text form.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Answer::Single(s.clone()),
            Value::Array(items) => Answer::Multiple(
                items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other => Answer::Single(other.to_string()),
        }
    }

    /// Whether the option with this label was chosen.
    ///
    /// Single answers from multi-select questions arrive comma-joined, so they
    /// are split before comparing.
    pub fn selects(&self, label: &str) -> bool {
        match self {
            Answer::Single(s) => s == label || s.split(", ").any(|part| part == label),
            Answer::Multiple(items) => items.iter().any(|item| item == label),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Single(s) => f.write_str(s),
            Answer::Multiple(items) => f.write_str(&items.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_question_reads_multi_select_key() {
        let q: Question = serde_json::from_value(json!({
            "question": "Which database?",
            "header": "DB",
            "options": [{"label": "Postgres", "description": "Relational"}],
            "multiSelect": true
        }))
        .unwrap();

        assert!(q.multi_select);
        assert_eq!(q.options[0].label, "Postgres");
    }

    #[test]
    fn test_question_tolerates_missing_fields() {
        let q: Question = serde_json::from_value(json!({"question": "Proceed?"})).unwrap();
        assert_eq!(q.header, "");
        assert!(q.options.is_empty());
        assert!(!q.multi_select);
    }

    #[test]
    fn test_answer_from_value() {
        assert_eq!(Answer::from_value(&json!("Yes")), Answer::Single("Yes".into()));
        assert_eq!(
            Answer::from_value(&json!(["A", "B"])),
            Answer::Multiple(vec!["A".into(), "B".into()])
        );
        assert_eq!(Answer::from_value(&json!(3)), Answer::Single("3".into()));
    }

    #[test]
    fn test_answer_selects() {
        assert!(Answer::Single("Postgres".into()).selects("Postgres"));
        assert!(Answer::Single("Redis, Postgres".into()).selects("Postgres"));
        assert!(!Answer::Single("Postgres".into()).selects("Redis"));
        assert!(Answer::Multiple(vec!["A".into(), "B".into()]).selects("B"));
    }

    #[test]
    fn test_answer_display_joins_lists() {
        let a = Answer::Multiple(vec!["A".into(), "B".into()]);
        assert_eq!(a.to_string(), "A, B");
    }
}
