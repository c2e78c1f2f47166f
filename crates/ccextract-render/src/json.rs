use ccextract_types::Message;
use serde::Serialize;

use crate::Result;
use crate::header::DocumentHeader;

#[derive(Serialize)]
struct JsonDocument<'a> {
    session_id: &'a str,
    date: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<&'a str>,
    message_count: usize,
    messages: &'a [Message],
}

/// Conversation as pretty-printed JSON: `{session_id, date, message_count, messages}`
pub fn render_json(header: &DocumentHeader, messages: &[Message]) -> Result<String> {
    let doc = JsonDocument {
        session_id: &header.session_id,
        date: &header.date,
        project: header.project.as_deref(),
        message_count: messages.len(),
        messages,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_json_document_shape() {
        let header = DocumentHeader::new("abc12345-6789", "2026-01-15", "10_01");
        let messages = vec![
            Message::user("Hello", "2026-01-15T10:01:00Z"),
            Message::assistant("Hi", "2026-01-15T10:01:05Z"),
        ];

        let value: Value = serde_json::from_str(&render_json(&header, &messages).unwrap()).unwrap();
        assert_eq!(value["session_id"], "abc12345-6789");
        assert_eq!(value["date"], "2026-01-15");
        assert_eq!(value["message_count"], 2);
        assert_eq!(
            value["messages"][0],
            json!({"role": "user", "content": "Hello", "timestamp": "2026-01-15T10:01:00Z"})
        );
        assert_eq!(value["messages"][1]["role"], "assistant");
        assert!(value.get("project").is_none());

        let header = header.with_project("_Users_alice_app");
        let value: Value = serde_json::from_str(&render_json(&header, &messages).unwrap()).unwrap();
        assert_eq!(value["project"], "_Users_alice_app");
    }

    #[test]
    fn test_json_keeps_non_ascii() {
        let header = DocumentHeader::new("s", "2026-01-15", "10_01");
        let out = render_json(&header, &[Message::user("héllo ✓", "")]).unwrap();
        assert!(out.contains("héllo ✓"));
    }
}
