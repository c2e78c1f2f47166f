use ccextract_types::{Message, QaMessage, Role, Statistics, SubagentMessage};
use std::fmt;

use crate::formatters::{escape_html, metadata_parts};
use crate::header::DocumentHeader;
use crate::markdown::{or_default, stats_rows};

const STYLE: &str = r#"        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f5f5f5;
        }
        .header {
            background: white;
            padding: 20px;
            border-radius: 8px;
            margin-bottom: 20px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        h1 { color: #2c3e50; margin: 0 0 10px 0; }
        .metadata { color: #666; font-size: 0.9em; }
        .message {
            background: white;
            padding: 15px 20px;
            margin-bottom: 15px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .user { border-left: 4px solid #3498db; }
        .assistant { border-left: 4px solid #2ecc71; }
        .system { border-left: 4px solid #95a5a6; background: #f8f9fa; }
        .plan { border-left: 4px solid #9b59b6; background: #f9f5ff; }
        .plan-title { font-size: 1.1em; font-weight: bold; color: #9b59b6; margin-bottom: 5px; }
        .plan-path { font-size: 0.85em; color: #666; font-style: italic; margin-bottom: 10px; }
        .plan-content { border-top: 1px solid #e0d4f0; padding-top: 10px; margin-top: 10px; white-space: pre-wrap; }
        .qa { border-left: 4px solid #e67e22; background: #fef9f3; }
        .qa-header { font-weight: bold; color: #d35400; margin: 10px 0 5px 0; }
        .qa-question { font-weight: bold; margin-bottom: 5px; }
        .qa-answer { color: #27ae60; margin: 0 0 15px 20px; }
        .qa-choices { margin: 10px 0 10px 20px; padding: 10px; background: #f8f9fa; border-radius: 4px; }
        .qa-choices ul { margin: 5px 0 0 20px; padding: 0; }
        .qa-choices li { margin: 5px 0; color: #555; }
        .qa-choices li strong { color: #27ae60; }
        .thinking { border-left: 4px solid #8e44ad; background: #faf5ff; }
        .thinking summary { cursor: pointer; color: #8e44ad; font-weight: bold; }
        .subagent { border-left: 4px solid #16a085; background: #f0faf8; }
        .subagent-info { font-size: 0.85em; color: #666; font-style: italic; margin-bottom: 10px; }
        .subagent-message { margin: 0 0 8px 20px; padding: 8px 12px; border-left: 2px solid #ccc; }
        .stats { border-left: 4px solid #2980b9; background: #f5f9ff; }
        .stats-table { width: 100%; border-collapse: collapse; margin: 10px 0; }
        .stats-table th, .stats-table td { padding: 6px 12px; border: 1px solid #ddd; text-align: left; }
        .stats-table th { background: #eef3f9; }
        .msg-metadata { font-size: 0.8em; color: #888; font-style: italic; margin-bottom: 8px; }
        .role { font-weight: bold; margin-bottom: 10px; }
        .content { white-space: pre-wrap; word-wrap: break-word; }
"#;

/// Conversation as a self-contained HTML page; every transcript string is escaped
pub fn render_html(header: &DocumentHeader, messages: &[Message]) -> String {
    HtmlDocument { header, messages }.to_string()
}

struct HtmlDocument<'a> {
    header: &'a DocumentHeader,
    messages: &'a [Message],
}

fn role_display(role: Role) -> &'static str {
    match role {
        Role::User => "👤 User",
        Role::Assistant => "🤖 Claude",
        Role::System => "ℹ️ System",
        Role::Plan => "📋 Approved Plan",
        Role::Qa => "❓ Questions & Answers",
        Role::Thinking => "💭 Thinking",
        Role::Subagent => "🔄 Subagent",
        Role::Stats => "📊 Session Statistics",
    }
}

impl<'a> HtmlDocument<'a> {
    fn render_message(&self, f: &mut fmt::Formatter<'_>, message: &Message) -> fmt::Result {
        let role = message.role();
        writeln!(f, "    <div class=\"message {}\">", role.as_str())?;
        writeln!(f, "        <div class=\"role\">{}</div>", role_display(role))?;
        self.render_body(f, message)?;
        writeln!(f, "    </div>")
    }

    fn render_body(&self, f: &mut fmt::Formatter<'_>, message: &Message) -> fmt::Result {
        match message {
            Message::User(m) | Message::System(m) => content_div(f, &m.content)?,
            Message::Assistant(m) => {
                if let Some(metadata) = &m.metadata {
                    let line = metadata_parts(metadata).join(" | ");
                    writeln!(
                        f,
                        "        <div class=\"msg-metadata\">{}</div>",
                        escape_html(&line).replace('→', "&rarr;")
                    )?;
                }
                content_div(f, &m.content)?;
            }
            Message::Plan(m) => {
                writeln!(
                    f,
                    "        <div class=\"plan-title\">{}</div>",
                    escape_html(&m.plan_title)
                )?;
                if !m.plan_path.is_empty() {
                    writeln!(
                        f,
                        "        <div class=\"plan-path\">Saved to: {}</div>",
                        escape_html(&m.plan_path)
                    )?;
                }
                if !m.plan_content.is_empty() {
                    writeln!(
                        f,
                        "        <div class=\"plan-content\">{}</div>",
                        escape_html(&m.plan_content)
                    )?;
                }
            }
            Message::Qa(m) => self.render_qa(f, m)?,
            Message::Thinking(m) => {
                writeln!(f, "        <details>")?;
                writeln!(f, "            <summary>Claude's reasoning</summary>")?;
                writeln!(
                    f,
                    "            <div class=\"content\">{}</div>",
                    escape_html(&m.content)
                )?;
                writeln!(f, "        </details>")?;
            }
            Message::Subagent(m) => self.render_subagent(f, m)?,
            Message::Stats(m) => self.render_stats(f, &m.content)?,
        }
        Ok(())
    }

    fn render_qa(&self, f: &mut fmt::Formatter<'_>, m: &QaMessage) -> fmt::Result {
        for question in &m.questions {
            let answer = m.answer_for(question);
            if !question.header.is_empty() {
                writeln!(
                    f,
                    "        <div class=\"qa-header\">{}</div>",
                    escape_html(&question.header)
                )?;
            }
            writeln!(
                f,
                "        <div class=\"qa-question\">Q: {}</div>",
                escape_html(&question.question)
            )?;

            if !question.options.is_empty() {
                writeln!(f, "        <div class=\"qa-choices\"><strong>Choices:</strong><ul>")?;
                for option in &question.options {
                    let label = escape_html(&option.label);
                    if answer.is_some_and(|a| a.selects(&option.label)) {
                        write!(f, "            <li><strong>✓ {}</strong>", label)?;
                    } else {
                        write!(f, "            <li>{}", label)?;
                    }
                    if !option.description.is_empty() {
                        write!(f, " - <em>{}</em>", escape_html(&option.description))?;
                    }
                    writeln!(f, "</li>")?;
                }
                writeln!(f, "        </ul></div>")?;
            }

            let selected = answer
                .map(|a| a.to_string())
                .unwrap_or_else(|| "No answer".to_string());
            writeln!(
                f,
                "        <div class=\"qa-answer\">Selected: {}</div>",
                escape_html(&selected)
            )?;
        }
        Ok(())
    }

    fn render_subagent(&self, f: &mut fmt::Formatter<'_>, m: &SubagentMessage) -> fmt::Result {
        let mut info = vec![
            format!("Agent: {}", or_default(&m.agent_id, "unknown")),
            format!("Model: {}", or_default(&m.model, "unknown")),
        ];
        if !m.subagent_type.is_empty() {
            info.push(format!("Type: {}", m.subagent_type));
        }
        writeln!(
            f,
            "        <div class=\"subagent-info\">{} &mdash; {}</div>",
            escape_html(or_default(&m.description, "Subagent task")),
            escape_html(&info.join(" | "))
        )?;

        for nested in &m.messages {
            // Splicing stops at one level; stats only close the main transcript
            if matches!(nested, Message::Subagent(_) | Message::Stats(_)) {
                continue;
            }
            let role = nested.role();
            writeln!(f, "        <div class=\"subagent-message {}\">", role.as_str())?;
            writeln!(
                f,
                "        <div class=\"role\">{} (Subagent)</div>",
                role_display(role)
            )?;
            self.render_body(f, nested)?;
            writeln!(f, "        </div>")?;
        }
        Ok(())
    }

    fn render_stats(&self, f: &mut fmt::Formatter<'_>, stats: &Statistics) -> fmt::Result {
        writeln!(f, "        <table class=\"stats-table\">")?;
        writeln!(f, "            <tr><th>Metric</th><th>Value</th></tr>")?;
        for (metric, value) in stats_rows(stats) {
            writeln!(
                f,
                "            <tr><td>{}</td><td>{}</td></tr>",
                metric,
                escape_html(&value)
            )?;
        }
        writeln!(f, "        </table>")?;

        let tools = stats.tools_by_count();
        if !tools.is_empty() {
            writeln!(f, "        <div><strong>Tools breakdown:</strong><ul>")?;
            for (name, count) in tools {
                writeln!(f, "            <li>{}: {}</li>", escape_html(name), count)?;
            }
            writeln!(f, "        </ul></div>")?;
        }
        Ok(())
    }
}

fn content_div(f: &mut fmt::Formatter<'_>, content: &str) -> fmt::Result {
    writeln!(f, "        <div class=\"content\">{}</div>", escape_html(content))
}

impl<'a> fmt::Display for HtmlDocument<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session_id = escape_html(&self.header.session_id);
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        writeln!(f, "    <meta charset=\"UTF-8\">")?;
        writeln!(
            f,
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(
            f,
            "    <title>Claude Conversation - {}</title>",
            escape_html(self.header.short_id())
        )?;
        writeln!(f, "    <style>\n{}    </style>", STYLE)?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "    <div class=\"header\">")?;
        writeln!(f, "        <h1>Claude Conversation Log</h1>")?;
        writeln!(f, "        <div class=\"metadata\">")?;
        writeln!(f, "            <p>Session ID: {}</p>", session_id)?;
        writeln!(
            f,
            "            <p>Date: {} {}</p>",
            self.header.date, self.header.time
        )?;
        if let Some(project) = &self.header.project {
            writeln!(f, "            <p>Project: {}</p>", escape_html(project))?;
        }
        writeln!(f, "            <p>Messages: {}</p>", self.messages.len())?;
        writeln!(f, "        </div>")?;
        writeln!(f, "    </div>")?;

        for message in self.messages {
            self.render_message(f, message)?;
        }

        write!(f, "\n</body>\n</html>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccextract_types::{AssistantMessage, MessageMetadata, PlanMessage, StatsMessage};

    #[test]
    fn test_subagent_renders_every_nested_role() {
        let messages = vec![Message::Subagent(SubagentMessage {
            description: "Plan <refactor>".into(),
            agent_id: "a1b2c3".into(),
            messages: vec![
                Message::user("Look around", ""),
                Message::system("Turn took 3s", ""),
                Message::Plan(PlanMessage {
                    content: String::new(),
                    plan_title: "Split parser".into(),
                    plan_path: "~/.claude/plans/calm-owl.md".into(),
                    plan_content: "1. Split".into(),
                    timestamp: String::new(),
                }),
                Message::Stats(StatsMessage::default()),
            ],
            ..Default::default()
        })];

        let html = render_html(&header(), &messages);
        assert!(html.contains("Plan &lt;refactor&gt; &mdash; Agent: a1b2c3 | Model: unknown"));
        assert!(html.contains(
            "<div class=\"subagent-message system\">\n        <div class=\"role\">ℹ️ System (Subagent)</div>\n        <div class=\"content\">Turn took 3s</div>"
        ));
        assert!(html.contains("<div class=\"role\">📋 Approved Plan (Subagent)</div>"));
        assert!(html.contains("<div class=\"plan-title\">Split parser</div>"));
        assert!(!html.contains("stats-table"));
    }

    fn header() -> DocumentHeader {
        DocumentHeader::new("abc12345-6789", "2026-01-15", "10_01")
    }

    #[test]
    fn test_page_frame() {
        let html = render_html(&header(), &[Message::user("Hello", "")]);
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<title>Claude Conversation - abc12345</title>"));
        assert!(html.contains("<p>Messages: 1</p>"));
        assert!(!html.contains("<p>Project:"));

        let html = render_html(&header().with_project("<app>"), &[]);
        assert!(html.contains("<p>Project: &lt;app&gt;</p>"));
        assert!(html.contains("<div class=\"message user\">"));
        assert!(html.ends_with("</body>\n</html>"));
    }

    #[test]
    fn test_transcript_strings_are_escaped() {
        let messages = vec![
            Message::user("<script>alert('x')</script>", ""),
            Message::Plan(PlanMessage {
                content: String::new(),
                plan_title: "Use <T> & friends".into(),
                plan_path: String::new(),
                plan_content: "a < b".into(),
                timestamp: String::new(),
            }),
        ];

        let html = render_html(&header(), &messages);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert('x')&lt;/script&gt;"));
        assert!(html.contains("<div class=\"plan-title\">Use &lt;T&gt; &amp; friends</div>"));
        assert!(!html.contains("plan-path"));
    }

    #[test]
    fn test_metadata_uses_arrow_entity() {
        let messages = vec![Message::Assistant(AssistantMessage {
            content: "ok".into(),
            timestamp: String::new(),
            metadata: Some(MessageMetadata {
                model: "m".into(),
                input_tokens: 1500,
                output_tokens: 20,
                ..Default::default()
            }),
        })];

        let html = render_html(&header(), &messages);
        assert!(html.contains("<div class=\"msg-metadata\">model: m | tokens: 1,500&rarr;20</div>"));
    }

    #[test]
    fn test_stats_table_rows() {
        let mut stats = Statistics::default();
        stats.git_branch = "feat/<x>".into();
        stats.record_tool_use("Grep");

        let html = render_html(
            &header(),
            &[Message::Stats(StatsMessage {
                content: stats,
                timestamp: String::new(),
            })],
        );
        assert!(html.contains("<tr><td>Git branch</td><td>feat/&lt;x&gt;</td></tr>"));
        assert!(html.contains("<li>Grep: 1</li>"));
    }
}
