use ccextract_types::{
    AssistantMessage, Message, PlanMessage, QaMessage, Statistics, SubagentMessage,
};
use std::fmt;

use crate::formatters::{format_duration_ms, format_number, metadata_parts};
use crate::header::DocumentHeader;

/// Conversation as a Markdown document
pub fn render_markdown(header: &DocumentHeader, messages: &[Message]) -> String {
    MarkdownDocument { header, messages }.to_string()
}

struct MarkdownDocument<'a> {
    header: &'a DocumentHeader,
    messages: &'a [Message],
}

impl<'a> MarkdownDocument<'a> {
    fn render_message(&self, f: &mut fmt::Formatter<'_>, message: &Message) -> fmt::Result {
        match message {
            Message::User(m) => writeln!(f, "## 👤 User\n\n{}\n", m.content),
            Message::Assistant(m) => self.render_assistant(f, m),
            Message::System(m) => writeln!(f, "### ℹ️ System\n\n{}\n", m.content),
            Message::Plan(m) => self.render_plan(f, m, false),
            Message::Qa(m) => self.render_qa(f, m, false),
            Message::Thinking(m) => {
                writeln!(f, "### 💭 Thinking\n")?;
                writeln!(f, "<details>\n<summary>Claude's reasoning</summary>\n")?;
                writeln!(f, "{}\n", m.content)?;
                writeln!(f, "</details>\n")
            }
            Message::Subagent(m) => self.render_subagent(f, m),
            Message::Stats(m) => self.render_stats(f, &m.content),
        }
    }

    fn render_assistant(&self, f: &mut fmt::Formatter<'_>, m: &AssistantMessage) -> fmt::Result {
        writeln!(f, "## 🤖 Claude\n")?;
        if let Some(metadata) = &m.metadata {
            writeln!(f, "> *{}*\n", metadata_parts(metadata).join(" | "))?;
        }
        writeln!(f, "{}\n", m.content)
    }

    fn render_plan(&self, f: &mut fmt::Formatter<'_>, m: &PlanMessage, nested: bool) -> fmt::Result {
        writeln!(
            f,
            "{} 📋 Approved Plan{}\n",
            heading(2, nested),
            subagent_suffix(nested)
        )?;
        writeln!(f, "**{}**\n", m.plan_title)?;
        if !m.plan_path.is_empty() {
            writeln!(f, "*Saved to: `{}`*\n", m.plan_path)?;
        }
        if !m.plan_content.is_empty() {
            writeln!(f, "---\n")?;
            writeln!(f, "{}\n", m.plan_content)?;
        }
        Ok(())
    }

    fn render_qa(&self, f: &mut fmt::Formatter<'_>, m: &QaMessage, nested: bool) -> fmt::Result {
        writeln!(
            f,
            "{} ❓ User Questions & Answers{}\n",
            heading(2, nested),
            subagent_suffix(nested)
        )?;
        for question in &m.questions {
            let answer = m.answer_for(question);
            if !question.header.is_empty() {
                writeln!(f, "{} {}\n", heading(3, nested), question.header)?;
            }
            writeln!(f, "**Q:** {}\n", question.question)?;

            if !question.options.is_empty() {
                writeln!(f, "**Choices:**")?;
                for option in &question.options {
                    if answer.is_some_and(|a| a.selects(&option.label)) {
                        write!(f, "- **✓ {}**", option.label)?;
                    } else {
                        write!(f, "- {}", option.label)?;
                    }
                    if !option.description.is_empty() {
                        write!(f, " - {}", option.description)?;
                    }
                    writeln!(f)?;
                }
                writeln!(f)?;
            }

            match answer {
                Some(a) => writeln!(f, "**Selected:** {}\n", a)?,
                None => writeln!(f, "**Selected:** No answer\n")?,
            }
        }
        Ok(())
    }

    fn render_subagent(&self, f: &mut fmt::Formatter<'_>, m: &SubagentMessage) -> fmt::Result {
        let description = or_default(&m.description, "Subagent task");
        writeln!(f, "### 🔄 Subagent: {}\n", description)?;
        write!(
            f,
            "> *Agent: {} | Model: {}",
            or_default(&m.agent_id, "unknown"),
            or_default(&m.model, "unknown")
        )?;
        if !m.subagent_type.is_empty() {
            write!(f, " | Type: {}", m.subagent_type)?;
        }
        writeln!(f, "*\n")?;

        for nested in &m.messages {
            self.render_nested(f, nested)?;
        }
        Ok(())
    }

    fn render_nested(&self, f: &mut fmt::Formatter<'_>, message: &Message) -> fmt::Result {
        match message {
            Message::User(n) => writeln!(f, "#### 👤 User (Subagent)\n\n{}\n", n.content),
            Message::Assistant(n) => writeln!(f, "#### 🤖 Claude (Subagent)\n\n{}\n", n.content),
            Message::System(n) => writeln!(f, "#### ℹ️ System (Subagent)\n\n{}\n", n.content),
            Message::Plan(n) => self.render_plan(f, n, true),
            Message::Qa(n) => self.render_qa(f, n, true),
            Message::Thinking(n) => {
                writeln!(f, "#### 💭 Thinking (Subagent)\n")?;
                writeln!(
                    f,
                    "<details>\n<summary>Reasoning</summary>\n\n{}\n\n</details>\n",
                    n.content
                )
            }
            // Splicing stops at one level; stats only close the main transcript
            Message::Subagent(_) | Message::Stats(_) => Ok(()),
        }
    }

    fn render_stats(&self, f: &mut fmt::Formatter<'_>, stats: &Statistics) -> fmt::Result {
        writeln!(f, "## 📊 Session Statistics\n")?;
        writeln!(f, "| Metric | Value |")?;
        writeln!(f, "|--------|-------|")?;
        for (metric, value) in stats_rows(stats) {
            writeln!(f, "| {} | {} |", metric, value)?;
        }
        writeln!(f)?;

        let tools = stats.tools_by_count();
        if !tools.is_empty() {
            writeln!(f, "**Tools breakdown:**")?;
            for (name, count) in tools {
                writeln!(f, "- {}: {}", name, count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for MarkdownDocument<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Claude Conversation Log\n")?;
        writeln!(f, "Session ID: {}", self.header.session_id)?;
        writeln!(f, "Date: {} {}", self.header.date, self.header.time)?;
        if let Some(project) = &self.header.project {
            writeln!(f, "Project: {}", project)?;
        }
        writeln!(f, "\n---\n")?;

        for message in self.messages {
            self.render_message(f, message)?;
            writeln!(f, "---\n")?;
        }
        Ok(())
    }
}

/// Metric/value rows of the statistics table; optional rows only when set
pub(crate) fn stats_rows(stats: &Statistics) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        (
            "Models",
            stats
                .models_used
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        ("User turns", stats.turn_count.to_string()),
        ("Tool invocations", stats.tool_use_count.to_string()),
        ("Subagents spawned", stats.subagent_count.to_string()),
        ("Total input tokens", format_number(stats.total_input_tokens)),
        ("Total output tokens", format_number(stats.total_output_tokens)),
    ];
    if stats.total_cache_read_tokens > 0 {
        rows.push((
            "Cache read tokens",
            format_number(stats.total_cache_read_tokens),
        ));
    }
    if stats.total_duration_ms > 0 {
        rows.push(("Total duration", format_duration_ms(stats.total_duration_ms)));
    }
    if !stats.session_version.is_empty() {
        rows.push(("Claude Code version", stats.session_version.clone()));
    }
    if !stats.git_branch.is_empty() {
        rows.push(("Git branch", stats.git_branch.clone()));
    }
    rows
}

/// `level` heading marks, two deeper inside a subagent section
fn heading(level: usize, nested: bool) -> String {
    "#".repeat(if nested { level + 2 } else { level })
}

fn subagent_suffix(nested: bool) -> &'static str {
    if nested { " (Subagent)" } else { "" }
}

pub(crate) fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}
