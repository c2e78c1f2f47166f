use ccextract_types::BashCommand;
use std::fmt;

use crate::header::DocumentHeader;

/// Shell commands with their context, one fenced block each
pub fn render_bash_commands(header: &DocumentHeader, commands: &[BashCommand]) -> String {
    BashLog { header, commands }.to_string()
}

struct BashLog<'a> {
    header: &'a DocumentHeader,
    commands: &'a [BashCommand],
}

impl<'a> fmt::Display for BashLog<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Bash Commands Log\n")?;
        writeln!(f, "Session ID: {}", self.header.session_id)?;
        writeln!(f, "Date: {} {}", self.header.date, self.header.time)?;
        if let Some(project) = &self.header.project {
            writeln!(f, "Project: {}", project)?;
        }
        writeln!(f)?;
        writeln!(f, "Total commands: {}\n", self.commands.len())?;
        writeln!(f, "---\n")?;

        for (i, cmd) in self.commands.iter().enumerate() {
            if !cmd.context.is_empty() {
                writeln!(f, "{}\n", cmd.context)?;
            }
            writeln!(f, "```bash\n{}\n```\n", cmd.command)?;
            if i + 1 < self.commands.len() {
                writeln!(f, "---\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_log() {
        let header = DocumentHeader::new("abc12345-6789", "2026-01-15", "10_01");
        let commands = vec![
            BashCommand {
                command: "cargo test".into(),
                context: "Run the tests.".into(),
                timestamp: String::new(),
            },
            BashCommand {
                command: "git status".into(),
                context: String::new(),
                timestamp: String::new(),
            },
        ];

        insta::assert_snapshot!(render_bash_commands(&header, &commands), @r"
        # Bash Commands Log

        Session ID: abc12345-6789
        Date: 2026-01-15 10_01

        Total commands: 2

        ---

        Run the tests.

        ```bash
        cargo test
        ```

        ---

        ```bash
        git status
        ```
        ");
    }
}
