use ccextract_providers::{
    NormalizeOptions, extract_bash_commands_from_file, extract_tool_operations_from_file,
    normalize_file, project_folder_name, session_date,
};
use ccextract_render::{
    DocumentHeader, OutputFormat, render_bash_commands, render_tool_operations,
};
use ccextract_types::{ToolCategory, ToolFilter, ToolOperations, short_id};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::Result;
use crate::config::Config;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: OutputFormat,
    pub detailed: bool,
    pub include_thinking: bool,
    /// Group output under `YYYY-MM-DD/`
    pub by_day: bool,
    /// Group output under a folder named after the session's project
    pub by_project: bool,
    pub overwrite: bool,
}

impl ExportOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            format: config.format,
            detailed: config.detailed,
            include_thinking: config.include_thinking,
            by_day: config.by_day,
            by_project: config.by_project,
            overwrite: config.overwrite,
        }
    }

    fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            detailed: self.detailed,
            include_thinking: self.include_thinking,
        }
    }
}

/// What to produce from each session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportJob {
    Conversation,
    BashCommands,
    ToolOperations { filter: ToolFilter, detailed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// `count` is messages, commands or operations depending on the job
    Written { path: PathBuf, count: usize },
    /// An export of this session already exists and overwrite is off
    Skipped { path: PathBuf },
    /// Nothing to write for this session
    Empty,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<(PathBuf, usize)>,
    pub skipped: Vec<PathBuf>,
    /// Sessions that produced nothing
    pub empty: Vec<PathBuf>,
    /// Sessions that failed, with the error text
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total_items(&self) -> usize {
        self.written.iter().map(|(_, count)| count).sum()
    }
}

/// Writes exports under one output root
pub struct Exporter {
    root: PathBuf,
    options: ExportOptions,
}

impl Exporter {
    pub fn new(root: impl Into<PathBuf>, options: ExportOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn run(&self, session: &Path, job: &ExportJob) -> Result<ExportOutcome> {
        match job {
            ExportJob::Conversation => self.export_session(session),
            ExportJob::BashCommands => self.export_bash_commands(session),
            ExportJob::ToolOperations { filter, detailed } => {
                self.export_tool_operations(session, filter, *detailed)
            }
        }
    }

    /// Normalize a session and write it in the configured format
    pub fn export_session(&self, session: &Path) -> Result<ExportOutcome> {
        let ext = self.options.format.extension();
        if let Some(existing) = self.existing_export(session, "", ext) {
            return Ok(ExportOutcome::Skipped { path: existing });
        }

        let messages = normalize_file(session, &self.options.normalize_options())?;
        let Some(first) = messages.first() else {
            return Ok(ExportOutcome::Empty);
        };

        let header = self.header(session, first.timestamp());
        let body = self.options.format.render(&header, &messages)?;
        let path = self.write(session, &header, "", ext, &body)?;
        Ok(ExportOutcome::Written {
            path,
            count: messages.len(),
        })
    }

    /// Write the session's successful shell commands as `…-bash.md`
    pub fn export_bash_commands(&self, session: &Path) -> Result<ExportOutcome> {
        if let Some(existing) = self.existing_export(session, "-bash", "md") {
            return Ok(ExportOutcome::Skipped { path: existing });
        }

        let commands = extract_bash_commands_from_file(session)?;
        let Some(first) = commands.first() else {
            return Ok(ExportOutcome::Empty);
        };

        let header = self.header(session, &first.timestamp);
        let body = render_bash_commands(&header, &commands);
        let path = self.write(session, &header, "-bash", "md", &body)?;
        Ok(ExportOutcome::Written {
            path,
            count: commands.len(),
        })
    }

    /// Write the session's tracked tool operations as `…-tools.md`
    pub fn export_tool_operations(
        &self,
        session: &Path,
        filter: &ToolFilter,
        detailed: bool,
    ) -> Result<ExportOutcome> {
        if let Some(existing) = self.existing_export(session, "-tools", "md") {
            return Ok(ExportOutcome::Skipped { path: existing });
        }

        let ops = extract_tool_operations_from_file(session, filter, detailed)?;
        let Some(timestamp) = first_timestamp(&ops) else {
            return Ok(ExportOutcome::Empty);
        };

        let header = self.header(session, timestamp);
        let body = render_tool_operations(&header, &ops);
        let path = self.write(session, &header, "-tools", "md", &body)?;
        Ok(ExportOutcome::Written {
            path,
            count: ops.total(),
        })
    }

    /// Run `job` over every session. Failures are recorded, never fatal.
    pub fn export_many(&self, sessions: &[PathBuf], job: &ExportJob) -> BatchReport {
        let mut report = BatchReport::default();
        for (i, session) in sessions.iter().enumerate() {
            match self.run(session, job) {
                Ok(ExportOutcome::Written { path, count }) => {
                    info!(
                        progress = %format!("{}/{}", i + 1, sessions.len()),
                        output = %path.display(),
                        count,
                        "exported"
                    );
                    report.written.push((path, count));
                }
                Ok(ExportOutcome::Skipped { path }) => {
                    info!(output = %path.display(), "already exported, skipping");
                    report.skipped.push(path);
                }
                Ok(ExportOutcome::Empty) => {
                    info!(session = %session.display(), "nothing to export");
                    report.empty.push(session.clone());
                }
                Err(err) => {
                    warn!(session = %session.display(), error = %err, "export failed");
                    report.failed.push((session.clone(), err.to_string()));
                }
            }
        }
        report
    }

    /// Document header; names the project when grouping by project
    fn header(&self, session: &Path, timestamp: &str) -> DocumentHeader {
        let header = DocumentHeader::from_timestamp(session_id(session), timestamp);
        if self.options.by_project {
            header.with_project(project_folder_name(session))
        } else {
            header
        }
    }

    /// `root[/project][/date]`
    fn output_dir(&self, session: &Path, date: &str) -> PathBuf {
        let mut dir = self.root.clone();
        if self.options.by_project {
            dir.push(project_folder_name(session));
        }
        if self.options.by_day {
            dir.push(date);
        }
        dir
    }

    /// An earlier export of the same session and kind, whatever its time part
    fn existing_export(&self, session: &Path, suffix: &str, ext: &str) -> Option<PathBuf> {
        if self.options.overwrite {
            return None;
        }

        let date = session_date(session)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());
        let dir = self.output_dir(session, &date);
        let prefix = format!("{}-", date);
        let tail = format!("-{}{}.{}", short_id(&session_id(session)), suffix, ext);

        let mut matches: Vec<PathBuf> = std::fs::read_dir(&dir)
            .ok()?
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name();
                let name = name.to_string_lossy();
                name.starts_with(&prefix) && name.ends_with(&tail)
            })
            .map(|e| e.path())
            .collect();
        matches.sort();
        matches.into_iter().next()
    }

    fn write(
        &self,
        session: &Path,
        header: &DocumentHeader,
        suffix: &str,
        ext: &str,
        body: &str,
    ) -> Result<PathBuf> {
        let dir = self.output_dir(session, &header.date);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!(
            "{}-{}-{}{}.{}",
            header.date,
            header.time,
            header.short_id(),
            suffix,
            ext
        ));
        std::fs::write(&path, body)?;
        Ok(path)
    }
}

fn session_id(session: &Path) -> String {
    session
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Timestamp of the first operation in report order
fn first_timestamp(ops: &ToolOperations) -> Option<&str> {
    ToolCategory::ALL.iter().find_map(|category| {
        category
            .tools()
            .iter()
            .find_map(|tool| ops.for_tool(*category, tool).next())
            .map(|op| op.timestamp.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SESSION: &str = "abcd1234-5678-90ef";

    fn lines() -> Vec<String> {
        vec![
            r#"{"type":"user","timestamp":"2026-01-15T10:01:00.000Z","message":{"role":"user","content":"List files"}}"#.into(),
            r#"{"type":"assistant","timestamp":"2026-01-15T10:01:05.000Z","message":{"role":"assistant","content":[{"type":"text","text":"Listing."},{"type":"tool_use","id":"b1","name":"Bash","input":{"command":"git log"}}]}}"#.into(),
            r#"{"type":"user","timestamp":"2026-01-15T10:01:06.000Z","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"b1","content":"commit abc"}]}}"#.into(),
        ]
    }

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("projects").join("-Users-alice-app");
        fs::create_dir_all(&project).unwrap();
        let session = project.join(format!("{}.jsonl", SESSION));
        fs::write(&session, lines().join("\n")).unwrap();
        let out = tmp.path().join("out");
        (tmp, session, out)
    }

    #[test]
    fn test_export_session_writes_named_file() {
        let (_tmp, session, out) = setup();
        let exporter = Exporter::new(&out, ExportOptions::default());

        let outcome = exporter.export_session(&session).unwrap();
        let expected = out.join("2026-01-15-10_01-abcd1234.md");
        assert_eq!(
            outcome,
            ExportOutcome::Written {
                path: expected.clone(),
                count: 2
            }
        );
        let body = fs::read_to_string(expected).unwrap();
        assert!(body.starts_with("# Claude Conversation Log\n\nSession ID: abcd1234-5678-90ef\n"));
    }

    #[test]
    fn test_existing_export_is_skipped_unless_overwrite() {
        let (_tmp, session, out) = setup();
        fs::create_dir_all(&out).unwrap();
        let earlier = out.join("2026-01-15-09_00-abcd1234.md");
        fs::write(&earlier, "old").unwrap();

        let exporter = Exporter::new(&out, ExportOptions::default());
        assert_eq!(
            exporter.export_session(&session).unwrap(),
            ExportOutcome::Skipped { path: earlier }
        );

        let exporter = Exporter::new(
            &out,
            ExportOptions {
                overwrite: true,
                ..Default::default()
            },
        );
        assert!(matches!(
            exporter.export_session(&session).unwrap(),
            ExportOutcome::Written { .. }
        ));
    }

    #[test]
    fn test_by_project_and_day_layout() {
        let (_tmp, session, out) = setup();
        let exporter = Exporter::new(
            &out,
            ExportOptions {
                format: OutputFormat::Json,
                by_day: true,
                by_project: true,
                ..Default::default()
            },
        );

        let ExportOutcome::Written { path, .. } = exporter.export_session(&session).unwrap() else {
            panic!("expected a written export");
        };
        assert_eq!(
            path,
            out.join("_Users_alice_app")
                .join("2026-01-15")
                .join("2026-01-15-10_01-abcd1234.json")
        );
    }

    #[test]
    fn test_by_project_names_project_in_every_document() {
        let (_tmp, session, out) = setup();
        let exporter = Exporter::new(
            &out,
            ExportOptions {
                by_project: true,
                ..Default::default()
            },
        );

        let outcomes = [
            exporter.export_session(&session).unwrap(),
            exporter.export_bash_commands(&session).unwrap(),
            exporter
                .export_tool_operations(&session, &ToolFilter::all(), false)
                .unwrap(),
        ];
        for outcome in outcomes {
            let ExportOutcome::Written { path, .. } = outcome else {
                panic!("expected a written export, got {:?}", outcome);
            };
            let body = fs::read_to_string(&path).unwrap();
            assert!(
                body.contains("Date: 2026-01-15 10_01\nProject: _Users_alice_app\n"),
                "{}",
                path.display()
            );
        }

        let plain = Exporter::new(out.join("plain"), ExportOptions::default());
        let ExportOutcome::Written { path, .. } = plain.export_session(&session).unwrap() else {
            panic!("expected a written export");
        };
        assert!(!fs::read_to_string(path).unwrap().contains("Project:"));
    }

    #[test]
    fn test_projections() {
        let (_tmp, session, out) = setup();
        let exporter = Exporter::new(&out, ExportOptions::default());

        let bash = exporter.export_bash_commands(&session).unwrap();
        assert_eq!(
            bash,
            ExportOutcome::Written {
                path: out.join("2026-01-15-10_01-abcd1234-bash.md"),
                count: 1
            }
        );

        let tools = exporter
            .export_tool_operations(&session, &ToolFilter::all(), false)
            .unwrap();
        assert_eq!(
            tools,
            ExportOutcome::Written {
                path: out.join("2026-01-15-10_01-abcd1234-tools.md"),
                count: 1
            }
        );

        let files = exporter
            .export_tool_operations(&session, &ToolFilter::parse("file").unwrap(), false)
            .unwrap();
        assert!(matches!(files, ExportOutcome::Skipped { .. }));
    }

    #[test]
    fn test_export_many_records_failures() {
        let (tmp, session, out) = setup();
        let empty = tmp.path().join("empty.jsonl");
        fs::write(&empty, "").unwrap();
        let missing = tmp.path().join("missing.jsonl");

        let exporter = Exporter::new(&out, ExportOptions::default());
        let report = exporter.export_many(&[session, empty.clone(), missing.clone()], &ExportJob::Conversation);

        assert_eq!(report.written.len(), 1);
        assert_eq!(report.total_items(), 2);
        assert_eq!(report.empty, vec![empty]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, missing);
    }
}
