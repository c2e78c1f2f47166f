use anyhow::{Context, Result, bail};
use ccextract_providers::{find_projects, find_session_by_id, find_sessions};
use ccextract_render::OutputFormat;
use ccextract_runtime::{
    Config, ExportJob, ExportOptions, Exporter, filter_sessions_by_date, parse_date,
    parse_indices, resolve_output_dir,
};
use ccextract_types::ToolFilter;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::args::ExportArgs;
use crate::views::ExportReportView;

pub fn handle(claude_dir: &Path, config: &Config, args: ExportArgs) -> Result<()> {
    let from = args.from.as_deref().map(parse_date).transpose()?;
    let to = args.to.as_deref().map(parse_date).transpose()?;
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        bail!("--from {} is after --to {}", from, to);
    }

    let options = export_options(config, &args);
    let job = export_job(&args, options.detailed)?;

    let sessions = select_sessions(claude_dir, &args, from, to)?;
    if sessions.is_empty() {
        println!("No sessions to export.");
        return Ok(());
    }

    let configured = config.output_dir();
    let root = resolve_output_dir(args.output.as_deref(), configured.as_deref())
        .context("Failed to prepare the output directory")?;
    info!(
        sessions = sessions.len(),
        output = %root.display(),
        format = %options.format,
        "exporting"
    );

    let exporter = Exporter::new(&root, options);
    let report = exporter.export_many(&sessions, &job);
    print!(
        "{}",
        ExportReportView::new(&report, exporter.root(), unit(&job), super::use_color())
    );
    Ok(())
}

/// Config values, with any flag given on the command line switching its option on
fn export_options(config: &Config, args: &ExportArgs) -> ExportOptions {
    let base = ExportOptions::from_config(config);
    ExportOptions {
        format: args.format.map(OutputFormat::from).unwrap_or(base.format),
        detailed: base.detailed || args.detailed,
        include_thinking: base.include_thinking || args.thinking,
        by_day: base.by_day || args.by_day,
        by_project: base.by_project || args.by_project,
        overwrite: base.overwrite || args.overwrite,
    }
}

fn export_job(args: &ExportArgs, detailed: bool) -> Result<ExportJob> {
    if args.bash_commands {
        return Ok(ExportJob::BashCommands);
    }
    if args.tool_ops {
        let filter = match args.tool_filter.as_deref() {
            Some(spec) => ToolFilter::parse(spec)?,
            None => ToolFilter::all(),
        };
        return Ok(ExportJob::ToolOperations { filter, detailed });
    }
    Ok(ExportJob::Conversation)
}

fn unit(job: &ExportJob) -> &'static str {
    match job {
        ExportJob::Conversation => "messages",
        ExportJob::BashCommands => "commands",
        ExportJob::ToolOperations { .. } => "operations",
    }
}

/// Resolve the selection flags to transcript paths, in export order.
///
/// Date bounds apply to `--recent` and `--all`; explicit picks are taken as given.
fn select_sessions(
    claude_dir: &Path,
    args: &ExportArgs,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<PathBuf>> {
    if let Some(id) = &args.id {
        return Ok(vec![find_session_by_id(claude_dir, id)?]);
    }

    let sessions = find_sessions(claude_dir, None)
        .with_context(|| format!("Failed to scan {}", claude_dir.display()))?;

    if let Some(spec) = &args.session {
        let (indices, invalid) = parse_indices(spec, sessions.len());
        if !invalid.is_empty() {
            bail!(
                "Invalid session number(s): {} (valid: 1-{})",
                invalid.join(", "),
                sessions.len()
            );
        }
        return Ok(indices.into_iter().map(|i| sessions[i].clone()).collect());
    }

    let sessions = match &args.project {
        Some(spec) => restrict_to_projects(claude_dir, sessions, spec)?,
        None => sessions,
    };
    let mut sessions = filter_sessions_by_date(sessions, from, to);
    if let Some(recent) = args.recent {
        sessions.truncate(recent);
    }
    Ok(sessions)
}

fn restrict_to_projects(
    claude_dir: &Path,
    sessions: Vec<PathBuf>,
    spec: &str,
) -> Result<Vec<PathBuf>> {
    let projects = find_projects(claude_dir)
        .with_context(|| format!("Failed to scan {}", claude_dir.display()))?;
    let (indices, invalid) = parse_indices(spec, projects.len());
    if !invalid.is_empty() {
        bail!(
            "Invalid project number(s): {} (valid: 1-{})",
            invalid.join(", "),
            projects.len()
        );
    }

    let selected: Vec<&Path> = indices.iter().map(|&i| projects[i].path.as_path()).collect();
    for i in &indices {
        info!(project = %projects[*i].display_name, "selected project");
    }
    Ok(sessions
        .into_iter()
        .filter(|s| s.parent().is_some_and(|dir| selected.contains(&dir)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{Cli, Commands};
    use clap::Parser;

    fn export_args(args: &[&str]) -> ExportArgs {
        let cli = Cli::try_parse_from(
            ["ccextract", "export"].into_iter().chain(args.iter().copied()),
        )
        .unwrap();
        match cli.command {
            Commands::Export(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_flags_switch_config_options_on() {
        let config = Config {
            format: OutputFormat::Html,
            by_day: true,
            ..Default::default()
        };

        let options = export_options(&config, &export_args(&["--all", "--detailed"]));
        assert_eq!(options.format, OutputFormat::Html);
        assert!(options.by_day);
        assert!(options.detailed);
        assert!(!options.overwrite);

        let options = export_options(&config, &export_args(&["--all", "--format", "json"]));
        assert_eq!(options.format, OutputFormat::Json);
    }

    #[test]
    fn test_export_job_from_flags() {
        assert_eq!(
            export_job(&export_args(&["--all"]), false).unwrap(),
            ExportJob::Conversation
        );
        assert_eq!(
            export_job(&export_args(&["--all", "--bash-commands"]), false).unwrap(),
            ExportJob::BashCommands
        );
        assert_eq!(
            export_job(&export_args(&["--all", "--tool-ops", "--tool-filter", "git"]), true)
                .unwrap(),
            ExportJob::ToolOperations {
                filter: ToolFilter::parse("git").unwrap(),
                detailed: true
            }
        );
        let unknown = export_args(&["--all", "--tool-ops", "--tool-filter", "Bash"]);
        assert!(export_job(&unknown, false).is_err());
    }
}
