use chrono::{DateTime, Local, NaiveDate, Utc};
use ccextract_types::{ProjectSummary, SessionSummary};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

use super::io::decode_entries;
use super::schema::{ContentBlock, RawEntry};
use crate::tool_analyzer::take_chars;
use crate::{Error, Result};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

const SUBAGENTS_DIR: &str = "subagents";
const AGENT_PREFIX: &str = "agent-";
const NO_PREVIEW: &str = "No preview available";
const PREVIEW_MAX_CHARS: usize = 100;
const PROJECT_FOLDER_MAX_CHARS: usize = 50;
const AMBIGUOUS_LISTED: usize = 5;

/// Main transcripts under `root` (or `root/project`), newest first.
///
/// Subagent transcripts are excluded; they belong to their parent session.
pub fn find_sessions(root: &Path, project: Option<&str>) -> Result<Vec<PathBuf>> {
    let search_dir = match project {
        Some(p) => root.join(p),
        None => root.to_path_buf(),
    };
    if !search_dir.exists() {
        return Ok(Vec::new());
    }

    let mut sessions: Vec<(PathBuf, Option<SystemTime>)> = WalkDir::new(&search_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_transcript(p) && !is_subagent_path(&search_dir, p))
        .map(|p| {
            let mtime = modified(&p);
            (p, mtime)
        })
        .collect();

    sessions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(sessions.into_iter().map(|(p, _)| p).collect())
}

/// Project directories holding transcripts, most recently active first
pub fn find_projects(root: &Path) -> Result<Vec<ProjectSummary>> {
    let mut latest: HashMap<PathBuf, Option<SystemTime>> = HashMap::new();
    for session in find_sessions(root, None)? {
        let Some(dir) = session.parent() else {
            continue;
        };
        let mtime = modified(&session);
        let slot = latest.entry(dir.to_path_buf()).or_insert(mtime);
        if mtime > *slot {
            *slot = mtime;
        }
    }

    let mut dirs: Vec<(PathBuf, Option<SystemTime>)> = latest.into_iter().collect();
    dirs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut projects = Vec::with_capacity(dirs.len());
    for (dir, last_active) in dirs {
        let direct: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_transcript(p))
            .collect();
        let total_size_bytes = direct
            .iter()
            .filter_map(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .sum();
        let dir_name = file_name(&dir);

        projects.push(ProjectSummary {
            display_name: project_display_name(&dir_name),
            dir_name,
            path: dir,
            session_count: direct.len(),
            total_size_bytes,
            last_active: last_active.map(DateTime::<Local>::from),
        });
    }
    Ok(projects)
}

/// Find a session by full id or unique prefix, ignoring case
pub fn find_session_by_id(root: &Path, session_id: &str) -> Result<PathBuf> {
    let query = session_id.trim().to_lowercase();
    if query.is_empty() {
        return Err(Error::SessionNotFound(session_id.to_string()));
    }

    let sessions = find_sessions(root, None)?;
    if let Some(exact) = sessions.iter().find(|s| stem(s).to_lowercase() == query) {
        return Ok(exact.clone());
    }

    let mut matches: Vec<PathBuf> = sessions
        .into_iter()
        .filter(|s| stem(s).to_lowercase().starts_with(&query))
        .collect();

    match matches.len() {
        0 => Err(Error::SessionNotFound(session_id.to_string())),
        1 => Ok(matches.remove(0)),
        total => Err(Error::AmbiguousSession {
            query: session_id.to_string(),
            matches: matches.iter().take(AMBIGUOUS_LISTED).map(|m| stem(m)).collect(),
            total,
        }),
    }
}

/// Subagent transcripts of a session: `{dir}/{stem}/subagents/agent-{id}.jsonl`, keyed by id
pub fn find_subagent_transcripts(main_transcript: &Path) -> BTreeMap<String, PathBuf> {
    let Some(parent) = main_transcript.parent() else {
        return BTreeMap::new();
    };
    let dir = parent.join(stem(main_transcript)).join(SUBAGENTS_DIR);

    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return BTreeMap::new(),
    };

    let mut found = BTreeMap::new();
    for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
        if !is_transcript(&path) {
            continue;
        }
        let file_stem = stem(&path);
        if let Some(agent_id) = file_stem.strip_prefix(AGENT_PREFIX) {
            found.insert(agent_id.to_string(), path);
        }
    }
    debug!(session = %main_transcript.display(), count = found.len(), "found subagent transcripts");
    found
}

/// Listing details for one session file
pub fn summarize_session(path: &Path) -> Result<SessionSummary> {
    let metadata = std::fs::metadata(path)?;
    let (preview, line_count) = session_preview(path)?;
    let modified = metadata
        .modified()
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now());

    Ok(SessionSummary {
        session_id: stem(path),
        path: path.to_path_buf(),
        project: path
            .parent()
            .map(|p| project_display_name(&file_name(p)))
            .unwrap_or_default(),
        modified,
        size_bytes: metadata.len(),
        preview,
        line_count,
    })
}

/// First meaningful user prompt and the raw line count
pub fn session_preview(path: &Path) -> Result<(String, usize)> {
    let lines = super::io::read_transcript(path)?;
    let line_count = lines.len();

    let preview = decode_entries(&lines)
        .filter_map(|entry| match entry {
            RawEntry::User(user) => user.message.filter(|m| m.role == "user"),
            _ => None,
        })
        .find_map(|msg| {
            msg.content.iter().find_map(|block| match block {
                ContentBlock::Text { text } => preview_text(text),
                _ => None,
            })
        })
        .unwrap_or_else(|| NO_PREVIEW.to_string());

    Ok((preview, line_count))
}

/// `YYYY-MM-DD` (UTC) of the first entry that carries a parseable timestamp
pub fn session_date(path: &Path) -> Option<NaiveDate> {
    let lines = super::io::read_transcript(path).ok()?;
    lines.iter().find_map(|line| {
        let probe: super::schema::TimestampProbe = serde_json::from_str(line.trim()).ok()?;
        parse_timestamp(&probe.timestamp).map(|dt| dt.date_naive())
    })
}

/// Parse a transcript timestamp such as `2026-01-15T10:01:00.000Z`
pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    if timestamp.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Readable form of an encoded project directory, e.g. `-Users-alice-src-app` -> `~/src/app`
pub fn project_display_name(dir_name: &str) -> String {
    let name = dir_name.replace('-', " ");
    let name = name.trim();
    if name.starts_with("Users") || name.starts_with("home") {
        let parts: Vec<&str> = name.split_whitespace().collect();
        return if parts.len() > 2 {
            format!("~/{}", parts[2..].join("/"))
        } else {
            "Home".to_string()
        };
    }
    name.to_string()
}

/// Folder name for by-project output, derived from the session's project directory
pub fn project_folder_name(session_path: &Path) -> String {
    let folder = session_path.parent().map(file_name).unwrap_or_default();
    let cleaned = folder.replace(['-', '%'], "_");
    let cleaned = take_chars(&cleaned, PROJECT_FOLDER_MAX_CHARS);
    if cleaned.is_empty() {
        "unknown_project".to_string()
    } else {
        cleaned.to_string()
    }
}

fn preview_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.starts_with("tool_use_id")
        || text.contains("[Request interrupted")
        || text.to_lowercase().contains("session is being continued")
    {
        return None;
    }

    let stripped = TAG_RE.replace_all(text, "");
    let mut text = stripped.trim();
    if text.contains("is running") && text.contains('…') {
        return None;
    }
    if text.starts_with("[Image #")
        && let Some((_, rest)) = text.split_once(']')
    {
        text = rest.trim();
    }

    if text.chars().count() > 3 {
        Some(take_chars(text, PREVIEW_MAX_CHARS).replace('\n', " "))
    } else {
        None
    }
}

fn is_transcript(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "jsonl")
}

/// Whether `path` sits in a `subagents` directory below `root`
fn is_subagent_path(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| c.as_os_str() == SUBAGENTS_DIR)
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
