use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One main transcript found on disk, as shown by `list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// File stem of the transcript
    pub session_id: String,
    pub path: PathBuf,
    /// Human-readable project name, e.g. `~/src/app`
    pub project: String,
    pub modified: DateTime<Local>,
    pub size_bytes: u64,
    /// First meaningful user prompt, flattened and cut to 100 chars
    pub preview: String,
    pub line_count: usize,
}

impl SessionSummary {
    /// First 8 characters of the id, used in listings and file names
    pub fn short_id(&self) -> &str {
        short_id(&self.session_id)
    }
}

/// A project directory under the Claude projects root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub path: PathBuf,
    /// Encoded directory name as stored on disk
    pub dir_name: String,
    pub display_name: String,
    pub session_count: usize,
    pub total_size_bytes: u64,
    pub last_active: Option<DateTime<Local>>,
}

pub fn short_id(session_id: &str) -> &str {
    match session_id.char_indices().nth(8) {
        Some((idx, _)) => &session_id[..idx],
        None => session_id,
    }
}
