use ccextract_types::Message;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::discovery::find_subagent_transcripts;
use super::io::read_transcript;
use super::normalize::{NormalizeOptions, Normalizer};
use crate::traits::SubagentResolver;

static AGENT_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"agentId:\s*(\w+)").unwrap());

/// Agent id embedded in a subagent tool result, e.g. `agentId: a1b2c3 (for resuming)`
pub fn extract_agent_id(text: &str) -> Option<&str> {
    AGENT_ID_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Subagent transcripts stored next to a main transcript
#[derive(Debug, Clone, Default)]
pub struct SubagentFiles {
    files: BTreeMap<String, PathBuf>,
}

impl SubagentFiles {
    pub fn for_transcript(main_transcript: &Path) -> Self {
        Self {
            files: find_subagent_transcripts(main_transcript),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SubagentResolver for SubagentFiles {
    fn transcript_lines(&self, agent_id: &str) -> Option<Vec<String>> {
        let path = self.files.get(agent_id)?;
        match read_transcript(path) {
            Ok(lines) => Some(lines),
            Err(err) => {
                warn!(agent_id, path = %path.display(), error = %err, "unreadable subagent transcript");
                None
            }
        }
    }
}

/// A subagent conversation ready to be spliced into its parent
#[derive(Debug, Clone, PartialEq)]
pub struct SubagentResult {
    pub agent_id: String,
    /// First model seen in the subagent transcript
    pub model: String,
    pub messages: Vec<Message>,
}

/// Normalize the transcript of `agent_id`.
///
/// The nested pass never splices further subagents and never emits stats.
/// Returns `None` when the resolver has no transcript for the id.
pub fn resolve_subagent(
    resolver: &dyn SubagentResolver,
    agent_id: &str,
    options: &NormalizeOptions,
) -> Option<SubagentResult> {
    let Some(lines) = resolver.transcript_lines(agent_id) else {
        debug!(agent_id, "no transcript for subagent");
        return None;
    };

    let mut nested = Normalizer::for_subagent(*options, resolver);
    nested.feed_lines(lines);
    let model = nested.first_model().to_string();

    Some(SubagentResult {
        agent_id: agent_id.to_string(),
        model,
        messages: nested.finish(),
    })
}
