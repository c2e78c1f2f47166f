use std::collections::HashMap;

/// Source of subagent transcripts, keyed by agent id
///
/// The normalizer only needs the raw lines; where they live is up to the
/// implementation (files beside the session, memory in tests).
pub trait SubagentResolver {
    /// Raw lines of the agent's transcript, `None` when unknown or unreadable
    fn transcript_lines(&self, agent_id: &str) -> Option<Vec<String>>;
}

/// Resolver for transcripts that never splice subagents
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSubagents;

impl SubagentResolver for NoSubagents {
    fn transcript_lines(&self, _agent_id: &str) -> Option<Vec<String>> {
        None
    }
}

/// Transcripts held in memory
impl SubagentResolver for HashMap<String, Vec<String>> {
    fn transcript_lines(&self, agent_id: &str) -> Option<Vec<String>> {
        self.get(agent_id).cloned()
    }
}

impl<T: SubagentResolver + ?Sized> SubagentResolver for &T {
    fn transcript_lines(&self, agent_id: &str) -> Option<Vec<String>> {
        (**self).transcript_lines(agent_id)
    }
}
