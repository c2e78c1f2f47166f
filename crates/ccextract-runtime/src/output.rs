use std::path::{Path, PathBuf};
use tracing::debug;

const FALLBACK_DIR: &str = "claude-logs";

/// Where exports go: the explicit directory, else the configured one, else
/// the first writable of `~/Desktop/Claude logs`, `~/Documents/Claude logs`,
/// `~/Claude logs` and `./claude-logs`.
///
/// The chosen directory is created.
pub fn resolve_output_dir(
    explicit: Option<&Path>,
    configured: Option<&Path>,
) -> std::io::Result<PathBuf> {
    if let Some(dir) = explicit.or(configured) {
        std::fs::create_dir_all(dir)?;
        return Ok(dir.to_path_buf());
    }

    for candidate in default_candidates() {
        if is_writable_dir(&candidate) {
            return Ok(candidate);
        }
        debug!(dir = %candidate.display(), "output directory not writable");
    }

    let fallback = PathBuf::from(FALLBACK_DIR);
    std::fs::create_dir_all(&fallback)?;
    Ok(fallback)
}

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join("Desktop").join("Claude logs"));
        candidates.push(home.join("Documents").join("Claude logs"));
        candidates.push(home.join("Claude logs"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(FALLBACK_DIR));
    }
    candidates
}

/// Create the directory and prove a file can be written in it
fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".ccextract-write-test");
    match std::fs::write(&probe, b"") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins_and_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let explicit = tmp.path().join("out").join("logs");
        let configured = tmp.path().join("configured");

        let dir = resolve_output_dir(Some(&explicit), Some(&configured)).unwrap();
        assert_eq!(dir, explicit);
        assert!(explicit.is_dir());
        assert!(!configured.exists());
    }

    #[test]
    fn test_configured_dir_used_without_explicit() {
        let tmp = tempfile::tempdir().unwrap();
        let configured = tmp.path().join("configured");

        let dir = resolve_output_dir(None, Some(&configured)).unwrap();
        assert_eq!(dir, configured);
        assert!(configured.is_dir());
    }

    #[test]
    fn test_is_writable_dir_leaves_no_probe() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(is_writable_dir(tmp.path()));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
