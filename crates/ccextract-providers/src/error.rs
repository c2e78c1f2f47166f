use std::fmt;

/// Result type for ccextract-providers operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the providers layer
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// Walkdir error
    WalkDir(walkdir::Error),

    /// No session matched the given id or prefix
    SessionNotFound(String),

    /// A session id prefix matched more than one transcript
    AmbiguousSession {
        query: String,
        matches: Vec<String>,
        total: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::WalkDir(err) => write!(f, "Directory traversal error: {}", err),
            Error::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            Error::AmbiguousSession {
                query,
                matches,
                total,
            } => {
                write!(f, "Multiple sessions match '{}': {}", query, matches.join(", "))?;
                if *total > matches.len() {
                    write!(f, " ... and {} more", total - matches.len())?;
                }
                write!(f, ". Please provide a more specific ID.")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::SessionNotFound(_) | Error::AmbiguousSession { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err)
    }
}
