use std::fmt;

/// Result type for ccextract-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// A tool category or tool name that the extractor does not track
    UnknownToolFilter(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownToolFilter(name) => write!(f, "Unknown tool filter: {}", name),
        }
    }
}

impl std::error::Error for Error {}
