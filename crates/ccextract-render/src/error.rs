use std::fmt;

/// Result type for ccextract-render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering
#[derive(Debug)]
pub enum Error {
    /// JSON serialization failed
    Json(serde_json::Error),

    /// Format name not recognized
    UnknownFormat(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::UnknownFormat(name) => write!(
                f,
                "Unknown format: {} (expected markdown, json or html)",
                name
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::UnknownFormat(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
