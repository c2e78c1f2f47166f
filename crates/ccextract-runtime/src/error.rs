use std::fmt;

/// Result type for ccextract-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Transcript discovery or parsing failed
    Provider(ccextract_providers::Error),

    /// Document rendering failed
    Render(ccextract_render::Error),

    /// Tool filter or other type-level validation failed
    Types(ccextract_types::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Date argument not in `YYYY-MM-DD` form
    InvalidDate(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Provider(err) => write!(f, "{}", err),
            Error::Render(err) => write!(f, "Render error: {}", err),
            Error::Types(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidDate(value) => {
                write!(f, "Invalid date '{}': expected YYYY-MM-DD", value)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Provider(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Types(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_) | Error::InvalidDate(_) => None,
        }
    }
}

impl From<ccextract_providers::Error> for Error {
    fn from(err: ccextract_providers::Error) -> Self {
        Error::Provider(err)
    }
}

impl From<ccextract_render::Error> for Error {
    fn from(err: ccextract_render::Error) -> Self {
        Error::Render(err)
    }
}

impl From<ccextract_types::Error> for Error {
    fn from(err: ccextract_types::Error) -> Self {
        Error::Types(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
