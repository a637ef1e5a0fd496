use std::fmt;

/// Comprehensive error types for netsift operations
#[derive(Debug)]
pub enum NetSiftError {
    /// IO error (reading input, writing results)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// HTTP client error (client construction only; probe failures are results)
    Http(reqwest::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// JSON serialization error
    Json(serde_json::Error),

    /// Interactive prompt error
    Dialog(dialoguer::Error),

    /// Invalid argument error
    InvalidArgument(String),

    /// Input produced nothing to extract or probe
    NothingToDo(String),

    /// A batch run was cancelled before every probe completed
    Cancelled { completed: usize, total: usize },

    /// The worker task running a batch panicked or was aborted
    TaskJoin(tokio::task::JoinError),
}

impl fmt::Display for NetSiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetSiftError::Io(err) => write!(f, "IO error: {err}"),
            NetSiftError::Config(msg) => write!(f, "Configuration error: {msg}"),
            NetSiftError::Http(err) => write!(f, "HTTP error: {err}"),
            NetSiftError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            NetSiftError::Json(err) => write!(f, "JSON error: {err}"),
            NetSiftError::Dialog(err) => write!(f, "Prompt error: {err}"),
            NetSiftError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            NetSiftError::NothingToDo(msg) => write!(f, "Nothing to do: {msg}"),
            NetSiftError::Cancelled { completed, total } => {
                write!(f, "Cancelled: {completed}/{total} probes completed")
            }
            NetSiftError::TaskJoin(err) => write!(f, "Worker task error: {err}"),
        }
    }
}

impl std::error::Error for NetSiftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetSiftError::Io(err) => Some(err),
            NetSiftError::Http(err) => Some(err),
            NetSiftError::TomlParsing(err) => Some(err),
            NetSiftError::Json(err) => Some(err),
            NetSiftError::Dialog(err) => Some(err),
            NetSiftError::TaskJoin(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NetSiftError {
    fn from(err: std::io::Error) -> Self {
        NetSiftError::Io(err)
    }
}

impl From<reqwest::Error> for NetSiftError {
    fn from(err: reqwest::Error) -> Self {
        NetSiftError::Http(err)
    }
}

impl From<toml::de::Error> for NetSiftError {
    fn from(err: toml::de::Error) -> Self {
        NetSiftError::TomlParsing(err)
    }
}

impl From<serde_json::Error> for NetSiftError {
    fn from(err: serde_json::Error) -> Self {
        NetSiftError::Json(err)
    }
}

impl From<dialoguer::Error> for NetSiftError {
    fn from(err: dialoguer::Error) -> Self {
        NetSiftError::Dialog(err)
    }
}

impl From<tokio::task::JoinError> for NetSiftError {
    fn from(err: tokio::task::JoinError) -> Self {
        NetSiftError::TaskJoin(err)
    }
}

impl NetSiftError {
    /// Whether this error is the user-visible "nothing to do" condition
    /// rather than a failure.
    pub fn is_nothing_to_do(&self) -> bool {
        matches!(self, NetSiftError::NothingToDo(_))
    }
}

/// Type alias for Results using NetSiftError
pub type Result<T> = std::result::Result<T, NetSiftError>;
