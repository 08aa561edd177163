use thiserror::Error;

/// Why an artifact could not be loaded.
///
/// Never escapes the cache accessors: it is recorded on the cache entry and surfaced as an
/// error notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error fetching {path}: {message}")]
    Network { path: String, message: String },

    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("{path} not found")]
    NotFound { path: String },

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid artifact {path}: {message}")]
    Decode { path: String, message: String },
}

impl FetchError {
    pub fn decode(path: &str, message: impl ToString) -> Self {
        FetchError::Decode {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FetchError::Network { path, .. }
            | FetchError::Status { path, .. }
            | FetchError::NotFound { path }
            | FetchError::Io { path, .. }
            | FetchError::Decode { path, .. } => path,
        }
    }
}
