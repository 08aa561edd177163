use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),

    #[error("no format handles extension '{0}'")]
    UnknownExtension(String),

    #[error("{format} parse error: {message}")]
    ParseError { format: String, message: String },

    #[error("JSON serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormatError {
    pub fn parse(format: &str, message: impl ToString) -> Self {
        FormatError::ParseError {
            format: format.to_string(),
            message: message.to_string(),
        }
    }
}
