//! Error types for syllabus processing.

use thiserror::Error;

/// Errors that can occur while extracting, resolving, syncing or storing tasks.
///
/// There is no unresolvable-date variant: items without a derivable date are
/// dropped by the resolver, not reported.
#[derive(Error, Debug)]
pub enum SyllabusError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Parsing failed: {0}")]
    ExtractionFailed(String),

    #[error("Malformed task output: {message}")]
    MalformedOutput { message: String, raw: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SyllabusError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SyllabusError::Unauthorized(_))
    }

    /// The offending raw text, for errors that carry one.
    pub fn raw(&self) -> Option<&str> {
        match self {
            SyllabusError::MalformedOutput { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for SyllabusError {
    fn from(err: rusqlite::Error) -> Self {
        SyllabusError::Storage(err.to_string())
    }
}

/// Result type alias for syllabus operations.
pub type SyllabusResult<T> = Result<T, SyllabusError>;
