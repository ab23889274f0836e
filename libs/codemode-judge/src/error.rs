//! Error types for the answer verification engine
//!
//! Executor errors are local to one test case and end up as a failing
//! verdict with a diagnostic. Only `CheckError` aborts a whole check.

use thiserror::Error;

/// Failure of a single remote execution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutorError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("Executor timeout after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("Executor transport failure: {message}")]
    TransportFailure {
        status: Option<u16>,
        message: String,
    },
    #[error("Malformed executor response: {0}")]
    MalformedResponse(String),
}

impl ExecutorError {
    /// Label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutorError::UnsupportedLanguage(_) => "unsupported_language",
            ExecutorError::Timeout { .. } => "timeout",
            ExecutorError::TransportFailure { .. } => "transport_failure",
            ExecutorError::MalformedResponse(_) => "malformed_response",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecutorError::Timeout { .. })
    }
}

/// Question catalog lookup failure (the question may or may not exist)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Catalog backend error: {0}")]
    Backend(String),
    #[error("Catalog record could not be decoded: {0}")]
    Decode(String),
}

impl From<redis::RedisError> for CatalogError {
    fn from(err: redis::RedisError) -> Self {
        if err.kind() == redis::ErrorKind::TypeError {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Backend(err.to_string())
        }
    }
}

/// Failure of a whole `check_answer` call; no partial verdicts exist
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("Question not found: {0}")]
    QuestionNotFound(String),
    #[error("Question catalog failure: {0}")]
    Catalog(#[from] CatalogError),
}
