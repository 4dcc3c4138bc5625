//! Classified sync errors
//!
//! Every failure the engine reports to observers is one of these. They are
//! `Clone` because the same error is both sent to the caller and broadcast
//! to every subscriber.

use repodeck_client::ClientError;
use repodeck_core::dto::repository::ValidationError;
use thiserror::Error;

/// Result type alias for engine commands
pub type Result<T> = std::result::Result<T, SyncError>;

/// A failure surfaced by the sync engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Detected locally; no request was sent
    #[error("{0}")]
    Validation(String),

    /// No response was obtained from the server
    #[error("Could not reach the server: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("{}", HttpStatusKind::from_status(*status))]
    HttpStatus { status: u16, message: String },

    /// A success response could not be understood
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// The engine task is gone
    #[error("sync engine is not running")]
    EngineStopped,
}

impl SyncError {
    /// Classification of an HTTP status failure, if this is one
    pub fn http_status(&self) -> Option<HttpStatusKind> {
        match self {
            SyncError::HttpStatus { status, .. } => Some(HttpStatusKind::from_status(*status)),
            _ => None,
        }
    }

    /// Server-provided detail, when there is any
    pub fn detail(&self) -> Option<&str> {
        match self {
            SyncError::HttpStatus { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// The status classes the console distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatusKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Other(u16),
}

impl HttpStatusKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => HttpStatusKind::Unauthorized,
            403 => HttpStatusKind::Forbidden,
            404 => HttpStatusKind::NotFound,
            other => HttpStatusKind::Other(other),
        }
    }
}

impl std::fmt::Display for HttpStatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpStatusKind::Unauthorized => write!(f, "Unauthorized"),
            HttpStatusKind::Forbidden => write!(f, "Forbidden"),
            HttpStatusKind::NotFound => write!(f, "Not found"),
            HttpStatusKind::Other(code) => write!(f, "Error {}", code),
        }
    }
}

impl From<ClientError> for SyncError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) => SyncError::Network(e.to_string()),
            ClientError::ApiError { status, message } => SyncError::HttpStatus { status, message },
            ClientError::ParseError(msg) => SyncError::Decode(msg),
            ClientError::InvalidRequest(msg) => SyncError::Validation(msg),
        }
    }
}

impl From<ValidationError> for SyncError {
    fn from(err: ValidationError) -> Self {
        SyncError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        let cases = [
            (401, "Unauthorized"),
            (403, "Forbidden"),
            (404, "Not found"),
            (500, "Error 500"),
        ];

        for (status, expected) in cases {
            let err = SyncError::from(ClientError::api_error(status, "detail"));
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_classification() {
        let err = SyncError::from(ClientError::api_error(404, "Not Found"));
        assert_eq!(err.http_status(), Some(HttpStatusKind::NotFound));
        assert_eq!(err.detail(), Some("Not Found"));

        let err = SyncError::from(ClientError::ParseError("eof".to_string()));
        assert_eq!(err, SyncError::Decode("eof".to_string()));
        assert_eq!(err.http_status(), None);

        let err = SyncError::from(ValidationError::EmptyName);
        assert_eq!(
            err,
            SyncError::Validation("repository name cannot be empty".to_string())
        );
    }
}
