//! Backend error types

use thiserror::Error;

/// Backend error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Network, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::ServerError, message)
    }

    pub fn client_error(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::ClientError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::InvalidResponse, message)
    }

    /// Map a non-success HTTP status onto an error
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        if status.is_server_error() {
            Self::server_error(format!("Backend returned {status}"))
        } else {
            Self::client_error(format!("Backend rejected request: {status}"))
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::invalid_response(format!("Malformed response body: {err}"))
        } else if let Some(status) = err.status() {
            Self::from_status(status)
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Error classification. Every kind is an exchange failure; the split only
/// feeds logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Connection refused, DNS, timeouts
    Network,
    /// 5xx
    ServerError,
    /// 4xx
    ClientError,
    /// 2xx with a body we could not decode
    InvalidResponse,
}

impl BackendErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::ServerError => "server_error",
            Self::ClientError => "client_error",
            Self::InvalidResponse => "invalid_response",
        }
    }
}
