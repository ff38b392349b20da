//! Errors reported by endpoints.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the driver classified a failure.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Statement or read timeout.
    Timeout,
    /// Connection dropped or refused.
    ConnectionLost,
    #[default]
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::ConnectionLost => write!(f, "connection lost"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Endpoint error, as classified by the driver.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{class}: {message}")]
pub struct Error {
    /// Structured classification.
    pub kind: ErrorKind,
    /// Driver error class, e.g. `Mysql2::Error`.
    pub class: String,
    /// Message as reported by the server or driver.
    pub message: String,
}

impl Error {
    /// Create new unclassified error.
    pub fn new(class: impl ToString, message: impl ToString) -> Self {
        Self {
            kind: ErrorKind::Other,
            class: class.to_string(),
            message: message.to_string(),
        }
    }

    /// Set the error kind.
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Timeout error.
    pub fn timeout(class: impl ToString, message: impl ToString) -> Self {
        Self::new(class, message).with_kind(ErrorKind::Timeout)
    }

    /// Connection lost error.
    pub fn connection_lost(class: impl ToString, message: impl ToString) -> Self {
        Self::new(class, message).with_kind(ErrorKind::ConnectionLost)
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }

    pub fn is_connection_lost(&self) -> bool {
        self.kind == ErrorKind::ConnectionLost
    }
}
