//! Routing errors.

use thiserror::Error;

use crate::backend;

#[derive(Debug, Error)]
pub enum Error {
    #[error("leader database has been disabled, re-enable it with disable_leader = false")]
    LeaderDisabled,

    #[error("leader \"{endpoint}\": {source}")]
    Leader {
        endpoint: String,
        source: backend::Error,
    },

    #[error("replica \"{endpoint}\": {source}")]
    Replica {
        endpoint: String,
        source: backend::Error,
    },

    #[error("{0}")]
    Config(#[from] crate::config::Error),
}

impl Error {
    /// The error returned by the endpoint, unchanged.
    pub fn endpoint_error(&self) -> Option<&backend::Error> {
        match self {
            Self::Leader { source, .. } | Self::Replica { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Name of the endpoint that failed.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Leader { endpoint, .. } | Self::Replica { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    pub(crate) fn leader(endpoint: &str, source: backend::Error) -> Self {
        Self::Leader {
            endpoint: endpoint.to_owned(),
            source,
        }
    }

    pub(crate) fn replica(endpoint: &str, source: backend::Error) -> Self {
        Self::Replica {
            endpoint: endpoint.to_owned(),
            source,
        }
    }
}
