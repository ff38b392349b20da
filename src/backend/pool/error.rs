//! Replica pool errors.
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error("pool \"{0}\" has no replicas")]
    Empty(String),
}
